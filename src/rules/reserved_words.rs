// Identifier tables for the emitted Rust code.

/// Strict, reserved and weak keywords of Rust 2024.
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "union",
];

/// Parameter names that may not appear verbatim in a generated signature.
/// Covers keywords plus the locals every generated wrapper declares.
pub(crate) const RESERVED_PARAMETERS: &[(&str, &str)] = &[
    ("as", "as_"),
    ("async", "is_async"),
    ("await", "awaited"),
    ("box", "rect"),
    ("const", "constant"),
    ("crate", "crate_"),
    ("dyn", "dynamic"),
    ("enum", "enumeration"),
    ("extern", "external"),
    ("final", "is_final"),
    ("fn", "function"),
    ("for", "target"),
    ("gen", "generator"),
    ("impl", "impl_"),
    ("in", "input"),
    ("loop", "looping"),
    ("match", "pattern"),
    ("mod", "modulus"),
    ("move", "motion"),
    ("mut", "mutable"),
    ("override", "overridden"),
    ("priv", "private"),
    ("pub", "public"),
    ("ref", "reference"),
    ("self", "receiver"),
    ("static", "is_static"),
    ("struct", "structure"),
    ("super", "parent"),
    ("trait", "trait_"),
    ("type", "type_"),
    ("typeof", "type_of"),
    ("unsafe", "is_unsafe"),
    ("use", "usage"),
    ("virtual", "is_virtual"),
    ("where", "location"),
    ("yield", "yielded"),
    ("union", "union_"),
    ("abstract", "is_abstract"),
    ("become", "become_"),
    ("do", "do_"),
    ("macro", "macro_"),
    ("try", "attempt"),
    ("unsized", "unsized_"),
    // Commonly shadowed names
    ("str", "text"),
    // Locals declared by generated wrappers
    ("frame", "frame_"),
    ("r_ret", "r_ret_"),
    ("ret", "ret_"),
    ("args", "args_"),
    ("variants", "variants_"),
    ("this", "this_"),
    ("implementation", "implementation_"),
    ("p_args", "p_args_"),
    ("p_self", "p_self_"),
    ("p_ret", "p_ret_"),
];

/// Method renames applied before any other naming rule.
pub(crate) const METHOD_RENAMES: &[(&str, &str)] = &[
    ("seek", "seek_to"),
    ("type_string", "type_to_string"),
    // Keywords the schema is known to use as method names
    ("match", "match_"),
    ("move", "move_"),
];
