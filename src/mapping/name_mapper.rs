//! Schema identifiers to Rust identifiers.
//!
//! Every function here is pure. Collisions are only detected by `NameScope`, which the
//! emitters use for each scope they generate into.

use crate::generator_messages::generator_errors::{
    ErrorMetaDataKey, ErrorType, GeneratorError, SchemaLocation,
};
use crate::rules::Rules;
use rustc_hash::FxHashMap;

/// Module names the index file declares next to the class modules.
pub const INDEX_MODULES: &[&str] = &["enums", "utility"];

/// Class name to module identifier: `AudioStreamPlayer3D` -> `audio_stream_player_3d`.
pub fn module_ident(rules: &Rules, class_name: &str) -> String {
    let chars = class_name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect::<Vec<_>>();

    let mut ident = String::with_capacity(chars.len() + 4);

    for (index, ch) in chars.iter().copied().enumerate() {
        if index > 0 && !ident.ends_with('_') && word_starts_at(&chars, index) {
            ident.push('_');
        }
        ident.push(ch.to_ascii_lowercase());
    }

    finish_ident(rules, ident)
}

fn word_starts_at(chars: &[char], index: usize) -> bool {
    let ch = chars[index];
    let prev = chars[index - 1];
    let next_is_lower = chars
        .get(index + 1)
        .is_some_and(|next| next.is_ascii_lowercase());

    if ch.is_ascii_digit() {
        return prev.is_ascii_alphabetic();
    }

    if !ch.is_ascii_uppercase() {
        return false;
    }

    if prev.is_ascii_lowercase() {
        return true;
    }

    // The D of "2D" and "3D" stays with its digit
    if prev.is_ascii_digit() {
        return !(ch == 'D' && !next_is_lower);
    }

    // End of an acronym, as the P in "HTTPRequest"
    prev.is_ascii_uppercase() && next_is_lower
}

/// Schema type name to a Rust type identifier. Dots and other separators are removed.
pub fn type_ident(schema_name: &str) -> String {
    let mut ident = String::with_capacity(schema_name.len());
    let mut upper_next = true;

    for ch in schema_name.chars() {
        if !ch.is_ascii_alphanumeric() {
            upper_next = true;
            continue;
        }

        if upper_next {
            ident.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            ident.push(ch);
        }
    }

    if ident.starts_with(|ch: char| ch.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    ident
}

/// Method name to a function identifier. The rename table is consulted before anything else.
pub fn method_ident(rules: &Rules, schema_name: &str) -> String {
    if let Some(renamed) = rules.method_renames.get(schema_name) {
        return renamed.to_owned();
    }

    finish_ident(rules, snake_ident(schema_name))
}

/// Virtual method name to the name of its thunk constructor. The leading underscore is dropped.
pub fn virtual_ident(rules: &Rules, schema_name: &str) -> String {
    let trimmed = schema_name.trim_start_matches('_');
    if trimmed.is_empty() {
        return method_ident(rules, schema_name);
    }

    method_ident(rules, trimmed)
}

/// Parameter name, passed through the reserved-word table.
pub fn parameter_ident(rules: &Rules, schema_name: &str) -> String {
    if let Some(replacement) = rules.reserved_parameters.get(schema_name) {
        return replacement.to_owned();
    }

    let ident = snake_ident(schema_name);
    if let Some(replacement) = rules.reserved_parameters.get(&ident) {
        return replacement.to_owned();
    }

    finish_ident(rules, ident)
}

/// Property name to its getter identifier. Property paths such as `theme_override/color` are flattened.
pub fn property_ident(rules: &Rules, schema_name: &str) -> String {
    finish_ident(rules, snake_ident(schema_name))
}

pub fn setter_ident(rules: &Rules, schema_name: &str) -> String {
    format!("set_{}", property_ident(rules, schema_name).trim_end_matches('_'))
}

pub fn signal_ident(rules: &Rules, schema_name: &str) -> String {
    format!("on_{}", property_ident(rules, schema_name).trim_end_matches('_'))
}

pub fn upcast_ident(rules: &Rules, ancestor: &str) -> String {
    format!("as_{}", module_ident(rules, ancestor).trim_end_matches('_'))
}

/// Constant or enumerator name. Case is kept as declared.
pub fn constant_ident(schema_name: &str) -> String {
    let mut ident = schema_name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect::<String>();

    if ident.is_empty() || ident.starts_with(|ch: char| ch.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if ident == "Self" {
        ident.push('_');
    }

    ident
}

/// The `PREFIX_` shared by every enumerator, when stripping it leaves valid identifiers.
pub fn shared_enum_prefix<'a>(names: &[&'a str]) -> &'a str {
    let [first, rest @ ..] = names else {
        return "";
    };
    if rest.is_empty() {
        return "";
    }

    let mut length = first.len();
    for name in rest {
        length = first
            .bytes()
            .zip(name.bytes())
            .take(length)
            .take_while(|(a, b)| a == b)
            .count();
    }

    // Cut back to the last underscore so whole words are removed
    let Some(cut) = first.as_bytes()[..length].iter().rposition(|byte| *byte == b'_') else {
        return "";
    };
    let prefix = &first[..=cut];

    let usable = names.iter().all(|name| {
        name[prefix.len()..]
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_alphabetic())
    });

    if usable { prefix } else { "" }
}

/// Lowercase snake_case with separators collapsed to one underscore.
fn snake_ident(schema_name: &str) -> String {
    let mut ident = String::with_capacity(schema_name.len());

    for ch in schema_name.chars() {
        if ch.is_ascii_alphanumeric() {
            ident.push(ch.to_ascii_lowercase());
        } else if !ident.is_empty() && !ident.ends_with('_') {
            ident.push('_');
        }
    }

    // Keep a leading underscore, it is meaningful for private engine methods
    if schema_name.starts_with('_') {
        ident.insert(0, '_');
    }

    ident
}

fn finish_ident(rules: &Rules, mut ident: String) -> String {
    if ident.is_empty() || ident.starts_with(|ch: char| ch.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if rules.is_keyword(&ident) {
        ident.push('_');
    }

    ident
}

/// One generated scope. Claims fail when two different schema names map to the same identifier.
#[derive(Debug, Clone)]
pub struct NameScope {
    owner: String,
    description: &'static str,
    claimed: FxHashMap<String, String>,
}

impl NameScope {
    pub fn new(owner: &str, description: &'static str) -> Self {
        NameScope {
            owner: owner.to_owned(),
            description,
            claimed: FxHashMap::default(),
        }
    }

    /// Reserves identifiers the generated code declares itself.
    pub fn with_reserved(mut self, identifiers: &[&str]) -> Self {
        for identifier in identifiers {
            self.claimed
                .insert((*identifier).to_owned(), format!("<generated {identifier}>"));
        }
        self
    }

    pub fn claim(&mut self, schema_name: &str, ident: String) -> Result<String, GeneratorError> {
        if let Some(existing) = self.claimed.get(&ident) {
            let detail = if existing == schema_name {
                format!("'{schema_name}' is declared twice")
            } else {
                format!("'{existing}' and '{schema_name}' both map to '{ident}'")
            };

            return Err(GeneratorError::new(
                format!("Identifier collision in {} of {}: {detail}", self.description, self.owner),
                SchemaLocation::member(&self.owner, schema_name),
                ErrorType::IdentifierCollision,
            )
            .with_metadata(ErrorMetaDataKey::ConflictingName, existing.to_owned())
            .with_metadata(ErrorMetaDataKey::TargetIdentifier, ident.to_owned())
            .with_metadata(
                ErrorMetaDataKey::PrimarySuggestion,
                "Add a rename for one of the two names",
            ));
        }

        self.claimed.insert(ident.to_owned(), schema_name.to_owned());
        Ok(ident)
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.claimed.contains_key(ident)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/name_mapper_tests.rs"]
mod tests;
