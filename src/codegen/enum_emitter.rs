//! Enums, bitfields and class constants.
//!
//! An enum becomes a transparent `i64` newtype with one associated constant per enumerator and a
//! static name table, so names and values convert both ways without reflection.

use crate::codegen::{EmitContext, RustEmitter, string_literal};
use crate::codegen_log;
use crate::generator_messages::generator_errors::GeneratorError;
use crate::mapping::name_mapper::{NameScope, constant_ident, shared_enum_prefix, type_ident};
use crate::rules::rewrites::ConstantPlacement;
use crate::schema::model::{ClassDescriptor, ConstantDescriptor, EnumDescriptor};

/// Emits one enum. `owner` names the declaring class in diagnostics.
pub fn emit_enum(
    emitter: &mut RustEmitter,
    owner: &str,
    enumeration: &EnumDescriptor,
) -> Result<(), GeneratorError> {
    let ident = type_ident(&enumeration.name);

    let names = enumeration
        .values
        .iter()
        .map(|value| value.name.as_str())
        .collect::<Vec<_>>();
    let prefix = shared_enum_prefix(&names);

    let mut scope = NameScope::new(owner, "enumerators")
        .with_reserved(&["NAMES", "name", "from_name", "contains"]);
    let mut values = Vec::with_capacity(enumeration.values.len());
    for value in &enumeration.values {
        let stripped = &value.name[prefix.len()..];
        let value_ident = scope.claim(&value.name, constant_ident(stripped))?;
        values.push((value_ident, value.value));
    }

    codegen_log!("  enum ", ident.to_owned(), " (", Blue values.len(), " values)");

    emitter.emit_blank();
    if enumeration.is_bitfield {
        emitter.emit_doc(&format!("Bit flags `{}` of {owner}.", enumeration.name));
    } else {
        emitter.emit_doc(&format!("`{}` of {owner}.", enumeration.name));
    }
    emitter.emit_line("#[repr(transparent)]");
    emitter.emit_line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]");
    emitter.emit_line(&format!("pub struct {ident}(pub i64);"));
    emitter.emit_blank();

    emitter.block(&format!("impl {ident}"), |emitter| {
        for (value_ident, value) in &values {
            emitter.emit_line(&format!("pub const {value_ident}: {ident} = {ident}({value});"));
        }

        emitter.emit_blank();
        emitter.emit_line("const NAMES: &'static [(i64, &'static str)] = &[");
        emitter.with_indent(|emitter| {
            for (value_ident, value) in &values {
                emitter.emit_line(&format!("({value}, {}),", string_literal(value_ident)));
            }
        });
        emitter.emit_line("];");

        emitter.emit_blank();
        emitter.emit_line("/// Declared name of the value, or an empty string when no enumerator has it.");
        emitter.block("pub fn name(self) -> &'static str", |emitter| {
            emitter.emit_line("Self::NAMES");
            emitter.with_indent(|emitter| {
                emitter.emit_line(".iter()");
                emitter.emit_line(".find(|(value, _)| *value == self.0)");
                emitter.emit_line(".map_or(\"\", |(_, name)| *name)");
            });
        });

        emitter.emit_blank();
        emitter.block("pub fn from_name(name: &str) -> Option<Self>", |emitter| {
            emitter.emit_line("Self::NAMES");
            emitter.with_indent(|emitter| {
                emitter.emit_line(".iter()");
                emitter.emit_line(".find(|(_, declared)| *declared == name)");
                emitter.emit_line(".map(|(value, _)| Self(*value))");
            });
        });
    });

    if enumeration.is_bitfield {
        emitter.emit_blank();
        emitter.block(&format!("impl std::ops::BitOr for {ident}"), |emitter| {
            emitter.emit_line("type Output = Self;");
            emitter.emit_blank();
            emitter.block("fn bitor(self, rhs: Self) -> Self", |emitter| {
                emitter.emit_line("Self(self.0 | rhs.0)");
            });
        });

        emitter.emit_blank();
        emitter.block(&format!("impl {ident}"), |emitter| {
            emitter.block("pub fn contains(self, flags: Self) -> bool", |emitter| {
                emitter.emit_line("self.0 & flags.0 == flags.0");
            });
        });
    }

    Ok(())
}

/// Emits class constants, honouring the redirect table. Scoped constants are grouped per module
/// in order of first appearance.
pub fn emit_constants(
    emitter: &mut RustEmitter,
    context: &EmitContext,
    class: &ClassDescriptor,
    module_scope: &mut NameScope,
) -> Result<(), GeneratorError> {
    let mut kept: Vec<(String, &ConstantDescriptor)> = Vec::new();
    let mut scoped: Vec<(&str, Vec<(String, &ConstantDescriptor)>)> = Vec::new();
    let mut scoped_names: Vec<NameScope> = Vec::new();

    for constant in &class.constants {
        match context.rules.constant_placement(&class.name, &constant.name) {
            ConstantPlacement::Keep => {
                let ident = module_scope.claim(&constant.name, constant_ident(&constant.name))?;
                kept.push((ident, constant));
            }
            ConstantPlacement::Scope { module, name } => {
                let index = match scoped.iter().position(|(existing, _)| *existing == module) {
                    Some(index) => index,
                    None => {
                        module_scope.claim(module, module.to_owned())?;
                        scoped.push((module, Vec::new()));
                        scoped_names.push(NameScope::new(&class.name, "scoped constants"));
                        scoped.len() - 1
                    }
                };

                let ident = scoped_names[index].claim(&constant.name, constant_ident(name))?;
                scoped[index].1.push((ident, constant));
            }
            ConstantPlacement::Drop => {
                codegen_log!("  dropped constant ", Dark constant.name.to_owned());
            }
        }
    }

    if !kept.is_empty() {
        emitter.emit_blank();
        for (ident, constant) in &kept {
            emitter.emit_line(&format!("pub const {ident}: i64 = {};", constant.value));
        }
    }

    for (module, constants) in &scoped {
        emitter.emit_blank();
        emitter.block(&format!("pub mod {module}"), |emitter| {
            for (ident, constant) in constants {
                emitter.emit_line(&format!("pub const {ident}: i64 = {};", constant.value));
            }
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/enum_emitter_tests.rs"]
mod tests;
