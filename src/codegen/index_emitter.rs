//! Files shared by every class: the `mod.rs` index, global enums and utility functions.

use crate::codegen::enum_emitter::emit_enum;
use crate::codegen::method_emitter::{Receiver, emit_advanced_method, plan_method};
use crate::codegen::{EmitContext, EmittedFile, RustEmitter, emit_file_header, string_literal};
use crate::generator_messages::generator_errors::GeneratorError;
use crate::mapping::name_mapper::{INDEX_MODULES, NameScope, method_ident, module_ident, type_ident};
use crate::mapping::type_mapper::TypeContext;
use crate::schema::model::ClassDescriptor;
use crate::settings::{
    CLASS_FILE_NAME, GLOBAL_ENUMS_FILE_NAME, GLOBAL_SCOPE_CLASS, INDEX_FILE_NAME, UTILITY_FILE_NAME,
};
use std::path::PathBuf;

const INDEX_ITEMS: &[&str] = &["gd", "BUILTIN_SIZES", "BUILD_CONFIGURATION", "register_all"];

/// The index module: one `#[path]` module per class, handle re-exports, builtin sizes and
/// `register_all`.
pub fn emit_index(
    context: &EmitContext,
    classes: &[&ClassDescriptor],
    build_configuration: &str,
) -> Result<EmittedFile, GeneratorError> {
    let mut scope = NameScope::new(GLOBAL_SCOPE_CLASS, "index items")
        .with_reserved(INDEX_MODULES)
        .with_reserved(INDEX_ITEMS);

    let mut modules = Vec::with_capacity(classes.len());
    for class in classes {
        let module = scope.claim(&class.name, module_ident(context.rules, &class.name))?;
        let handle = scope.claim(&class.name, type_ident(&class.name))?;
        modules.push((*class, module, handle));
    }

    let mut emitter = RustEmitter::new(64 * classes.len() + 1024);
    emit_file_header(&mut emitter, context);

    emitter.emit_blank();
    for module in INDEX_MODULES {
        emitter.emit_line(&format!("pub mod {module};"));
    }

    for (class, module, handle) in &modules {
        emitter.emit_blank();
        emitter.emit_line(&format!(
            "#[path = \"{}/{CLASS_FILE_NAME}\"]",
            class.name
        ));
        emitter.emit_line(&format!("pub mod {module};"));
        emitter.emit_line(&format!("pub use {module}::{handle};"));
    }

    emitter.emit_blank();
    emitter.emit_line(&format!(
        "pub const BUILD_CONFIGURATION: &str = {};",
        string_literal(build_configuration)
    ));
    emitter.emit_blank();
    emitter.emit_doc("Builtin value sizes in bytes for `BUILD_CONFIGURATION`.");
    emitter.emit_line("pub const BUILTIN_SIZES: &[(&str, u32)] = &[");
    emitter.with_indent(|emitter| {
        for (name, size) in &context.schema.builtin_sizes {
            emitter.emit_line(&format!("({}, {size}),", string_literal(name)));
        }
    });
    emitter.emit_line("];");

    emitter.emit_blank();
    emitter.emit_doc("Registers a factory for every class so polymorphic returns get their concrete type.");
    emitter.block("pub fn register_all(registry: &mut gd::ClassRegistry)", |emitter| {
        for (_, module, _) in &modules {
            emitter.emit_line(&format!("{module}::register(registry);"));
        }
    });

    Ok(EmittedFile {
        path: PathBuf::from(INDEX_FILE_NAME),
        source: emitter.finish(),
        warnings: Vec::new(),
    })
}

pub fn emit_global_enums(context: &EmitContext) -> Result<EmittedFile, GeneratorError> {
    let mut scope = NameScope::new(GLOBAL_SCOPE_CLASS, "global enums").with_reserved(&["gd"]);
    let mut emitter = RustEmitter::new(context.schema.global_enums.len() * 1024);
    emit_file_header(&mut emitter, context);

    for enumeration in &context.schema.global_enums {
        scope.claim(&enumeration.name, type_ident(&enumeration.name))?;
        emit_enum(&mut emitter, GLOBAL_SCOPE_CLASS, enumeration)?;
    }

    Ok(EmittedFile {
        path: PathBuf::from(GLOBAL_ENUMS_FILE_NAME),
        source: emitter.finish(),
        warnings: Vec::new(),
    })
}

/// Free functions with the same call shapes as class methods. Class-typed values resolve their
/// ownership under `@GlobalScope`.
pub fn emit_utilities(context: &EmitContext) -> Result<EmittedFile, GeneratorError> {
    let type_context = TypeContext::module("utility");
    let mut scope = NameScope::new(GLOBAL_SCOPE_CLASS, "utility functions")
        .with_reserved(&["gd", "UTILITIES"]);
    let mut warnings = Vec::new();

    let mut plans = Vec::with_capacity(context.schema.utility_functions.len());
    for (index, function) in context.schema.utility_functions.iter().enumerate() {
        let ident = scope.claim(&function.name, method_ident(context.rules, &function.name))?;
        plans.push(plan_method(
            context,
            GLOBAL_SCOPE_CLASS,
            function,
            ident,
            Receiver::None,
            Some(index),
            type_context,
            &mut warnings,
        )?);
    }

    let mut emitter = RustEmitter::new(plans.len() * 512 + 1024);
    emit_file_header(&mut emitter, context);

    if !plans.is_empty() {
        emitter.emit_blank();
        emitter.emit_line(&format!(
            "static UTILITIES: gd::UtilityTable<{}> = gd::UtilityTable::new(&[",
            plans.len()
        ));
        emitter.with_indent(|emitter| {
            for plan in &plans {
                emitter.emit_line(&format!(
                    "({}, {}),",
                    string_literal(&plan.method.name),
                    plan.method.hash.unwrap_or_default()
                ));
            }
        });
        emitter.emit_line("]);");
    }

    for plan in &plans {
        emit_advanced_method(&mut emitter, context, plan, type_context)?;
    }

    Ok(EmittedFile {
        path: PathBuf::from(UTILITY_FILE_NAME),
        source: emitter.finish(),
        warnings,
    })
}

#[cfg(test)]
#[path = "tests/index_emitter_tests.rs"]
mod tests;
