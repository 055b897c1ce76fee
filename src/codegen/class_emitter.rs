//! One `class.rs` per engine class.
//!
//! File layout, top to bottom: bind table, advanced-layer handle with its upcasts and native
//! call wrappers, instance layer (properties, signals, delegates), virtual thunks, singleton access,
//! registration, nested enums and constants.

use crate::codegen::enum_emitter::{emit_constants, emit_enum};
use crate::codegen::method_emitter::{
    MethodPlan, Receiver, emit_advanced_method, emit_instance_method, emit_virtual, plan_method,
};
use crate::codegen::property_emitter::{backing_methods, emit_property, emit_signal, plan_properties};
use crate::codegen::{EmitContext, EmittedFile, RustEmitter, emit_file_header, string_literal};
use crate::codegen_log;
use crate::generator_messages::generator_errors::GeneratorError;
use crate::mapping::name_mapper::{
    NameScope, method_ident, module_ident, type_ident, upcast_ident, virtual_ident,
};
use crate::mapping::type_mapper::TypeContext;
use crate::schema::hierarchy::ancestors;
use crate::schema::model::ClassDescriptor;
use crate::settings::{CLASS_FILE_CAPACITY, CLASS_FILE_NAME};
use std::path::PathBuf;

// Items every class module declares itself
const MODULE_ITEMS: &[&str] = &["Instance", "Virtuals", "BINDS", "register", "singleton_object", "gd"];

// Associated items of every handle
const HANDLE_ITEMS: &[&str] = &["CLASS", "from_object", "object", "into_object"];

pub fn emit_class(context: &EmitContext, class: &ClassDescriptor) -> Result<EmittedFile, GeneratorError> {
    let module = module_ident(context.rules, &class.name);
    let handle = type_ident(&class.name);
    let type_context = TypeContext::module(&module);
    let chain = ancestors(context.schema, &class.name);
    let mut warnings = Vec::new();

    codegen_log!("Emitting ", Green class.name.to_owned(), " as ", module.to_owned());

    let mut module_scope = NameScope::new(&class.name, "module items").with_reserved(MODULE_ITEMS);
    module_scope.claim(&class.name, handle.to_owned())?;

    // Upcasts live on both layers, so both scopes start from them
    let mut upcasts = Vec::with_capacity(chain.len());
    let mut handle_scope = NameScope::new(&class.name, "handle methods").with_reserved(HANDLE_ITEMS);
    let mut instance_scope = NameScope::new(&class.name, "instance methods").with_reserved(&["singleton"]);
    for ancestor in &chain {
        let ident = handle_scope.claim(ancestor, upcast_ident(context.rules, ancestor))?;
        instance_scope.claim(ancestor, ident.to_owned())?;
        upcasts.push((*ancestor, ident));
    }

    let mut virtual_scope = NameScope::new(&class.name, "virtual methods");
    let mut plans: Vec<MethodPlan> = Vec::with_capacity(class.methods.len());
    let mut binds: Vec<(&str, &str, u64)> = Vec::new();

    for method in &class.methods {
        let owner = method.relocated_from.as_deref().unwrap_or(&class.name);

        if method.is_virtual {
            let ident = virtual_scope.claim(&method.name, virtual_ident(context.rules, &method.name))?;
            plans.push(plan_method(
                context,
                owner,
                method,
                ident,
                Receiver::Instance,
                None,
                type_context,
                &mut warnings,
            )?);
            continue;
        }

        let receiver = match (&method.relocated_from, method.is_static) {
            (_, true) => Receiver::Static,
            (Some(source), false) => Receiver::Singleton(module_ident(context.rules, source)),
            (None, false) => Receiver::Instance,
        };

        let ident = handle_scope.claim(&method.name, method_ident(context.rules, &method.name))?;
        let plan = plan_method(
            context,
            owner,
            method,
            ident,
            receiver,
            Some(binds.len()),
            type_context,
            &mut warnings,
        )?;

        binds.push((owner, &method.name, method.hash.unwrap_or_default()));
        plans.push(plan);
    }

    let properties = plan_properties(class, &plans);
    let backing = backing_methods(&properties, &plans);

    let mut emitter = RustEmitter::new(CLASS_FILE_CAPACITY);
    emit_file_header(&mut emitter, context);

    if !binds.is_empty() {
        emitter.emit_blank();
        emitter.emit_line(&format!(
            "static BINDS: gd::MethodTable<{}> = gd::MethodTable::new(&[",
            binds.len()
        ));
        emitter.with_indent(|emitter| {
            for (owner, method, hash) in &binds {
                emitter.emit_line(&format!(
                    "({}, {}, {hash}),",
                    string_literal(owner),
                    string_literal(method)
                ));
            }
        });
        emitter.emit_line("]);");
    }

    // Advanced layer
    emitter.emit_blank();
    if class.is_root() {
        emitter.emit_doc(&format!("Handle to an engine `{}`.", class.name));
    } else {
        emitter.emit_doc(&format!(
            "Handle to an engine `{}`. Inherits `{}`.",
            class.name, class.inherits
        ));
    }
    emitter.emit_line("#[repr(transparent)]");
    emitter.emit_line("#[derive(Clone)]");
    emitter.emit_line(&format!("pub struct {handle}(gd::Object);"));
    emitter.emit_blank();

    emitter.try_block(&format!("impl {handle}"), |emitter| {
        emitter.emit_line(&format!(
            "pub const CLASS: &'static str = {};",
            string_literal(&class.name)
        ));
        emitter.emit_blank();
        emitter.block("pub fn from_object(object: gd::Object) -> Self", |emitter| {
            emitter.emit_line(&format!("{handle}(object)"));
        });
        emitter.emit_blank();
        emitter.block("pub fn object(&self) -> &gd::Object", |emitter| {
            emitter.emit_line("&self.0");
        });
        emitter.emit_blank();
        emitter.block("pub fn into_object(self) -> gd::Object", |emitter| {
            emitter.emit_line("self.0");
        });

        for (ancestor, ident) in &upcasts {
            let target = context.mapper.handle_path(ancestor, type_context);
            emit_upcast(emitter, ident, &target);
        }

        for plan in plans.iter().filter(|plan| !plan.method.is_virtual) {
            emit_advanced_method(emitter, context, plan, type_context)?;
        }

        Ok(())
    })?;

    // Instance layer
    emitter.emit_blank();
    emitter.emit_doc(&format!("Instance-layer view of `{}` with native Rust types.", class.name));
    emitter.emit_line("#[repr(transparent)]");
    emitter.emit_line("#[derive(Clone)]");
    emitter.emit_line(&format!("pub struct Instance(pub {handle});"));
    emitter.emit_blank();

    emitter.try_block("impl Instance", |emitter| {
        for (ancestor, ident) in &upcasts {
            let target = context.mapper.instance_path(ancestor, type_context);
            emit_upcast(emitter, ident, &target);
        }

        if class.is_singleton {
            emitter.emit_blank();
            emitter.block("pub fn singleton() -> Self", |emitter| {
                emitter.emit_line(&format!(
                    "Instance({handle}::from_object(singleton_object().clone()))"
                ));
            });
        }

        for property in &properties {
            emit_property(emitter, context, class, property, &plans, &mut instance_scope, type_context)?;
        }

        for signal in &class.signals {
            emit_signal(emitter, context, signal, &mut instance_scope)?;
        }

        for plan in &plans {
            if plan.method.is_virtual || backing.contains(&plan.method.name.as_str()) {
                continue;
            }

            instance_scope.claim(&plan.method.name, plan.ident.to_owned())?;
            emit_instance_method(emitter, context, plan, &handle, type_context)?;
        }

        Ok(())
    })?;

    if plans.iter().any(|plan| plan.method.is_virtual) {
        emitter.emit_blank();
        emitter.emit_doc(&format!("Overridable methods of `{}`.", class.name));
        emitter.emit_line("pub struct Virtuals;");
        emitter.emit_blank();
        emitter.try_block("impl Virtuals", |emitter| {
            for plan in plans.iter().filter(|plan| plan.method.is_virtual) {
                emit_virtual(emitter, context, plan, type_context)?;
            }
            Ok(())
        })?;
    }

    if class.is_singleton {
        emitter.emit_blank();
        emitter.block("pub(crate) fn singleton_object() -> &'static gd::Object", |emitter| {
            emitter.emit_line("static SINGLETON: std::sync::OnceLock<gd::Object> = std::sync::OnceLock::new();");
            emitter.emit_line(&format!(
                "SINGLETON.get_or_init(|| gd::sys::global_get_singleton({}))",
                string_literal(&class.name)
            ));
        });
    }

    emitter.emit_blank();
    emitter.block("pub fn register(registry: &mut gd::ClassRegistry)", |emitter| {
        emitter.emit_line(&format!(
            "registry.register::<Instance>({}, {}, |object| Instance({handle}::from_object(object)));",
            string_literal(&class.name),
            string_literal(&class.inherits)
        ));
    });

    for enumeration in &class.enums {
        module_scope.claim(&enumeration.name, type_ident(&enumeration.name))?;
        emit_enum(&mut emitter, &class.name, enumeration)?;
    }

    emit_constants(&mut emitter, context, class, &mut module_scope)?;

    Ok(EmittedFile {
        path: PathBuf::from(&class.name).join(CLASS_FILE_NAME),
        source: emitter.finish(),
        warnings,
    })
}

fn emit_upcast(emitter: &mut RustEmitter, ident: &str, target: &str) {
    emitter.emit_blank();
    emitter.block(&format!("pub fn {ident}(&self) -> &{target}"), |emitter| {
        emitter.emit_line("// SAFETY: every handle and instance is a transparent wrapper around one gd::Object");
        emitter.emit_line(&format!("unsafe {{ &*(self as *const Self).cast::<{target}>() }}"));
    });
}

#[cfg(test)]
#[path = "tests/class_emitter_tests.rs"]
mod tests;
