//! Instance-layer property accessors and signal connectors.

use crate::codegen::method_emitter::{MethodPlan, located};
use crate::codegen::{EmitContext, RustEmitter, string_literal};
use crate::codegen_log;
use crate::generator_messages::generator_errors::{GeneratorError, SchemaLocation};
use crate::mapping::name_mapper::{NameScope, property_ident, setter_ident, signal_ident};
use crate::mapping::type_mapper::TypeContext;
use crate::mapping::values::{Value, render_default};
use crate::schema::model::{ClassDescriptor, PropertyDescriptor, SignalDescriptor};

/// A property whose getter (and optionally setter) are instance methods of the same class.
#[derive(Debug, Clone)]
pub struct PropertyPlan<'p> {
    pub property: &'p PropertyDescriptor,
    pub getter: usize,
    pub setter: Option<usize>,
}

/// Matches properties to their accessor methods in `plans`.
/// A property is skipped when its getter is missing or has the wrong arity. A setter with the
/// wrong arity is ignored and the property becomes read-only.
pub fn plan_properties<'p>(class: &'p ClassDescriptor, plans: &[MethodPlan]) -> Vec<PropertyPlan<'p>> {
    let accessor = |name: &str, arity: usize, needs_return: bool| {
        if name.is_empty() {
            return None;
        }

        plans.iter().position(|plan| {
            plan.method.name == name
                && plan.receiver.takes_self()
                && !plan.method.is_virtual
                && !plan.method.is_vararg
                && plan.params.len() == arity
                && plan.return_kind.is_some() == needs_return
        })
    };

    let mut planned = Vec::new();
    for property in &class.properties {
        let indexed = usize::from(property.index.is_some());

        let Some(getter) = accessor(&property.getter, indexed, true) else {
            codegen_log!("  skipped property ", Dark property.name.to_owned());
            continue;
        };

        planned.push(PropertyPlan {
            property,
            getter,
            setter: accessor(&property.setter, indexed + 1, false),
        });
    }

    planned
}

/// Names of the methods backing an emitted property. They get no instance-layer method of their own.
pub fn backing_methods<'a>(properties: &[PropertyPlan], plans: &'a [MethodPlan]) -> Vec<&'a str> {
    let mut names = Vec::with_capacity(properties.len() * 2);
    for property in properties {
        names.push(plans[property.getter].method.name.as_str());
        if let Some(setter) = property.setter {
            names.push(plans[setter].method.name.as_str());
        }
    }
    names
}

pub fn emit_property(
    emitter: &mut RustEmitter,
    context: &EmitContext,
    class: &ClassDescriptor,
    property: &PropertyPlan,
    plans: &[MethodPlan],
    scope: &mut NameScope,
    type_context: TypeContext,
) -> Result<(), GeneratorError> {
    let descriptor = property.property;
    let location = SchemaLocation::member(&class.name, &descriptor.name);
    let getter = &plans[property.getter];

    let Some(kind) = &getter.return_kind else {
        return Err(located(
            GeneratorError::generator_error("Property getter was planned without a return type"),
            location,
        ));
    };

    // Indexed properties pass their index as the first accessor argument
    let index = match (descriptor.index, getter.params.first()) {
        (Some(index), Some(param)) => Some(
            render_default(&context.mapper, &context.layout, &Value::Int(index), &param.kind, type_context)
                .map_err(|reason| {
                    GeneratorError::schema_error(
                        format!("Index {index} of property {} cannot be passed: {reason}", descriptor.name),
                        location.to_owned(),
                    )
                })?,
        ),
        _ => None,
    };
    let index_argument = |rest: &str| match &index {
        Some(index) if rest.is_empty() => index.to_owned(),
        Some(index) => format!("{index}, {rest}"),
        None => rest.to_owned(),
    };

    let getter_ident = scope.claim(&descriptor.name, property_ident(context.rules, &descriptor.name))?;
    let structable = getter.return_structable.as_deref();

    emitter.emit_blank();
    emitter.block(
        &format!(
            "pub fn {getter_ident}(&self) -> {}",
            context.mapper.instance_type(kind, type_context, structable)
        ),
        |emitter| {
            let call = format!("self.0.{}({})", getter.ident, index_argument(""));
            emitter.emit_line(&context.mapper.to_instance(kind, &call, type_context, structable));
        },
    );

    let Some(setter) = property.setter.map(|setter| &plans[setter]) else {
        return Ok(());
    };
    let Some(value) = setter.params.last() else {
        return Ok(());
    };

    let setter_name = format!("set_{}", descriptor.name);
    let setter_ident = scope.claim(&setter_name, setter_ident(context.rules, &descriptor.name))?;

    emitter.emit_blank();
    emitter.block(
        &format!(
            "pub fn {setter_ident}(&self, value: {})",
            value.instance_type(context, type_context)
        ),
        |emitter| {
            let converted = value.from_instance(context, "value", type_context);
            emitter.emit_line(&format!("self.0.{}({});", setter.ident, index_argument(&converted)));
        },
    );

    Ok(())
}

pub fn emit_signal(
    emitter: &mut RustEmitter,
    context: &EmitContext,
    signal: &SignalDescriptor,
    scope: &mut NameScope,
) -> Result<(), GeneratorError> {
    let ident = scope.claim(&signal.name, signal_ident(context.rules, &signal.name))?;

    let arguments = signal
        .arguments
        .iter()
        .map(|argument| format!("{}: {}", argument.name, argument.type_name))
        .collect::<Vec<_>>()
        .join(", ");

    emitter.emit_blank();
    emitter.emit_doc(&format!("Connects `callable` to `{}({arguments})`.", signal.name));
    emitter.block(
        &format!("pub fn {ident}(&self, callable: gd::Callable, flags: i64)"),
        |emitter| {
            emitter.emit_line(&format!(
                "gd::signals::connect(self.0.object(), {}, callable, flags);",
                string_literal(&signal.name)
            ));
        },
    );

    Ok(())
}

#[cfg(test)]
#[path = "tests/property_emitter_tests.rs"]
mod tests;
