//! Method emission.
//!
//! Every method is planned once: identifiers claimed, types parsed, ownership resolved and defaults
//! rendered. The plan then drives the advanced-layer wrapper (a ptrcall or a vararg call), the
//! virtual thunk, and the instance-layer delegate. Emission never re-resolves anything.

use crate::codegen::{EmitContext, RustEmitter, string_literal};
use crate::generator_messages::generator_errors::{GeneratorError, SchemaLocation};
use crate::generator_messages::generator_warnings::{GeneratorWarning, WarningKind};
use crate::mapping::name_mapper::{NameScope, parameter_ident};
use crate::mapping::type_mapper::{TypeContext, TypeKind};
use crate::mapping::values::{Value, render_default};
use crate::return_schema_error;
use crate::rules::ownership::{Ownership, RETURN_VALUE, resolve_method};
use crate::schema::model::MethodDescriptor;

/// How a native call reaches its object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    // `&self` on the handle
    Instance,

    // Associated function, called on a null object
    Static,

    // Associated function calling through the singleton declared in the named module
    Singleton(String),

    // Utility function, no object at all
    None,
}

impl Receiver {
    fn object_expr(&self) -> Option<String> {
        match self {
            Receiver::Instance => Some(String::from("self.object()")),
            Receiver::Static => Some(String::from("&gd::Object::null()")),
            Receiver::Singleton(module) => Some(format!("super::{module}::singleton_object()")),
            Receiver::None => None,
        }
    }

    // The object a LifetimeBoundToClass return is tied to
    fn lifetime_owner(&self) -> Option<String> {
        match self {
            Receiver::Instance => Some(String::from("self.object()")),
            Receiver::Singleton(module) => Some(format!("super::{module}::singleton_object()")),
            Receiver::Static | Receiver::None => None,
        }
    }

    pub fn takes_self(&self) -> bool {
        matches!(self, Receiver::Instance)
    }
}

#[derive(Debug, Clone)]
pub struct ParamPlan {
    pub schema_name: String,
    pub ident: String,
    pub kind: TypeKind,
    pub ownership: Option<Ownership>,

    // Class handle the callee only borrows, taken as `&Handle`
    pub by_reference: bool,

    // Rendered default, or the reason the literal could not be used
    pub default: Option<Result<String, String>>,
    pub structable: Option<String>,
}

impl ParamPlan {
    fn rendered_default(&self) -> Option<&str> {
        match &self.default {
            Some(Ok(rendered)) => Some(rendered),
            _ => None,
        }
    }

    fn advanced_type(&self, context: &EmitContext, type_context: TypeContext) -> String {
        let rust_type = context.mapper.advanced_type(&self.kind, type_context);
        if self.by_reference {
            format!("&{rust_type}")
        } else {
            rust_type
        }
    }

    /// Instance-layer parameter type.
    pub(crate) fn instance_type(&self, context: &EmitContext, type_context: TypeContext) -> String {
        let rust_type = context
            .mapper
            .instance_type(&self.kind, type_context, self.structable.as_deref());
        if self.by_reference {
            format!("&{rust_type}")
        } else {
            rust_type
        }
    }

    /// Advanced-layer argument built from the instance-layer value `expr`.
    pub(crate) fn from_instance(&self, context: &EmitContext, expr: &str, type_context: TypeContext) -> String {
        let converted = context
            .mapper
            .from_instance(&self.kind, expr, type_context, self.structable.as_deref());
        if self.by_reference {
            format!("&{converted}")
        } else {
            converted
        }
    }
}

// Local holding a class argument's raw pointer inside a virtual thunk
fn raw_local(ident: &str) -> String {
    format!("raw_{ident}")
}

#[derive(Debug, Clone)]
pub struct MethodPlan<'a> {
    pub method: &'a MethodDescriptor,

    // Class the method is declared on in the schema, before relocation. `@GlobalScope` for utilities.
    pub owner: String,
    pub ident: String,
    pub receiver: Receiver,
    pub params: Vec<ParamPlan>,
    pub return_kind: Option<TypeKind>,
    pub return_ownership: Option<Ownership>,
    pub return_structable: Option<String>,

    // Position in the bind table. None for virtual methods.
    pub bind_index: Option<usize>,
}

impl MethodPlan<'_> {
    fn location(&self) -> SchemaLocation {
        SchemaLocation::member(&self.owner, &self.method.name)
    }

    fn bind_expr(&self) -> Result<String, GeneratorError> {
        let Some(index) = self.bind_index else {
            return Err(GeneratorError::generator_error(format!(
                "{}.{} reached call emission without a bind table slot",
                self.owner, self.method.name
            )));
        };

        Ok(match self.receiver {
            Receiver::None => format!("UTILITIES.get({index})"),
            _ => format!("BINDS.get({index})"),
        })
    }
}

/// Fills in `error.location` when the failing helper had no schema position to report.
pub(crate) fn located(mut error: GeneratorError, location: SchemaLocation) -> GeneratorError {
    if error.location.is_empty() {
        error.location = location;
    }
    error
}

/// Resolves everything the emitters need for one method.
/// Warnings for defaults that could not be rendered are pushed to `warnings`.
#[allow(clippy::too_many_arguments)]
pub fn plan_method<'a>(
    context: &EmitContext,
    owner: &str,
    method: &'a MethodDescriptor,
    ident: String,
    receiver: Receiver,
    bind_index: Option<usize>,
    type_context: TypeContext,
    warnings: &mut Vec<GeneratorWarning>,
) -> Result<MethodPlan<'a>, GeneratorError> {
    if !method.is_virtual && method.hash.is_none() {
        return_schema_error!(
            format!("{owner}.{} has no hash to bind it with", method.name),
            SchemaLocation::member(owner, &method.name),
            { PrimarySuggestion => "Regenerate extension_api.json from the engine" }
        )
    }

    let ownership = resolve_method(context.schema, context.rules, owner, method)?;

    let scope_owner = format!("{owner}.{}", method.name);
    let mut names = NameScope::new(&scope_owner, "parameters");
    let mut params = Vec::with_capacity(method.arguments.len());

    for argument in &method.arguments {
        let location = SchemaLocation::parameter(owner, &method.name, &argument.name);
        let kind = context
            .mapper
            .parse(&argument.type_name, &argument.meta)
            .map_err(|error| located(error, location.to_owned()))?;

        let ident = names.claim(&argument.name, parameter_ident(context.rules, &argument.name))?;
        if method.is_virtual && kind.is_class() {
            names.claim(&argument.name, raw_local(&ident))?;
        }

        let argument_ownership = ownership.argument(&argument.name);
        let by_reference = match argument_ownership {
            Some(rule) if kind.is_class() && method.is_virtual => rule.releases_after_virtual_call(),
            Some(rule) if kind.is_class() => !rule.consumes_argument(),
            _ => false,
        };

        let default = match (&argument.default_value, method.is_virtual) {
            (Some(literal), false) => {
                let rendered = match Value::parse_default(literal) {
                    Some(value) => {
                        render_default(&context.mapper, &context.layout, &value, &kind, type_context)
                    }
                    None => Err(format!("'{literal}' is not a literal the generator understands")),
                };

                if let Err(reason) = &rendered {
                    warnings.push(GeneratorWarning::new(
                        format!("{} = {literal}: {reason}", argument.name),
                        location,
                        WarningKind::UnparsedDefaultValue,
                    ));
                }

                Some(rendered)
            }
            _ => None,
        };

        params.push(ParamPlan {
            schema_name: argument.name.to_owned(),
            ident,
            ownership: argument_ownership,
            by_reference,
            default,
            structable: context
                .rules
                .structable(owner, &method.name, &argument.name)
                .map(str::to_owned),
            kind,
        });
    }

    if method.is_vararg {
        names.claim("...", String::from("args"))?;
    }

    let return_kind = if method.returns_value() {
        let kind = context
            .mapper
            .parse(&method.return_type, &method.return_meta)
            .map_err(|error| {
                located(error, SchemaLocation::parameter(owner, &method.name, RETURN_VALUE))
            })?;
        Some(kind)
    } else {
        None
    };

    Ok(MethodPlan {
        method,
        owner: owner.to_owned(),
        ident,
        receiver,
        params,
        return_kind,
        return_ownership: ownership.return_value,
        return_structable: context
            .rules
            .structable(owner, &method.name, RETURN_VALUE)
            .map(str::to_owned),
        bind_index,
    })
}

// Raw call frame value for one argument, plus the statement to run once the call returns
fn native_argument(
    context: &EmitContext,
    plan: &MethodPlan,
    param: &ParamPlan,
) -> Result<(String, Option<String>), GeneratorError> {
    if !param.kind.is_class() {
        let expr = context.mapper.convert_to_native(&param.kind, &param.ident)?;
        return Ok((expr, None));
    }

    let Some(ownership) = param.ownership else {
        return Err(GeneratorError::generator_error(format!(
            "{}.{}({}) is a class handle without a resolved ownership rule",
            plan.owner, plan.method.name, param.schema_name
        )));
    };

    let unwrap = ownership.unwrap_argument(&param.ident);
    Ok((unwrap.expr, unwrap.after_call))
}

// Advanced-layer value built from the raw `raw` returned by the call
fn native_return(
    context: &EmitContext,
    plan: &MethodPlan,
    kind: &TypeKind,
    raw: &str,
    type_context: TypeContext,
) -> Result<String, GeneratorError> {
    if !kind.is_class() {
        return Ok(context.mapper.convert_from_native(kind, raw, type_context));
    }

    let Some(ownership) = plan.return_ownership else {
        return Err(GeneratorError::generator_error(format!(
            "{}.{} returns a class handle without a resolved ownership rule",
            plan.owner, plan.method.name
        )));
    };

    let object = ownership
        .wrap_return(raw, plan.receiver.lifetime_owner().as_deref())
        .map_err(|error| {
            located(
                error,
                SchemaLocation::parameter(&plan.owner, &plan.method.name, RETURN_VALUE),
            )
        })?;

    Ok(context.mapper.convert_from_native(kind, &object, type_context))
}

fn advanced_signature(context: &EmitContext, plan: &MethodPlan, type_context: TypeContext) -> String {
    let mut params = Vec::with_capacity(plan.params.len() + 2);
    if plan.receiver.takes_self() {
        params.push(String::from("&self"));
    }

    for param in &plan.params {
        params.push(format!("{}: {}", param.ident, param.advanced_type(context, type_context)));
    }

    if plan.method.is_vararg {
        params.push(String::from("args: &[gd::Variant]"));
    }

    let mut signature = format!("pub fn {}({})", plan.ident, params.join(", "));
    if plan.method.is_vararg {
        signature.push_str(" -> Result<gd::Variant, gd::CallError>");
    } else if let Some(kind) = &plan.return_kind {
        signature.push_str(" -> ");
        signature.push_str(&context.mapper.advanced_type(kind, type_context));
    }

    signature
}

/// Advanced-layer wrapper: a fixed-arity ptrcall, or a vararg call for vararg methods.
pub fn emit_advanced_method(
    emitter: &mut RustEmitter,
    context: &EmitContext,
    plan: &MethodPlan,
    type_context: TypeContext,
) -> Result<(), GeneratorError> {
    let body = if plan.method.is_vararg {
        varcall_body(context, plan)?
    } else {
        ptrcall_body(context, plan, type_context)?
    };

    emitter.emit_blank();
    emitter.block(&advanced_signature(context, plan, type_context), |emitter| {
        for line in &body {
            emitter.emit_line(line);
        }
    });

    Ok(())
}

fn ptrcall_body(
    context: &EmitContext,
    plan: &MethodPlan,
    type_context: TypeContext,
) -> Result<Vec<String>, GeneratorError> {
    let mut body = vec![String::from("let mut frame = gd::CallFrame::new();")];
    let mut after_call = Vec::new();

    for param in &plan.params {
        let (expr, after) = native_argument(context, plan, param)?;
        body.push(format!("frame.arg({expr});"));
        after_call.extend(after);
    }

    let bind = plan.bind_expr()?;
    match plan.receiver.object_expr() {
        Some(object) => {
            body.push(format!("gd::sys::method_bind_ptrcall({bind}, {object}, &mut frame);"))
        }
        None => body.push(format!("gd::sys::utility_ptrcall({bind}, &mut frame);")),
    }
    body.extend(after_call);

    match &plan.return_kind {
        Some(kind) => {
            body.push(format!("let r_ret = frame.ret::<{}>();", context.mapper.raw_type(kind)));
            body.push(String::from("frame.free();"));
            body.push(native_return(context, plan, kind, "r_ret", type_context)?);
        }
        None => body.push(String::from("frame.free();")),
    }

    Ok(body)
}

fn varcall_body(context: &EmitContext, plan: &MethodPlan) -> Result<Vec<String>, GeneratorError> {
    let mut body = vec![format!(
        "let mut variants = Vec::with_capacity({} + args.len());",
        plan.params.len()
    )];
    let mut after_call = Vec::new();

    for param in &plan.params {
        let variant = match &param.kind {
            TypeKind::Class(_) => {
                let (expr, after) = native_argument(context, plan, param)?;
                after_call.extend(after);
                format!("gd::Variant::from_object_ptr({expr})")
            }
            TypeKind::Enum(_) => format!("gd::Variant::from({}.0)", param.ident),
            _ => format!("gd::Variant::from({})", param.ident),
        };
        body.push(format!("variants.push({variant});"));
    }
    body.push(String::from("variants.extend_from_slice(args);"));

    let bind = plan.bind_expr()?;
    let call = match plan.receiver.object_expr() {
        Some(object) => format!("gd::sys::method_bind_call({bind}, {object}, &variants)"),
        None => format!("gd::sys::utility_call({bind}, &variants)"),
    };

    if after_call.is_empty() {
        body.push(call);
    } else {
        body.push(format!("let r_ret = {call};"));
        body.extend(after_call);
        body.push(String::from("r_ret"));
    }

    Ok(body)
}

/// Thunk constructor for a virtual method, emitted inside `impl Virtuals`.
/// The adapter closure gets the implementation state, the engine object the call was made on
/// (`p_self`), the argument frame and the return slot.
pub fn emit_virtual(
    emitter: &mut RustEmitter,
    context: &EmitContext,
    plan: &MethodPlan,
    type_context: TypeContext,
) -> Result<(), GeneratorError> {
    let mut argument_types = vec![String::from("&mut T")];
    let mut unpack = Vec::with_capacity(plan.params.len() * 2);
    let mut releases = Vec::new();

    for (index, param) in plan.params.iter().enumerate() {
        argument_types.push(param.advanced_type(context, type_context));
        let raw_type = context.mapper.raw_type(&param.kind);

        if !param.kind.is_class() {
            let raw = format!("p_args.get::<{raw_type}>({index})");
            unpack.push(format!(
                "let {} = {};",
                param.ident,
                context.mapper.convert_from_native(&param.kind, &raw, type_context)
            ));
            continue;
        }

        let location = SchemaLocation::parameter(&plan.owner, &plan.method.name, &param.schema_name);
        let Some(ownership) = param.ownership else {
            return Err(located(
                GeneratorError::generator_error("Virtual argument handle has no resolved ownership rule"),
                location,
            ));
        };

        let raw = raw_local(&param.ident);
        let object = ownership
            .wrap_return(&raw, Some("p_self"))
            .map_err(|error| located(error, location))?;
        unpack.push(format!("let {raw} = p_args.get::<{raw_type}>({index});"));
        unpack.push(format!(
            "let {} = {};",
            param.ident,
            context.mapper.convert_from_native(&param.kind, &object, type_context)
        ));

        if ownership.releases_after_virtual_call() {
            releases.push(format!("gd::pointers::release({raw});"));
        }
    }

    let mut call_arguments = vec![String::from("this")];
    call_arguments.extend(plan.params.iter().map(|param| {
        if param.by_reference {
            format!("&{}", param.ident)
        } else {
            param.ident.to_owned()
        }
    }));
    let call = format!("implementation({})", call_arguments.join(", "));

    let mut body = unpack;
    let implementation_type = match &plan.return_kind {
        Some(kind) => {
            body.push(format!("let ret = {call};"));
            body.extend(releases);

            let written = if kind.is_class() {
                let Some(ownership) = plan.return_ownership else {
                    return Err(located(
                        GeneratorError::generator_error("Virtual return handle has no resolved ownership rule"),
                        plan.location(),
                    ));
                };
                ownership.unwrap_virtual_return("ret")
            } else {
                context.mapper.convert_to_native_owned(kind, "ret")?
            };
            body.push(format!("p_ret.set({written});"));

            format!(
                "fn({}) -> {}",
                argument_types.join(", "),
                context.mapper.advanced_type(kind, type_context)
            )
        }
        None => {
            body.push(format!("{call};"));
            body.extend(releases);
            format!("fn({})", argument_types.join(", "))
        }
    };

    emitter.emit_blank();
    emitter.block(
        &format!(
            "pub fn {}<T>(implementation: {implementation_type}) -> gd::sys::VirtualThunk<T>",
            plan.ident
        ),
        |emitter| {
            emitter.emit_line(&format!(
                "gd::sys::VirtualThunk::new({}, move |this, p_self, p_args, p_ret| {{",
                string_literal(&plan.method.name)
            ));
            emitter.with_indent(|emitter| {
                for line in &body {
                    emitter.emit_line(line);
                }
            });
            emitter.emit_line("})");
        },
    );

    Ok(())
}

/// Instance-layer delegate. `handle` is the path of the advanced-layer type the call goes through.
/// Parameters with a rendered default are dropped and the default is passed in their place.
pub fn emit_instance_method(
    emitter: &mut RustEmitter,
    context: &EmitContext,
    plan: &MethodPlan,
    handle: &str,
    type_context: TypeContext,
) -> Result<(), GeneratorError> {
    let target = match plan.receiver {
        Receiver::Instance => String::from("self.0."),
        Receiver::Static | Receiver::Singleton(_) => format!("{handle}::"),
        Receiver::None => {
            return Err(located(
                GeneratorError::generator_error("Utility functions have no instance layer"),
                plan.location(),
            ));
        }
    };

    let mut params = Vec::with_capacity(plan.params.len() + 2);
    if plan.receiver.takes_self() {
        params.push(String::from("&self"));
    }

    let mut arguments = Vec::with_capacity(plan.params.len() + 1);
    for param in &plan.params {
        if let Some(rendered) = param.rendered_default() {
            arguments.push(rendered.to_owned());
            continue;
        }

        params.push(format!("{}: {}", param.ident, param.instance_type(context, type_context)));
        arguments.push(param.from_instance(context, &param.ident, type_context));
    }

    if plan.method.is_vararg {
        params.push(String::from("args: &[gd::Variant]"));
        arguments.push(String::from("args"));
    }

    let call = format!("{target}{}({})", plan.ident, arguments.join(", "));

    let mut signature = format!("pub fn {}({})", plan.ident, params.join(", "));
    let body = if plan.method.is_vararg {
        signature.push_str(" -> Result<gd::Variant, gd::CallError>");
        call
    } else if let Some(kind) = &plan.return_kind {
        let structable = plan.return_structable.as_deref();
        signature.push_str(" -> ");
        signature.push_str(&context.mapper.instance_type(kind, type_context, structable));
        context.mapper.to_instance(kind, &call, type_context, structable)
    } else {
        format!("{call};")
    };

    emitter.emit_blank();
    emitter.block(&signature, |emitter| emitter.emit_line(&body));
    Ok(())
}

#[cfg(test)]
#[path = "tests/method_emitter_tests.rs"]
mod tests;
