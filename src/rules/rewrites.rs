//! Schema graph rewrites: method relocations and enum re-hosting.
//!
//! Runs once, before emission, and is idempotent. Every applied rewrite is validated against
//! the rewritten schema.

use crate::generator_messages::generator_errors::{ErrorType, GeneratorError, SchemaLocation};
use crate::generator_messages::generator_warnings::{GeneratorWarning, WarningKind};
use crate::rules::Rules;
use crate::schema::model::{ArgumentDescriptor, MethodDescriptor, Schema};
use crate::{return_generator_error, return_rule_error, schema_log};

/// Moves a method declared on a singleton onto the class it logically belongs to.
/// The native call still goes through the original singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRelocation {
    pub from_class: String,
    pub method: String,
    pub to_class: String,
}

/// Re-hosts an enum under a new global name. `from` is `Owner.Enum` or a dotted global name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantTarget {
    // Emit inside a nested module with the prefix stripped
    Scope(String),
    Drop,
}

/// Redirects class constants whose name starts with `prefix`. `class` may be `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantRedirect {
    pub class: String,
    pub prefix: String,
    pub target: ConstantTarget,
}

/// Where one class constant ends up in the emitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantPlacement<'a> {
    Keep,
    Scope { module: &'a str, name: &'a str },
    Drop,
}

pub(crate) const METHOD_RELOCATIONS: &[(&str, &str, &str)] = &[
    ("OS", "get_keycode_string", "Input"),
    ("OS", "find_keycode_from_string", "Input"),
    ("DisplayServer", "mouse_get_position", "Input"),
];

pub(crate) const ENUM_RENAMES: &[(&str, &str)] = &[
    ("Variant.Type", "VariantType"),
    ("Variant.Operator", "VariantOperator"),
    ("GDExtension.InitializationLevel", "GDExtensionInitializationLevel"),
];

pub(crate) const CONSTANT_REDIRECTS: &[(&str, &str, Option<&str>)] = &[
    ("Object", "NOTIFICATION_PREDELETE", None),
    ("*", "NOTIFICATION_", Some("notification")),
];

impl Rules {
    /// First matching redirect wins.
    pub fn constant_placement<'a>(&'a self, class: &str, constant: &'a str) -> ConstantPlacement<'a> {
        for redirect in &self.constant_redirects {
            if redirect.class != "*" && redirect.class != class {
                continue;
            }

            let Some(stripped) = constant.strip_prefix(redirect.prefix.as_str()) else {
                continue;
            };

            return match &redirect.target {
                ConstantTarget::Drop => ConstantPlacement::Drop,
                ConstantTarget::Scope(module) if !stripped.is_empty() => ConstantPlacement::Scope {
                    module: module.as_str(),
                    name: stripped,
                },
                ConstantTarget::Scope(_) => ConstantPlacement::Keep,
            };
        }

        ConstantPlacement::Keep
    }
}

/// Applies every relocation and enum rename in table order.
/// Returns warnings for table entries that matched nothing.
pub fn apply_rewrites(schema: &mut Schema, rules: &Rules) -> Result<Vec<GeneratorWarning>, GeneratorError> {
    let mut warnings = Vec::new();

    for rename in &rules.enum_renames {
        if !rename_enum(schema, rename)? {
            warnings.push(GeneratorWarning::new(
                format!("enum {} -> {}", rename.from, rename.to),
                SchemaLocation::default(),
                WarningKind::StaleRelocation,
            ));
        }
    }

    for relocation in &rules.relocations {
        if !relocate_method(schema, relocation)? {
            warnings.push(GeneratorWarning::new(
                format!(
                    "{}.{} -> {}",
                    relocation.from_class, relocation.method, relocation.to_class
                ),
                SchemaLocation::member(&relocation.from_class, &relocation.method),
                WarningKind::StaleRelocation,
            ));
        }
    }

    validate_rewrites(schema, rules)?;
    Ok(warnings)
}

// Returns false when neither the source nor the target exists.
fn rename_enum(schema: &mut Schema, rename: &EnumRename) -> Result<bool, GeneratorError> {
    let target_exists = schema.global_enum(&rename.to).is_some();

    if let Some(index) = schema
        .global_enums
        .iter()
        .position(|enumeration| enumeration.name == rename.from)
    {
        if target_exists {
            return_rule_error!(
                Relocation,
                format!("Renaming enum {} would collide with existing enum {}", rename.from, rename.to),
                SchemaLocation::default()
            )
        }

        schema.global_enums[index].name = rename.to.to_owned();
    } else if let Some((owner, name)) = rename.from.split_once('.') {
        let Some(class) = schema.class_mut(owner) else {
            return Ok(target_exists);
        };
        let Some(index) = class.enums.iter().position(|enumeration| enumeration.name == name) else {
            return Ok(target_exists);
        };

        if target_exists {
            return_rule_error!(
                Relocation,
                format!("Re-hosting enum {} would collide with existing enum {}", rename.from, rename.to),
                SchemaLocation::class(owner)
            )
        }

        let mut enumeration = class.enums.remove(index);
        enumeration.name = rename.to.to_owned();
        schema.global_enums.push(enumeration);
    } else {
        return Ok(target_exists);
    }

    schema_log!("Re-hosted enum ", rename.from.to_owned(), " as ", Green rename.to.to_owned());
    rewrite_enum_references(schema, &rename.from, &rename.to);
    Ok(true)
}

fn rewrite_enum_references(schema: &mut Schema, from: &str, to: &str) {
    let from_enum = format!("enum::{from}");
    let from_bitfield = format!("bitfield::{from}");
    let to_enum = format!("enum::{to}");
    let to_bitfield = format!("bitfield::{to}");

    let rewrite = |type_name: &mut String| {
        if *type_name == from_enum {
            *type_name = to_enum.to_owned();
        } else if *type_name == from_bitfield {
            *type_name = to_bitfield.to_owned();
        }
    };

    let rewrite_arguments = |arguments: &mut Vec<ArgumentDescriptor>| {
        for argument in arguments {
            rewrite(&mut argument.type_name);
        }
    };

    let rewrite_methods = |methods: &mut Vec<MethodDescriptor>| {
        for method in methods {
            rewrite(&mut method.return_type);
            rewrite_arguments(&mut method.arguments);
        }
    };

    for class in schema.classes.iter_mut().chain(schema.builtin_classes.iter_mut()) {
        rewrite_methods(&mut class.methods);
        for property in &mut class.properties {
            rewrite(&mut property.type_name);
        }
        for signal in &mut class.signals {
            rewrite_arguments(&mut signal.arguments);
        }
    }

    rewrite_methods(&mut schema.utility_functions);
}

// Returns false when neither the source method nor an earlier relocation is found.
fn relocate_method(schema: &mut Schema, relocation: &MethodRelocation) -> Result<bool, GeneratorError> {
    let source_index = schema.class(&relocation.from_class).and_then(|class| {
        class
            .methods
            .iter()
            .position(|method| method.name == relocation.method)
    });

    let Some(source_index) = source_index else {
        let already_moved = schema
            .class(&relocation.to_class)
            .and_then(|class| class.method(&relocation.method))
            .is_some_and(|method| method.relocated_from.as_deref() == Some(relocation.from_class.as_str()));
        return Ok(already_moved);
    };

    let location = SchemaLocation::member(&relocation.from_class, &relocation.method);

    let Some(target) = schema.class(&relocation.to_class) else {
        return_rule_error!(
            Relocation,
            format!(
                "Relocation target class {} does not exist for {}.{}",
                relocation.to_class, relocation.from_class, relocation.method
            ),
            location,
            { GenerationStage => "Schema Rewrite" }
        )
    };

    if target.method(&relocation.method).is_some() {
        return_rule_error!(
            Relocation,
            format!(
                "{}.{} already exists, relocating {}.{} would collide with it",
                relocation.to_class, relocation.method, relocation.from_class, relocation.method
            ),
            location,
            { GenerationStage => "Schema Rewrite" }
        )
    }

    let source_is_singleton = schema
        .class(&relocation.from_class)
        .is_some_and(|class| class.is_singleton);

    let Some(source) = schema.class_mut(&relocation.from_class) else {
        return_generator_error!(format!(
            "Relocation source {} vanished during the rewrite pass",
            relocation.from_class
        ));
    };

    if !source_is_singleton && !source.methods[source_index].is_static {
        return_rule_error!(
            Relocation,
            format!(
                "{}.{} needs an instance of {}, only singleton or static methods can be relocated",
                relocation.from_class, relocation.method, relocation.from_class
            ),
            location,
            { GenerationStage => "Schema Rewrite" }
        )
    }

    let mut method = source.methods.remove(source_index);
    method.relocated_from = Some(relocation.from_class.to_owned());

    let Some(target) = schema.class_mut(&relocation.to_class) else {
        return_generator_error!(format!(
            "Relocation target {} vanished during the rewrite pass",
            relocation.to_class
        ));
    };
    target.methods.push(method);

    schema_log!(
        "Relocated ", relocation.from_class.to_owned(), ".", relocation.method.to_owned(),
        " to ", Green relocation.to_class.to_owned()
    );
    Ok(true)
}

// Every rewrite that applied must be visible in the rewritten schema
fn validate_rewrites(schema: &Schema, rules: &Rules) -> Result<(), GeneratorError> {
    for relocation in &rules.relocations {
        let still_on_source = schema
            .class(&relocation.from_class)
            .and_then(|class| class.method(&relocation.method))
            .is_some();

        if still_on_source {
            return Err(GeneratorError::new(
                format!(
                    "{}.{} was not moved to {}",
                    relocation.from_class, relocation.method, relocation.to_class
                ),
                SchemaLocation::member(&relocation.from_class, &relocation.method),
                ErrorType::Relocation,
            ));
        }
    }

    for rename in &rules.enum_renames {
        let source_left = match rename.from.split_once('.') {
            Some((owner, name)) => schema
                .class(owner)
                .is_some_and(|class| class.enums.iter().any(|e| e.name == name)),
            None => false,
        } || schema.global_enum(&rename.from).is_some();

        if source_left {
            return Err(GeneratorError::new(
                format!("Enum {} was not re-hosted as {}", rename.from, rename.to),
                SchemaLocation::default(),
                ErrorType::Relocation,
            ));
        }
    }

    Ok(())
}

/// Constant redirects for a specific class that match nothing in the schema.
pub fn audit_constant_redirects(schema: &Schema, rules: &Rules) -> Vec<GeneratorWarning> {
    rules
        .constant_redirects
        .iter()
        .filter(|redirect| redirect.class != "*")
        .filter(|redirect| {
            !schema.class(&redirect.class).is_some_and(|class| {
                class
                    .constants
                    .iter()
                    .any(|constant| constant.name.starts_with(&redirect.prefix))
            })
        })
        .map(|redirect| {
            GeneratorWarning::new(
                format!("{}.{}*", redirect.class, redirect.prefix),
                SchemaLocation::class(&redirect.class),
                WarningKind::StaleConstantRedirect,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/rewrites_tests.rs"]
mod tests;
