//! Ownership strategies for handles crossing the native boundary, and their resolution.
//!
//! Every class-typed argument or return value resolves to exactly one `Ownership`,
//! either from the table or from the ref-counted default. Anything else is a build error.

use crate::generator_messages::generator_errors::{
    ErrorMetaDataKey, ErrorType, GeneratorError, SchemaLocation,
};
use crate::generator_messages::generator_warnings::{GeneratorWarning, WarningKind};
use crate::ownership_log;
use crate::rules::Rules;
use crate::schema::hierarchy::is_ref_counted;
use crate::schema::model::{MethodDescriptor, Schema};
use crate::settings::GLOBAL_SCOPE_CLASS;
use rustc_hash::FxHashMap;
use std::fmt;

pub const RETURN_VALUE: &str = "return value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    // Normal reference counting applies on both sides
    RefCountedManagement,

    // Arguments: the callee takes the handle. Returns: the caller must release it
    OwnershipTransferred,

    // The callee hands ownership of the argument back to the caller
    ReversesTheOwnership,

    // Borrowed for the duration of the call only
    IsTemporaryReference,

    // The object may already be freed; check liveness through its instance id before use
    MustAssertInstanceID,

    // Lives exactly as long as the receiver
    LifetimeBoundToClass,
}

/// Statements emitted around one argument of a native call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentUnwrap {
    pub expr: String,
    pub after_call: Option<String>,
}

impl Ownership {
    pub fn name(self) -> &'static str {
        match self {
            Ownership::RefCountedManagement => "RefCountedManagement",
            Ownership::OwnershipTransferred => "OwnershipTransferred",
            Ownership::ReversesTheOwnership => "ReversesTheOwnership",
            Ownership::IsTemporaryReference => "IsTemporaryReference",
            Ownership::MustAssertInstanceID => "MustAssertInstanceID",
            Ownership::LifetimeBoundToClass => "LifetimeBoundToClass",
        }
    }

    /// Raw pointer expression for a handle passed into a native call.
    pub fn unwrap_argument(self, handle: &str) -> ArgumentUnwrap {
        match self {
            Ownership::OwnershipTransferred | Ownership::LifetimeBoundToClass => ArgumentUnwrap {
                expr: format!("gd::pointers::end({handle}.into_object())"),
                after_call: None,
            },
            Ownership::ReversesTheOwnership => ArgumentUnwrap {
                expr: format!("gd::pointers::get({handle}.object())"),
                after_call: Some(format!("gd::pointers::reclaim({handle}.object());")),
            },
            Ownership::MustAssertInstanceID => ArgumentUnwrap {
                expr: format!("gd::pointers::get_checked({handle}.object())"),
                after_call: None,
            },
            Ownership::IsTemporaryReference | Ownership::RefCountedManagement => ArgumentUnwrap {
                expr: format!("gd::pointers::get({handle}.object())"),
                after_call: None,
            },
        }
    }

    /// True when the native call takes the handle over. Every other rule only borrows it,
    /// so the wrapper takes the handle by reference.
    pub fn consumes_argument(self) -> bool {
        match self {
            Ownership::OwnershipTransferred | Ownership::LifetimeBoundToClass => true,
            Ownership::RefCountedManagement
            | Ownership::ReversesTheOwnership
            | Ownership::IsTemporaryReference
            | Ownership::MustAssertInstanceID => false,
        }
    }

    /// `gd::Object` expression wrapping a raw pointer returned by a native call.
    /// `receiver` is the object the call was made on, when there is one.
    pub fn wrap_return(self, raw: &str, receiver: Option<&str>) -> Result<String, GeneratorError> {
        Ok(match self {
            Ownership::RefCountedManagement => format!("gd::Object::ref_counted({raw})"),
            Ownership::OwnershipTransferred | Ownership::ReversesTheOwnership => {
                format!("gd::Object::owned({raw})")
            }
            Ownership::IsTemporaryReference => format!("gd::Object::temporary({raw})"),
            Ownership::MustAssertInstanceID => {
                format!("gd::Object::must_assert_instance_id({raw})")
            }
            Ownership::LifetimeBoundToClass => {
                let Some(receiver) = receiver else {
                    return Err(GeneratorError::new(
                        "LifetimeBoundToClass needs a receiver, but the method has none",
                        SchemaLocation::default(),
                        ErrorType::UnresolvedOwnership,
                    ));
                };
                format!("gd::Object::lifetime_bound_to({receiver}, {raw})")
            }
        })
    }

    /// Temporary arguments handed to a virtual implementation are released right after it returns.
    pub fn releases_after_virtual_call(self) -> bool {
        match self {
            Ownership::IsTemporaryReference => true,
            Ownership::RefCountedManagement
            | Ownership::OwnershipTransferred
            | Ownership::ReversesTheOwnership
            | Ownership::MustAssertInstanceID
            | Ownership::LifetimeBoundToClass => false,
        }
    }

    /// Raw pointer written back to the engine from a virtual implementation's result.
    pub fn unwrap_virtual_return(self, handle: &str) -> String {
        match self {
            Ownership::OwnershipTransferred
            | Ownership::RefCountedManagement
            | Ownership::LifetimeBoundToClass => {
                format!("gd::pointers::end({handle}.into_object())")
            }
            Ownership::ReversesTheOwnership
            | Ownership::IsTemporaryReference
            | Ownership::MustAssertInstanceID => format!("gd::pointers::get({handle}.object())"),
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnershipKey {
    pub class: String,
    pub method: String,

    // Argument name or RETURN_VALUE
    pub position: String,
}

impl OwnershipKey {
    pub fn new(class: &str, method: &str, position: &str) -> Self {
        OwnershipKey {
            class: class.to_owned(),
            method: method.to_owned(),
            position: position.to_owned(),
        }
    }
}

impl fmt::Display for OwnershipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.class, self.method, self.position)
    }
}

/// Explicit ownership entries, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct OwnershipTable {
    entries: Vec<(OwnershipKey, Ownership)>,
    index: FxHashMap<OwnershipKey, usize>,
}

impl OwnershipTable {
    /// Builds the table, refusing a key that appears twice.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (OwnershipKey, Ownership)>,
    ) -> Result<Self, GeneratorError> {
        let mut table = OwnershipTable::default();
        for (key, ownership) in entries {
            table.insert(key, ownership)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, key: OwnershipKey, ownership: Ownership) -> Result<(), GeneratorError> {
        if let Some(existing) = self.index.get(&key) {
            let previous = self.entries[*existing].1;
            return Err(GeneratorError::new(
                format!("Ownership entry {key} is declared twice ({previous} and {ownership})"),
                SchemaLocation::parameter(&key.class, &key.method, &key.position),
                ErrorType::Generator,
            )
            .with_metadata(
                ErrorMetaDataKey::PrimarySuggestion,
                "Keep exactly one entry per class, method and position",
            ));
        }

        self.index.insert(key.to_owned(), self.entries.len());
        self.entries.push((key, ownership));
        Ok(())
    }

    pub fn get(&self, class: &str, method: &str, position: &str) -> Option<Ownership> {
        self.index
            .get(&OwnershipKey::new(class, method, position))
            .map(|index| self.entries[*index].1)
    }

    pub fn entries(&self) -> &[(OwnershipKey, Ownership)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved ownership for every class-typed position of one method.
/// Positions whose type is not a class are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodOwnership {
    pub arguments: FxHashMap<String, Ownership>,
    pub return_value: Option<Ownership>,
}

impl MethodOwnership {
    pub fn argument(&self, name: &str) -> Option<Ownership> {
        self.arguments.get(name).copied()
    }
}

/// Looks up one position: explicit entry first, then the ref-counted default.
/// None means the position is unresolved.
pub fn resolve(
    schema: &Schema,
    rules: &Rules,
    class: &str,
    method: &str,
    position: &str,
    type_name: &str,
) -> Option<Ownership> {
    if let Some(ownership) = rules.ownership.get(class, method, position) {
        return Some(ownership);
    }

    if is_ref_counted(schema, type_name, &rules.ref_counted_root) {
        return Some(Ownership::RefCountedManagement);
    }

    None
}

/// Resolves every class-typed position of `method`, declared on `class`.
/// Fails with one UnresolvedOwnership error listing every unresolved position.
pub fn resolve_method(
    schema: &Schema,
    rules: &Rules,
    class: &str,
    method: &MethodDescriptor,
) -> Result<MethodOwnership, GeneratorError> {
    let mut resolved = MethodOwnership::default();
    let mut unresolved_arguments: Vec<&str> = Vec::new();
    let mut unresolved_return = false;

    for argument in &method.arguments {
        if !schema.is_engine_class(&argument.type_name) {
            continue;
        }

        match resolve(schema, rules, class, &method.name, &argument.name, &argument.type_name) {
            Some(ownership) => {
                ownership_log!(Dark class, ".", method.name.to_owned(), "(", argument.name.to_owned(), ") -> ", Blue ownership.name());
                resolved.arguments.insert(argument.name.to_owned(), ownership);
            }
            None => unresolved_arguments.push(&argument.name),
        }
    }

    if method.returns_value() && schema.is_engine_class(&method.return_type) {
        match resolve(schema, rules, class, &method.name, RETURN_VALUE, &method.return_type) {
            Some(ownership) => resolved.return_value = Some(ownership),
            None => unresolved_return = true,
        }
    }

    if unresolved_arguments.is_empty() && !unresolved_return {
        return Ok(resolved);
    }

    let signature = unresolved_signature(class, method, &unresolved_arguments, unresolved_return);

    let mut positions = unresolved_arguments
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    if unresolved_return {
        positions.push(String::from(RETURN_VALUE));
    }

    Err(GeneratorError::new(
        format!(
            "Unresolved ownership for {class}.{}: {signature}",
            method.name
        ),
        SchemaLocation::parameter(class, &method.name, &positions.join(", ")),
        ErrorType::UnresolvedOwnership,
    )
    .with_metadata(ErrorMetaDataKey::GenerationStage, "Ownership Resolution")
    .with_metadata(
        ErrorMetaDataKey::PrimarySuggestion,
        format!(
            "Add an ownership entry for {} to the ownership table",
            positions
                .iter()
                .map(|position| format!("{class}.{}.{position}", method.name))
                .collect::<Vec<_>>()
                .join(" and ")
        ),
    ))
}

/// `Class::method(a, b?)Return?` with `?` after every unresolved position.
pub fn unresolved_signature(
    class: &str,
    method: &MethodDescriptor,
    unresolved_arguments: &[&str],
    unresolved_return: bool,
) -> String {
    let arguments = method
        .arguments
        .iter()
        .map(|argument| {
            if unresolved_arguments.contains(&argument.name.as_str()) {
                format!("{}?", argument.name)
            } else {
                argument.name.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut signature = format!("{class}::{}({arguments})", method.name);
    if method.returns_value() {
        signature.push_str(&method.return_type);
        if unresolved_return {
            signature.push('?');
        }
    }

    signature
}

/// Ownership totality over the whole schema, including utility functions.
/// Collects every failure instead of stopping at the first.
pub fn check_ownership_totality(schema: &Schema, rules: &Rules) -> Vec<GeneratorError> {
    let mut errors = Vec::new();

    for class in &schema.classes {
        for method in &class.methods {
            // Relocated methods keep the ownership entries of the class that declares them
            let owner = method.relocated_from.as_deref().unwrap_or(&class.name);
            if let Err(error) = resolve_method(schema, rules, owner, method) {
                errors.push(error);
            }
        }
    }

    for function in &schema.utility_functions {
        if let Err(error) = resolve_method(schema, rules, GLOBAL_SCOPE_CLASS, function) {
            errors.push(error);
        }
    }

    errors
}

/// Table entries that no longer match the schema, or that restate the ref-counted default.
pub fn audit_ownership_table(schema: &Schema, rules: &Rules) -> Vec<GeneratorWarning> {
    let mut findings = Vec::new();

    for (key, ownership) in rules.ownership.entries() {
        let location = SchemaLocation::parameter(&key.class, &key.method, &key.position);

        let method = if key.class == GLOBAL_SCOPE_CLASS {
            schema
                .utility_functions
                .iter()
                .find(|function| function.name == key.method)
        } else {
            match schema.class(&key.class) {
                Some(class) => class
                    .method(&key.method)
                    .or_else(|| relocated_method(schema, &key.class, &key.method)),
                None => {
                    findings.push(GeneratorWarning::new(
                        format!("{key}: class {} is not in the schema", key.class),
                        location,
                        WarningKind::UnusedOwnershipEntry,
                    ));
                    continue;
                }
            }
        };

        let Some(method) = method else {
            findings.push(GeneratorWarning::new(
                format!("{key}: method {} is not in the schema", key.method),
                location,
                WarningKind::UnusedOwnershipEntry,
            ));
            continue;
        };

        let type_name = if key.position == RETURN_VALUE {
            method.returns_value().then_some(method.return_type.as_str())
        } else {
            method
                .argument(&key.position)
                .map(|argument| argument.type_name.as_str())
        };

        let Some(type_name) = type_name else {
            findings.push(GeneratorWarning::new(
                format!("{key}: {} has no position {}", key.method, key.position),
                location,
                WarningKind::UnusedOwnershipEntry,
            ));
            continue;
        };

        if !schema.is_engine_class(type_name) {
            findings.push(GeneratorWarning::new(
                format!("{key}: {type_name} is not a class, so no ownership rule applies"),
                location,
                WarningKind::UnusedOwnershipEntry,
            ));
            continue;
        }

        if *ownership == Ownership::RefCountedManagement
            && is_ref_counted(schema, type_name, &rules.ref_counted_root)
        {
            findings.push(GeneratorWarning::new(
                format!("{key}: {type_name} is ref-counted, the entry repeats the default"),
                location,
                WarningKind::RedundantOwnershipEntry,
            ));
        }
    }

    findings
}

// A method moved off `class` by the rewrite pass
fn relocated_method<'a>(schema: &'a Schema, class: &str, method: &str) -> Option<&'a MethodDescriptor> {
    schema
        .classes
        .iter()
        .flat_map(|candidate| candidate.methods.iter())
        .find(|candidate| {
            candidate.name == method && candidate.relocated_from.as_deref() == Some(class)
        })
}

#[cfg(test)]
#[path = "tests/ownership_tests.rs"]
mod tests;
