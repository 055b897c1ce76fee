//! Shared builders for synthetic schemas used across unit tests.

use crate::schema::loader::parse_schema;
use crate::schema::model::{
    ArgumentDescriptor, ClassDescriptor, ClassKind, MethodDescriptor, Schema,
};
use std::path::Path;

pub(crate) const MINI_API: &str = include_str!("../../tests/fixtures/mini_extension_api.json");

pub(crate) fn mini_schema() -> Schema {
    parse_schema(MINI_API, Path::new("mini_extension_api.json"), "float_64")
        .expect("fixture schema should parse")
}

pub(crate) fn class(name: &str, inherits: &str) -> ClassDescriptor {
    ClassDescriptor::new(name, inherits, ClassKind::Engine)
}

pub(crate) fn ref_counted_class(name: &str, inherits: &str) -> ClassDescriptor {
    let mut class = class(name, inherits);
    class.is_ref_counted = true;
    class
}

pub(crate) fn method(name: &str, arguments: &[(&str, &str)], return_type: &str) -> MethodDescriptor {
    let mut method = MethodDescriptor::new(name);
    method.return_type = return_type.to_owned();
    method.hash = Some(1_000 + name.len() as u64);
    method.arguments = arguments
        .iter()
        .map(|(name, type_name)| ArgumentDescriptor::new(name, type_name))
        .collect();
    method
}

pub(crate) fn virtual_method(
    name: &str,
    arguments: &[(&str, &str)],
    return_type: &str,
) -> MethodDescriptor {
    let mut method = method(name, arguments, return_type);
    method.is_virtual = true;
    method.hash = None;
    method
}

/// `Foo` (root, not ref-counted) with `Foo.bar(x: Foo) -> Foo`.
pub(crate) fn foo_bar_schema() -> Schema {
    let mut foo = class("Foo", "");
    foo.methods.push(method("bar", &[("x", "Foo")], "Foo"));
    Schema::from_classes(vec![foo])
}
