//! Schema type strings to Rust types at the three binding layers, and the conversions between them.
//!
//! Raw: exactly what goes into a call frame, honouring `meta` widths.
//! Advanced: engine value types and class handles, with `i64`/`f64` scalars.
//! Instance: native Rust types where one exists (`String`, `Vec<T>`, records).
//!
//! Ownership of class handles is never decided here. The emitters apply `rules::ownership`.

use crate::generator_messages::generator_errors::{
    ErrorMetaDataKey, GeneratorError, SchemaLocation,
};
use crate::mapping::name_mapper::{module_ident, type_ident};
use crate::return_schema_error;
use crate::rules::Rules;
use crate::schema::model::Schema;

const VALUE_TYPES: &[&str] = &[
    "Vector2", "Vector2i", "Rect2", "Rect2i", "Vector3", "Vector3i", "Transform2D", "Vector4",
    "Vector4i", "Plane", "Quaternion", "AABB", "Basis", "Transform3D", "Projection", "Color", "RID",
];

const ENGINE_VALUES: &[&str] = &["Callable", "Signal", "Dictionary", "Array"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntMeta {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Char16,
    Char32,
}

impl IntMeta {
    pub fn parse(meta: &str) -> IntMeta {
        match meta {
            "int8" => IntMeta::Int8,
            "int16" => IntMeta::Int16,
            "int32" => IntMeta::Int32,
            "uint8" => IntMeta::Uint8,
            "uint16" => IntMeta::Uint16,
            "uint32" => IntMeta::Uint32,
            "uint64" => IntMeta::Uint64,
            "char16" => IntMeta::Char16,
            "char32" => IntMeta::Char32,
            _ => IntMeta::Int64,
        }
    }

    pub fn rust_type(self) -> &'static str {
        match self {
            IntMeta::Int8 => "i8",
            IntMeta::Int16 => "i16",
            IntMeta::Int32 => "i32",
            IntMeta::Int64 => "i64",
            IntMeta::Uint8 => "u8",
            IntMeta::Uint16 | IntMeta::Char16 => "u16",
            IntMeta::Uint32 | IntMeta::Char32 => "u32",
            IntMeta::Uint64 => "u64",
        }
    }

    pub fn byte_width(self) -> usize {
        match self {
            IntMeta::Int8 | IntMeta::Uint8 => 1,
            IntMeta::Int16 | IntMeta::Uint16 | IntMeta::Char16 => 2,
            IntMeta::Int32 | IntMeta::Uint32 | IntMeta::Char32 => 4,
            IntMeta::Int64 | IntMeta::Uint64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntMeta::Int8 | IntMeta::Int16 | IntMeta::Int32 | IntMeta::Int64
        )
    }

    /// Inclusive range of values representable at this width.
    pub fn range(self) -> (i128, i128) {
        let bits = self.byte_width() as u32 * 8;
        if self.is_signed() {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        } else {
            (0, (1i128 << bits) - 1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatMeta {
    Float32,
    Float64,
}

impl FloatMeta {
    // Scalar floats cross the boundary as doubles unless narrowed
    pub fn parse(meta: &str) -> FloatMeta {
        match meta {
            "float" => FloatMeta::Float32,
            _ => FloatMeta::Float64,
        }
    }

    pub fn rust_type(self) -> &'static str {
        match self {
            FloatMeta::Float32 => "f32",
            FloatMeta::Float64 => "f64",
        }
    }
}

/// The three string representations. They never convert into one another implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    // String
    Text,
    // StringName, interned
    Name,
    // NodePath
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedElement {
    Byte,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Vector2,
    Vector3,
    Vector4,
    Color,
}

impl PackedElement {
    fn from_array_name(name: &str) -> Option<PackedElement> {
        Some(match name {
            "PackedByteArray" => PackedElement::Byte,
            "PackedInt32Array" => PackedElement::Int32,
            "PackedInt64Array" => PackedElement::Int64,
            "PackedFloat32Array" => PackedElement::Float32,
            "PackedFloat64Array" => PackedElement::Float64,
            "PackedStringArray" => PackedElement::Text,
            "PackedVector2Array" => PackedElement::Vector2,
            "PackedVector3Array" => PackedElement::Vector3,
            "PackedVector4Array" => PackedElement::Vector4,
            "PackedColorArray" => PackedElement::Color,
            _ => return None,
        })
    }

    pub fn rust_type(self) -> &'static str {
        match self {
            PackedElement::Byte => "u8",
            PackedElement::Int32 => "i32",
            PackedElement::Int64 => "i64",
            PackedElement::Float32 => "f32",
            PackedElement::Float64 => "f64",
            PackedElement::Text => "String",
            PackedElement::Vector2 => "gd::Vector2",
            PackedElement::Vector3 => "gd::Vector3",
            PackedElement::Vector4 => "gd::Vector4",
            PackedElement::Color => "gd::Color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    // Class or builtin that declares the enum; None for global enums
    pub owner: Option<String>,
    pub owner_is_builtin: bool,
    pub name: String,
    pub is_bitfield: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Bool,
    Int(IntMeta),
    Float(FloatMeta),
    String(StringKind),

    // Plain value types copied by value, such as Vector2 or Color
    Value(String),

    // Engine-managed values such as Dictionary or Callable
    Engine(String),
    Variant,
    Packed {
        name: String,
        element: PackedElement,
    },
    TypedArray(Box<TypeKind>),
    Enum(EnumType),

    // Handle to an engine object
    Class(String),

    // Raw C pointer or native structure, passed through untouched
    Opaque(String),
}

impl TypeKind {
    pub fn is_class(&self) -> bool {
        matches!(self, TypeKind::Class(_))
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeKind::Class(name) => Some(name),
            _ => None,
        }
    }
}

/// The module a type is being named from. Paths into that module are shortened.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeContext<'a> {
    pub module: Option<&'a str>,
}

impl<'a> TypeContext<'a> {
    pub fn global() -> Self {
        TypeContext { module: None }
    }

    pub fn module(module: &'a str) -> Self {
        TypeContext {
            module: Some(module),
        }
    }

    fn is_current(&self, module: &str) -> bool {
        self.module == Some(module)
    }
}

pub struct TypeMapper<'a> {
    schema: &'a Schema,
    rules: &'a Rules,
}

impl<'a> TypeMapper<'a> {
    pub fn new(schema: &'a Schema, rules: &'a Rules) -> Self {
        TypeMapper { schema, rules }
    }

    /// Classifies a schema type string. `meta` refines scalar widths.
    pub fn parse(&self, type_name: &str, meta: &str) -> Result<TypeKind, GeneratorError> {
        if let Some(qualified) = type_name.strip_prefix("enum::") {
            return self.parse_enum(qualified, false);
        }

        if let Some(qualified) = type_name.strip_prefix("bitfield::") {
            return self.parse_enum(qualified, true);
        }

        if let Some(element) = type_name.strip_prefix("typedarray::") {
            // Property hints look like "24/17:Texture2D"
            let element = element.rsplit(':').next().unwrap_or(element);
            return Ok(TypeKind::TypedArray(Box::new(self.parse(element, "")?)));
        }

        if type_name.ends_with('*') {
            return Ok(TypeKind::Opaque(type_name.to_owned()));
        }

        let kind = match type_name {
            "bool" => TypeKind::Bool,
            "int" => TypeKind::Int(IntMeta::parse(meta)),
            "float" => TypeKind::Float(FloatMeta::parse(meta)),
            "String" => TypeKind::String(StringKind::Text),
            "StringName" => TypeKind::String(StringKind::Name),
            "NodePath" => TypeKind::String(StringKind::Path),
            "Variant" => TypeKind::Variant,
            name if VALUE_TYPES.contains(&name) => TypeKind::Value(name.to_owned()),
            name if ENGINE_VALUES.contains(&name) => TypeKind::Engine(name.to_owned()),
            name => {
                if let Some(element) = PackedElement::from_array_name(name) {
                    TypeKind::Packed {
                        name: name.to_owned(),
                        element,
                    }
                } else if self.schema.is_engine_class(name) {
                    TypeKind::Class(name.to_owned())
                } else if self.schema.native_structures.contains(name) {
                    TypeKind::Opaque(name.to_owned())
                } else {
                    return_schema_error!(
                        format!("Unknown type '{type_name}'"),
                        SchemaLocation::default(),
                        { FoundType => type_name }
                    )
                }
            }
        };

        Ok(kind)
    }

    fn parse_enum(&self, qualified: &str, is_bitfield: bool) -> Result<TypeKind, GeneratorError> {
        if self.schema.find_enum(qualified).is_none() {
            return Err(GeneratorError::schema_error(
                format!("Unknown enum '{qualified}'"),
                SchemaLocation::default(),
            )
            .with_metadata(ErrorMetaDataKey::FoundType, qualified));
        }

        let enum_type = match qualified.split_once('.') {
            Some((owner, name)) if self.schema.class(owner).is_some() || self.schema.builtin_class(owner).is_some() => {
                EnumType {
                    owner: Some(owner.to_owned()),
                    owner_is_builtin: !self.schema.is_engine_class(owner),
                    name: name.to_owned(),
                    is_bitfield,
                }
            }
            _ => EnumType {
                owner: None,
                owner_is_builtin: false,
                name: qualified.to_owned(),
                is_bitfield,
            },
        };

        Ok(TypeKind::Enum(enum_type))
    }

    pub fn raw_type(&self, kind: &TypeKind) -> String {
        match kind {
            TypeKind::Bool => String::from("bool"),
            TypeKind::Int(meta) => meta.rust_type().to_owned(),
            TypeKind::Float(meta) => meta.rust_type().to_owned(),
            TypeKind::String(StringKind::Text) => String::from("gd::sys::StringPtr"),
            TypeKind::String(StringKind::Name) => String::from("gd::sys::StringNamePtr"),
            TypeKind::String(StringKind::Path) => String::from("gd::sys::NodePathPtr"),
            TypeKind::Value(name) => value_type_path(name),
            TypeKind::Engine(name) => format!("gd::sys::{name}Ptr"),
            TypeKind::Variant => String::from("gd::sys::VariantPtr"),
            TypeKind::Packed { .. } => String::from("gd::sys::PackedArrayPtr"),
            TypeKind::TypedArray(_) => String::from("gd::sys::ArrayPtr"),
            TypeKind::Enum(_) => String::from("i64"),
            TypeKind::Class(_) => String::from("gd::sys::ObjectPtr"),
            TypeKind::Opaque(_) => String::from("gd::sys::OpaquePtr"),
        }
    }

    pub fn advanced_type(&self, kind: &TypeKind, context: TypeContext) -> String {
        match kind {
            TypeKind::Bool => String::from("bool"),
            TypeKind::Int(_) => String::from("i64"),
            TypeKind::Float(_) => String::from("f64"),
            TypeKind::String(StringKind::Text) => String::from("gd::GString"),
            TypeKind::String(StringKind::Name) => String::from("gd::StringName"),
            TypeKind::String(StringKind::Path) => String::from("gd::NodePath"),
            TypeKind::Value(name) => value_type_path(name),
            TypeKind::Engine(name) => format!("gd::{name}"),
            TypeKind::Variant => String::from("gd::Variant"),
            TypeKind::Packed { name, .. } => format!("gd::{name}"),
            TypeKind::TypedArray(element) => {
                format!("gd::TypedArray<{}>", self.advanced_type(element, context))
            }
            TypeKind::Enum(enum_type) => self.enum_path(enum_type, context),
            TypeKind::Class(name) => self.handle_path(name, context),
            TypeKind::Opaque(_) => String::from("gd::sys::OpaquePtr"),
        }
    }

    /// `structable` names a record type replacing a dictionary at this position.
    pub fn instance_type(&self, kind: &TypeKind, context: TypeContext, structable: Option<&str>) -> String {
        match (kind, structable) {
            (TypeKind::Engine(name), Some(record)) if name == "Dictionary" => {
                format!("gd::structs::{record}")
            }
            (TypeKind::String(StringKind::Text), _) => String::from("String"),
            (TypeKind::String(StringKind::Name), _) => String::from("gd::Name"),
            (TypeKind::String(StringKind::Path), _) => String::from("gd::Path"),
            (TypeKind::Packed { element, .. }, _) => format!("Vec<{}>", element.rust_type()),
            (TypeKind::TypedArray(element), _) => {
                format!("Vec<{}>", self.instance_type(element, context, None))
            }
            (TypeKind::Class(name), _) => self.instance_path(name, context),
            _ => self.advanced_type(kind, context),
        }
    }

    /// Advanced-layer value to the raw call frame representation.
    /// Class handles go through their ownership rule instead and are refused here.
    pub fn convert_to_native(&self, kind: &TypeKind, expr: &str) -> Result<String, GeneratorError> {
        Ok(match kind {
            TypeKind::Int(IntMeta::Int64) | TypeKind::Float(FloatMeta::Float64) => expr.to_owned(),
            TypeKind::Int(meta) => format!("{expr} as {}", meta.rust_type()),
            TypeKind::Float(meta) => format!("{expr} as {}", meta.rust_type()),
            TypeKind::Bool | TypeKind::Value(_) | TypeKind::Opaque(_) => expr.to_owned(),
            TypeKind::String(_)
            | TypeKind::Engine(_)
            | TypeKind::Variant
            | TypeKind::Packed { .. }
            | TypeKind::TypedArray(_) => format!("{expr}.as_ptr()"),
            TypeKind::Enum(_) => format!("{expr}.0"),
            TypeKind::Class(name) => {
                return Err(GeneratorError::generator_error(format!(
                    "Handle of class {name} must be unwrapped through its ownership rule"
                )));
            }
        })
    }

    /// Like `convert_to_native`, but the engine takes ownership of the value.
    /// Used where the advanced-layer value would otherwise be dropped before the engine reads it.
    pub fn convert_to_native_owned(&self, kind: &TypeKind, expr: &str) -> Result<String, GeneratorError> {
        match kind {
            TypeKind::String(_)
            | TypeKind::Engine(_)
            | TypeKind::Variant
            | TypeKind::Packed { .. }
            | TypeKind::TypedArray(_) => Ok(format!("{expr}.into_raw()")),
            _ => self.convert_to_native(kind, expr),
        }
    }

    /// Raw call frame value to the advanced layer.
    /// For class handles `expr` is the `gd::Object` produced by the ownership rule.
    pub fn convert_from_native(&self, kind: &TypeKind, expr: &str, context: TypeContext) -> String {
        match kind {
            TypeKind::Int(IntMeta::Int64) | TypeKind::Float(FloatMeta::Float64) => expr.to_owned(),
            TypeKind::Int(IntMeta::Uint64) => format!("{expr} as i64"),
            TypeKind::Int(_) => format!("i64::from({expr})"),
            TypeKind::Float(_) => format!("f64::from({expr})"),
            TypeKind::Bool | TypeKind::Value(_) | TypeKind::Opaque(_) => expr.to_owned(),
            TypeKind::TypedArray(_) => format!("gd::TypedArray::from_raw({expr})"),
            TypeKind::String(_) | TypeKind::Engine(_) | TypeKind::Variant | TypeKind::Packed { .. } => {
                format!("{}::from_raw({expr})", self.advanced_type(kind, context))
            }
            TypeKind::Enum(enum_type) => format!("{}({expr})", self.enum_path(enum_type, context)),
            TypeKind::Class(name) => format!("{}::from_object({expr})", self.handle_path(name, context)),
        }
    }

    /// Advanced-layer value to the instance layer.
    pub fn to_instance(&self, kind: &TypeKind, expr: &str, context: TypeContext, structable: Option<&str>) -> String {
        match (kind, structable) {
            (TypeKind::Engine(name), Some(record)) if name == "Dictionary" => {
                format!("gd::structs::{record}::from_dictionary(&{expr})")
            }
            (TypeKind::String(StringKind::Text), _) => format!("{expr}.to_string()"),
            (TypeKind::String(StringKind::Name), _) => format!("gd::Name::from(&{expr})"),
            (TypeKind::String(StringKind::Path), _) => format!("gd::Path::from(&{expr})"),
            (TypeKind::Packed { element: PackedElement::Text, .. }, _) => {
                format!("{expr}.to_vec().into_iter().map(|item| item.to_string()).collect::<Vec<_>>()")
            }
            (TypeKind::Packed { .. }, _) => format!("{expr}.to_vec()"),
            (TypeKind::TypedArray(element), _) => {
                let item = self.to_instance(element, "item", context, None);
                if item == "item" {
                    format!("{expr}.to_vec()")
                } else {
                    format!("{expr}.to_vec().into_iter().map(|item| {item}).collect::<Vec<_>>()")
                }
            }
            (TypeKind::Class(name), _) => format!("{}({expr})", self.instance_path(name, context)),
            _ => expr.to_owned(),
        }
    }

    /// Instance-layer value to the advanced layer.
    pub fn from_instance(&self, kind: &TypeKind, expr: &str, context: TypeContext, structable: Option<&str>) -> String {
        match (kind, structable) {
            (TypeKind::Engine(name), Some(_)) if name == "Dictionary" => {
                format!("{expr}.to_dictionary()")
            }
            (TypeKind::String(StringKind::Text), _) => format!("gd::GString::from({expr}.as_str())"),
            (TypeKind::String(StringKind::Name), _) => format!("gd::StringName::from(&{expr})"),
            (TypeKind::String(StringKind::Path), _) => format!("gd::NodePath::from(&{expr})"),
            (TypeKind::Packed { name, element: PackedElement::Text }, _) => format!(
                "gd::{name}::from_iter({expr}.iter().map(|item| gd::GString::from(item.as_str())))"
            ),
            (TypeKind::Packed { name, .. }, _) => format!("gd::{name}::from_iter({expr})"),
            (TypeKind::TypedArray(element), _) => {
                let item = self.from_instance(element, "item", context, None);
                if item == "item" {
                    format!("gd::TypedArray::from_iter({expr})")
                } else {
                    format!("gd::TypedArray::from_iter({expr}.into_iter().map(|item| {item}))")
                }
            }
            (TypeKind::Class(_), _) => format!("{expr}.0"),
            _ => expr.to_owned(),
        }
    }

    /// Path to the handle struct of `class`.
    pub fn handle_path(&self, class: &str, context: TypeContext) -> String {
        let module = module_ident(self.rules, class);
        if context.is_current(&module) {
            type_ident(class)
        } else {
            format!("super::{}", type_ident(class))
        }
    }

    /// Path to the instance-layer wrapper of `class`.
    pub fn instance_path(&self, class: &str, context: TypeContext) -> String {
        let module = module_ident(self.rules, class);
        if context.is_current(&module) {
            String::from("Instance")
        } else {
            format!("super::{module}::Instance")
        }
    }

    pub fn enum_path(&self, enum_type: &EnumType, context: TypeContext) -> String {
        let ident = type_ident(&enum_type.name);

        match &enum_type.owner {
            None => format!("super::enums::{ident}"),
            Some(owner) if enum_type.owner_is_builtin => {
                format!("gd::{}::{ident}", module_ident(self.rules, owner))
            }
            Some(owner) => {
                let module = module_ident(self.rules, owner);
                if context.is_current(&module) {
                    ident
                } else {
                    format!("super::{module}::{ident}")
                }
            }
        }
    }
}

fn value_type_path(name: &str) -> String {
    match name {
        "AABB" => String::from("gd::Aabb"),
        "RID" => String::from("gd::Rid"),
        _ => format!("gd::{name}"),
    }
}

#[cfg(test)]
#[path = "tests/type_mapper_tests.rs"]
mod tests;
