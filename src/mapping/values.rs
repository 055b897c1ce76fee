//! Value-level marshalling: schema default literals, and the call-frame byte encoding of values.
//!
//! Default literals are rendered as advanced-layer Rust expressions. Before rendering, every
//! literal is encoded at the argument's native width, so a default that does not fit is refused.

use crate::mapping::type_mapper::{FloatMeta, IntMeta, StringKind, TypeContext, TypeKind, TypeMapper};
use crate::schema::model::Schema;
use rustc_hash::FxHashMap;

// Builtins whose values are a fixed list of scalar components
const COMPONENT_COUNTS: &[(&str, usize)] = &[
    ("Vector2", 2),
    ("Vector2i", 2),
    ("Rect2", 4),
    ("Rect2i", 4),
    ("Vector3", 3),
    ("Vector3i", 3),
    ("Transform2D", 6),
    ("Vector4", 4),
    ("Vector4i", 4),
    ("Plane", 4),
    ("Quaternion", 4),
    ("AABB", 6),
    ("Basis", 9),
    ("Transform3D", 12),
    ("Projection", 16),
    ("Color", 4),
];

/// A value known at generation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(StringKind, String),
    Vector {
        type_name: String,
        components: Vec<f64>,
    },

    // Default-constructed value of the named builtin, as `[]` or `RID()`
    Empty(String),
}

impl Value {
    /// Parses a schema `default_value` literal. None when the literal has no known form.
    pub fn parse_default(literal: &str) -> Option<Value> {
        let literal = literal.trim();

        match literal {
            "null" => return Some(Value::Nil),
            "true" => return Some(Value::Bool(true)),
            "false" => return Some(Value::Bool(false)),
            "[]" => return Some(Value::Empty(String::from("Array"))),
            "{}" => return Some(Value::Empty(String::from("Dictionary"))),
            _ => {}
        }

        if let Some(quoted) = literal.strip_prefix('&') {
            return unquote(quoted).map(|text| Value::String(StringKind::Name, text));
        }

        if literal.starts_with('"') {
            return unquote(literal).map(|text| Value::String(StringKind::Text, text));
        }

        if let Some(inner) = literal
            .strip_prefix("NodePath(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return unquote(inner.trim()).map(|text| Value::String(StringKind::Path, text));
        }

        // Typed array literals look like Array[StringName]([])
        if literal.starts_with("Array[") && literal.ends_with("([])") {
            return Some(Value::Empty(String::from("Array")));
        }

        if let Ok(int) = literal.parse::<i64>() {
            return Some(Value::Int(int));
        }

        if literal.starts_with(|ch: char| ch.is_ascii_digit() || ch == '-' || ch == '.')
            || matches!(literal, "inf" | "-inf" | "nan")
        {
            return literal.parse::<f64>().ok().map(Value::Float);
        }

        parse_constructor(literal)
    }
}

fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            text.push(ch);
            continue;
        }

        match chars.next()? {
            'n' => text.push('\n'),
            't' => text.push('\t'),
            escaped => text.push(escaped),
        }
    }

    Some(text)
}

// Type(a, b, ...) or Type()
fn parse_constructor(literal: &str) -> Option<Value> {
    let (name, rest) = literal.split_once('(')?;
    let arguments = rest.strip_suffix(')')?.trim();

    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }

    if arguments.is_empty() {
        return Some(Value::Empty(name.to_owned()));
    }

    let components = arguments
        .split(',')
        .map(|component| component.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;

    Some(Value::Vector {
        type_name: name.to_owned(),
        components,
    })
}

/// Builtin sizes of the selected build configuration, used to size vector components.
#[derive(Debug, Clone, Default)]
pub struct NativeLayout {
    sizes: FxHashMap<String, u32>,
}

impl NativeLayout {
    pub fn from_schema(schema: &Schema) -> Self {
        NativeLayout {
            sizes: schema.builtin_sizes.iter().cloned().collect(),
        }
    }

    // Byte width of one component; single precision when the size is not known
    fn component_width(&self, type_name: &str, count: usize) -> usize {
        if type_name.ends_with('i') || type_name == "Color" {
            return 4;
        }

        match self.sizes.get(type_name) {
            Some(size) if *size as usize == count * 8 => 8,
            _ => 4,
        }
    }
}

fn component_count(type_name: &str) -> Option<usize> {
    COMPONENT_COUNTS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, count)| *count)
}

/// Encodes `value` the way it is laid out in a call frame for an argument of `kind`.
/// Fails when the value does not fit the argument's width or type.
pub fn encode(value: &Value, kind: &TypeKind, layout: &NativeLayout) -> Result<Vec<u8>, String> {
    match (value, kind) {
        (Value::Bool(flag), TypeKind::Bool) => Ok(vec![u8::from(*flag)]),

        (Value::Int(int), TypeKind::Int(meta)) => encode_int(*int, *meta),
        (Value::Int(int), TypeKind::Enum(_)) => Ok(int.to_le_bytes().to_vec()),
        (Value::Int(int), TypeKind::Float(meta)) => encode_float(*int as f64, *meta),
        (Value::Float(float), TypeKind::Float(meta)) => encode_float(*float, *meta),

        (Value::String(_, text), TypeKind::String(_)) => {
            let length = u32::try_from(text.len())
                .map_err(|_| format!("string of {} bytes is too long", text.len()))?;
            let mut bytes = length.to_le_bytes().to_vec();
            bytes.extend_from_slice(text.as_bytes());
            Ok(bytes)
        }

        (Value::Vector { type_name, components }, TypeKind::Value(expected)) if type_name == expected => {
            let Some(count) = component_count(type_name) else {
                return Err(format!("{type_name} has no component layout"));
            };
            if components.len() != count {
                return Err(format!(
                    "{type_name} takes {count} components, found {}",
                    components.len()
                ));
            }

            let width = layout.component_width(type_name, count);
            let integral = type_name.ends_with('i');
            let mut bytes = Vec::with_capacity(count * width);

            for component in components {
                let encoded = if integral {
                    if component.fract() != 0.0 {
                        return Err(format!("{type_name} component {component} is not an integer"));
                    }
                    encode_int(*component as i64, IntMeta::Int32)?
                } else if width == 8 {
                    encode_float(*component, FloatMeta::Float64)?
                } else {
                    encode_float(*component, FloatMeta::Float32)?
                };
                bytes.extend(encoded);
            }

            Ok(bytes)
        }

        _ => Err(format!("{value:?} cannot be passed as {kind:?}")),
    }
}

fn encode_int(int: i64, meta: IntMeta) -> Result<Vec<u8>, String> {
    let (min, max) = meta.range();
    let wide = i128::from(int);

    if wide < min || wide > max {
        return Err(format!(
            "{int} does not fit {} (range {min} to {max})",
            meta.rust_type()
        ));
    }

    Ok(wide.to_le_bytes()[..meta.byte_width()].to_vec())
}

fn encode_float(float: f64, meta: FloatMeta) -> Result<Vec<u8>, String> {
    match meta {
        FloatMeta::Float64 => Ok(float.to_le_bytes().to_vec()),
        FloatMeta::Float32 => {
            if float.is_finite() && float.abs() > f64::from(f32::MAX) {
                return Err(format!("{float} does not fit f32"));
            }
            Ok((float as f32).to_le_bytes().to_vec())
        }
    }
}

/// Decodes call-frame bytes for `kind` back into a value.
pub fn decode(bytes: &[u8], kind: &TypeKind, layout: &NativeLayout) -> Result<Value, String> {
    match kind {
        TypeKind::Bool => match bytes {
            [flag] => Ok(Value::Bool(*flag != 0)),
            _ => Err(format!("bool takes 1 byte, found {}", bytes.len())),
        },

        TypeKind::Int(meta) => decode_int(bytes, *meta).map(Value::Int),
        TypeKind::Enum(_) => decode_int(bytes, IntMeta::Int64).map(Value::Int),
        TypeKind::Float(meta) => decode_float(bytes, *meta).map(Value::Float),

        TypeKind::String(string_kind) => {
            let Some((length, text)) = bytes.split_first_chunk::<4>() else {
                return Err(String::from("string is missing its length"));
            };
            if u32::from_le_bytes(*length) as usize != text.len() {
                return Err(String::from("string length does not match its bytes"));
            }
            let text = std::str::from_utf8(text).map_err(|e| format!("string is not UTF-8: {e}"))?;
            Ok(Value::String(*string_kind, text.to_owned()))
        }

        TypeKind::Value(type_name) => {
            let Some(count) = component_count(type_name) else {
                return Err(format!("{type_name} has no component layout"));
            };

            let width = layout.component_width(type_name, count);
            if bytes.len() != count * width {
                return Err(format!(
                    "{type_name} takes {} bytes, found {}",
                    count * width,
                    bytes.len()
                ));
            }

            let components = bytes
                .chunks_exact(width)
                .map(|chunk| {
                    if type_name.ends_with('i') {
                        decode_int(chunk, IntMeta::Int32).map(|int| int as f64)
                    } else if width == 8 {
                        decode_float(chunk, FloatMeta::Float64)
                    } else {
                        decode_float(chunk, FloatMeta::Float32)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::Vector {
                type_name: type_name.to_owned(),
                components,
            })
        }

        _ => Err(format!("{kind:?} has no fixed frame encoding")),
    }
}

fn decode_int(bytes: &[u8], meta: IntMeta) -> Result<i64, String> {
    let width = meta.byte_width();
    if bytes.len() != width {
        return Err(format!("{} takes {width} bytes, found {}", meta.rust_type(), bytes.len()));
    }

    // Sign or zero extend to 16 bytes
    let negative = meta.is_signed() && bytes[width - 1] & 0x80 != 0;
    let mut wide = if negative { [0xFF; 16] } else { [0; 16] };
    wide[..width].copy_from_slice(bytes);

    i64::try_from(i128::from_le_bytes(wide))
        .map_err(|_| format!("{} value does not fit i64", meta.rust_type()))
}

fn decode_float(bytes: &[u8], meta: FloatMeta) -> Result<f64, String> {
    match meta {
        FloatMeta::Float64 => bytes
            .try_into()
            .map(f64::from_le_bytes)
            .map_err(|_| format!("f64 takes 8 bytes, found {}", bytes.len())),
        FloatMeta::Float32 => bytes
            .try_into()
            .map(|array| f64::from(f32::from_le_bytes(array)))
            .map_err(|_| format!("f32 takes 4 bytes, found {}", bytes.len())),
    }
}

/// Renders a parsed default as an advanced-layer expression for an argument of `kind`.
/// Err carries the reason the default cannot be passed on the argument's behalf.
pub fn render_default(
    mapper: &TypeMapper,
    layout: &NativeLayout,
    value: &Value,
    kind: &TypeKind,
    context: TypeContext,
) -> Result<String, String> {
    // Width and type check through the frame encoding
    if matches!(
        kind,
        TypeKind::Bool | TypeKind::Int(_) | TypeKind::Float(_) | TypeKind::String(_) | TypeKind::Enum(_)
    ) || matches!(value, Value::Vector { .. })
    {
        encode(value, kind, layout)?;
    }

    match (value, kind) {
        (Value::Bool(flag), TypeKind::Bool) => Ok(flag.to_string()),
        (Value::Int(int), TypeKind::Int(_)) => Ok(int.to_string()),
        (Value::Int(int), TypeKind::Float(_)) => Ok(float_literal(*int as f64)),
        (Value::Float(float), TypeKind::Float(_)) => Ok(float_literal(*float)),
        (Value::Int(int), TypeKind::Enum(enum_type)) => {
            Ok(format!("{}({int})", mapper.enum_path(enum_type, context)))
        }

        (Value::String(_, text), TypeKind::String(_)) => Ok(format!(
            "{}::from({text:?})",
            mapper.advanced_type(kind, context)
        )),

        (Value::Vector { type_name, components }, TypeKind::Value(_)) => {
            let arguments = components
                .iter()
                .map(|component| {
                    if type_name.ends_with('i') {
                        (*component as i64).to_string()
                    } else {
                        float_literal(*component)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format!("{}::new({arguments})", mapper.advanced_type(kind, context)))
        }

        (Value::Empty(name), _) => {
            let matches = match kind {
                TypeKind::Engine(expected) | TypeKind::Value(expected) => expected == name,
                TypeKind::Packed { name: expected, .. } => expected == name,
                TypeKind::TypedArray(_) => name == "Array",
                _ => false,
            };

            match (matches, kind) {
                (true, TypeKind::TypedArray(_)) => Ok(String::from("gd::TypedArray::default()")),
                (true, _) => Ok(format!("{}::default()", mapper.advanced_type(kind, context))),
                (false, _) => Err(format!("{name}() cannot be passed as {kind:?}")),
            }
        }

        (Value::Nil, TypeKind::Variant) => Ok(String::from("gd::Variant::nil()")),
        (Value::Bool(flag), TypeKind::Variant) => Ok(format!("gd::Variant::from({flag})")),
        (Value::Int(int), TypeKind::Variant) => Ok(format!("gd::Variant::from({int}_i64)")),
        (Value::Nil, TypeKind::Class(class)) => Err(format!("a null {class} handle has no instance-layer value")),

        _ => Err(format!("{value:?} cannot be passed as {kind:?}")),
    }
}

fn float_literal(float: f64) -> String {
    if float.is_nan() {
        String::from("f64::NAN")
    } else if float == f64::INFINITY {
        String::from("f64::INFINITY")
    } else if float == f64::NEG_INFINITY {
        String::from("f64::NEG_INFINITY")
    } else {
        format!("{float:?}")
    }
}

#[cfg(test)]
#[path = "tests/values_tests.rs"]
mod tests;
