//! In-memory descriptors for the engine API surface.
//!
//! Loaded once per run. After the rewrite pass in `rules::rewrites` they are only read.

use crate::schema::api_json::{
    ApiArgument, ApiBuiltinClass, ApiClass, ApiDocument, ApiEnum, ApiMethod, ApiUtilityFunction,
};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    // Object-derived classes living behind a native pointer
    Engine,

    // Variant value types such as Vector2 or String
    Builtin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub name: String,

    // Empty for roots
    pub inherits: String,
    pub kind: ClassKind,
    pub api_type: String,
    pub is_singleton: bool,
    pub is_ref_counted: bool,
    pub is_instantiable: bool,
    pub is_keyed: bool,
    pub methods: Vec<MethodDescriptor>,
    pub enums: Vec<EnumDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub signals: Vec<SignalDescriptor>,
    pub constants: Vec<ConstantDescriptor>,
    pub members: Vec<MemberDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: &str, inherits: &str, kind: ClassKind) -> Self {
        ClassDescriptor {
            name: name.to_owned(),
            inherits: inherits.to_owned(),
            kind,
            api_type: String::from("core"),
            is_singleton: false,
            is_ref_counted: false,
            is_instantiable: false,
            is_keyed: false,
            methods: Vec::new(),
            enums: Vec::new(),
            properties: Vec::new(),
            signals: Vec::new(),
            constants: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn is_root(&self) -> bool {
        self.inherits.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,

    // Empty when the method returns nothing
    pub return_type: String,
    pub return_meta: String,
    pub arguments: Vec<ArgumentDescriptor>,
    pub is_const: bool,
    pub is_vararg: bool,
    pub is_static: bool,
    pub is_virtual: bool,

    // None for virtual methods, which have no native binding
    pub hash: Option<u64>,

    // Set by the rewrite pass when the method was moved off a singleton onto another class
    pub relocated_from: Option<String>,
}

impl MethodDescriptor {
    pub fn new(name: &str) -> Self {
        MethodDescriptor {
            name: name.to_owned(),
            return_type: String::new(),
            return_meta: String::new(),
            arguments: Vec::new(),
            is_const: false,
            is_vararg: false,
            is_static: false,
            is_virtual: false,
            hash: None,
            relocated_from: None,
        }
    }

    pub fn returns_value(&self) -> bool {
        !self.return_type.is_empty() && self.return_type != "void"
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub type_name: String,
    pub meta: String,
    pub default_value: Option<String>,
}

impl ArgumentDescriptor {
    pub fn new(name: &str, type_name: &str) -> Self {
        ArgumentDescriptor {
            name: name.to_owned(),
            type_name: type_name.to_owned(),
            meta: String::new(),
            default_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub is_bitfield: bool,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
    pub getter: String,
    pub setter: String,
    pub index: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDescriptor {
    pub name: String,
    pub arguments: Vec<ArgumentDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDescriptor {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub status: String,
    pub full_name: String,
}

/// The whole API surface of one engine build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub version: SchemaVersion,

    // Engine classes in document order
    pub classes: Vec<ClassDescriptor>,
    pub builtin_classes: Vec<ClassDescriptor>,
    pub global_enums: Vec<EnumDescriptor>,
    pub utility_functions: Vec<MethodDescriptor>,
    pub singletons: FxHashSet<String>,
    pub native_structures: FxHashSet<String>,

    // Builtin type sizes for the selected build configuration, in document order
    pub builtin_sizes: Vec<(String, u32)>,

    class_index: FxHashMap<String, usize>,
    builtin_index: FxHashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from already-constructed descriptors. Used by tests and synthetic inputs.
    pub fn from_classes(classes: Vec<ClassDescriptor>) -> Self {
        let mut schema = Schema {
            classes,
            ..Schema::default()
        };
        schema.reindex();
        schema
    }

    pub(crate) fn from_document(document: ApiDocument, builtin_sizes: Vec<(String, u32)>) -> Self {
        let singletons = document
            .singletons
            .iter()
            .map(|singleton| singleton.type_name.to_owned())
            .collect::<FxHashSet<_>>();

        let mut classes = document
            .classes
            .into_iter()
            .map(engine_class)
            .collect::<Vec<_>>();

        for class in &mut classes {
            class.is_singleton = singletons.contains(&class.name);
        }

        let mut schema = Schema {
            version: SchemaVersion {
                major: document.header.version_major,
                minor: document.header.version_minor,
                patch: document.header.version_patch,
                status: document.header.version_status,
                full_name: document.header.version_full_name,
            },
            classes,
            builtin_classes: document
                .builtin_classes
                .into_iter()
                .map(builtin_class)
                .collect(),
            global_enums: document.global_enums.into_iter().map(enum_descriptor).collect(),
            utility_functions: document
                .utility_functions
                .into_iter()
                .map(utility_function)
                .collect(),
            singletons,
            native_structures: document
                .native_structures
                .into_iter()
                .map(|structure| structure.name)
                .collect(),
            builtin_sizes,
            class_index: FxHashMap::default(),
            builtin_index: FxHashMap::default(),
        };

        schema.reindex();
        schema
    }

    /// Must be called after classes are added or removed.
    pub fn reindex(&mut self) {
        self.class_index = self
            .classes
            .iter()
            .enumerate()
            .map(|(index, class)| (class.name.to_owned(), index))
            .collect();

        self.builtin_index = self
            .builtin_classes
            .iter()
            .enumerate()
            .map(|(index, class)| (class.name.to_owned(), index))
            .collect();
    }

    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.class_index
            .get(name)
            .and_then(|index| self.classes.get(*index))
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassDescriptor> {
        match self.class_index.get(name) {
            Some(index) => self.classes.get_mut(*index),
            None => None,
        }
    }

    pub fn builtin_class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.builtin_index
            .get(name)
            .and_then(|index| self.builtin_classes.get(*index))
    }

    pub fn is_engine_class(&self, name: &str) -> bool {
        self.class_index.contains_key(name)
    }

    pub fn global_enum(&self, name: &str) -> Option<&EnumDescriptor> {
        self.global_enums.iter().find(|enumeration| enumeration.name == name)
    }

    /// Finds an enum by its qualified schema name, either `Owner.Name` or a global `Name`.
    /// Global names may themselves contain a dot, as `Variant.Type` does.
    pub fn find_enum(&self, qualified: &str) -> Option<&EnumDescriptor> {
        match qualified.split_once('.') {
            Some((owner, name)) => self
                .class(owner)
                .or_else(|| self.builtin_class(owner))
                .and_then(|class| class.enums.iter().find(|e| e.name == name))
                .or_else(|| self.global_enum(qualified)),
            None => self.global_enum(qualified),
        }
    }
}

fn engine_class(class: ApiClass) -> ClassDescriptor {
    ClassDescriptor {
        name: class.name,
        inherits: class.inherits.unwrap_or_default(),
        kind: ClassKind::Engine,
        api_type: class.api_type,
        is_singleton: false,
        is_ref_counted: class.is_refcounted,
        is_instantiable: class.is_instantiable,
        is_keyed: false,
        methods: class.methods.into_iter().map(method_descriptor).collect(),
        enums: class.enums.into_iter().map(enum_descriptor).collect(),
        properties: class
            .properties
            .into_iter()
            .map(|property| PropertyDescriptor {
                name: property.name,
                type_name: property.type_name,
                getter: property.getter,
                setter: property.setter,
                index: property.index,
            })
            .collect(),
        signals: class
            .signals
            .into_iter()
            .map(|signal| SignalDescriptor {
                name: signal.name,
                arguments: signal.arguments.into_iter().map(argument_descriptor).collect(),
            })
            .collect(),
        constants: class
            .constants
            .into_iter()
            .map(|constant| ConstantDescriptor {
                name: constant.name,
                value: constant.value,
            })
            .collect(),
        members: Vec::new(),
    }
}

fn builtin_class(class: ApiBuiltinClass) -> ClassDescriptor {
    ClassDescriptor {
        name: class.name,
        inherits: String::new(),
        kind: ClassKind::Builtin,
        api_type: String::from("core"),
        is_singleton: false,
        is_ref_counted: false,
        is_instantiable: true,
        is_keyed: class.is_keyed,
        methods: class.methods.into_iter().map(method_descriptor).collect(),
        enums: class.enums.into_iter().map(enum_descriptor).collect(),
        properties: Vec::new(),
        signals: Vec::new(),
        constants: Vec::new(),
        members: class
            .members
            .into_iter()
            .map(|member| MemberDescriptor {
                name: member.name,
                type_name: member.type_name,
            })
            .collect(),
    }
}

fn method_descriptor(method: ApiMethod) -> MethodDescriptor {
    let (return_type, return_meta) = match (method.return_value, method.return_type) {
        (Some(value), _) => (value.type_name, value.meta),
        (None, Some(type_name)) => (type_name, String::new()),
        (None, None) => (String::new(), String::new()),
    };

    MethodDescriptor {
        name: method.name,
        return_type,
        return_meta,
        arguments: method.arguments.into_iter().map(argument_descriptor).collect(),
        is_const: method.is_const,
        is_vararg: method.is_vararg,
        is_static: method.is_static,
        is_virtual: method.is_virtual,
        hash: if method.is_virtual { None } else { method.hash },
        relocated_from: None,
    }
}

fn utility_function(function: ApiUtilityFunction) -> MethodDescriptor {
    MethodDescriptor {
        name: function.name,
        return_type: function.return_type.unwrap_or_default(),
        return_meta: String::new(),
        arguments: function.arguments.into_iter().map(argument_descriptor).collect(),
        is_const: false,
        is_vararg: function.is_vararg,
        is_static: true,
        is_virtual: false,
        hash: Some(function.hash),
        relocated_from: None,
    }
}

fn argument_descriptor(argument: ApiArgument) -> ArgumentDescriptor {
    ArgumentDescriptor {
        name: argument.name,
        type_name: argument.type_name,
        meta: argument.meta,
        default_value: argument.default_value,
    }
}

fn enum_descriptor(enumeration: ApiEnum) -> EnumDescriptor {
    EnumDescriptor {
        name: enumeration.name,
        is_bitfield: enumeration.is_bitfield,
        values: enumeration
            .values
            .into_iter()
            .map(|value| EnumValue {
                name: value.name,
                value: value.value,
            })
            .collect(),
    }
}
