//! Serde mirror of `extension_api.json`.
//!
//! These types follow the document layout one to one and are only used while loading.
//! Everything past the loader works on the descriptors in `model`.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiDocument {
    #[serde(default)]
    pub header: ApiHeader,
    #[serde(default)]
    pub builtin_class_sizes: Vec<ApiBuildConfiguration>,
    pub global_enums: Vec<ApiEnum>,
    pub utility_functions: Vec<ApiUtilityFunction>,
    pub builtin_classes: Vec<ApiBuiltinClass>,
    pub classes: Vec<ApiClass>,
    #[serde(default)]
    pub singletons: Vec<ApiSingleton>,
    #[serde(default)]
    pub native_structures: Vec<ApiNativeStructure>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiHeader {
    #[serde(default)]
    pub version_major: u32,
    #[serde(default)]
    pub version_minor: u32,
    #[serde(default)]
    pub version_patch: u32,
    #[serde(default)]
    pub version_status: String,
    #[serde(default)]
    pub version_full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBuildConfiguration {
    pub build_configuration: String,
    pub sizes: Vec<ApiTypeSize>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTypeSize {
    pub name: String,
    pub size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnum {
    pub name: String,
    #[serde(default)]
    pub is_bitfield: bool,
    pub values: Vec<ApiEnumValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnumValue {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReturnValue {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub meta: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMethod {
    pub name: String,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_vararg: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub hash: Option<u64>,

    // Engine classes describe the return through return_value, builtin classes through return_type
    #[serde(default)]
    pub return_value: Option<ApiReturnValue>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ApiArgument>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUtilityFunction {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub is_vararg: bool,
    pub hash: u64,
    #[serde(default)]
    pub arguments: Vec<ApiArgument>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiProperty {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    #[serde(default)]
    pub setter: String,
    #[serde(default)]
    pub getter: String,
    #[serde(default)]
    pub index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiSignal {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ApiArgument>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiConstant {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiClass {
    pub name: String,
    #[serde(default)]
    pub is_refcounted: bool,
    #[serde(default)]
    pub is_instantiable: bool,
    #[serde(default)]
    pub inherits: Option<String>,
    #[serde(default)]
    pub api_type: String,
    #[serde(default)]
    pub enums: Vec<ApiEnum>,
    #[serde(default)]
    pub methods: Vec<ApiMethod>,
    #[serde(default)]
    pub properties: Vec<ApiProperty>,
    #[serde(default)]
    pub signals: Vec<ApiSignal>,
    #[serde(default)]
    pub constants: Vec<ApiConstant>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMember {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBuiltinClass {
    pub name: String,
    #[serde(default)]
    pub is_keyed: bool,
    #[serde(default)]
    pub members: Vec<ApiMember>,
    #[serde(default)]
    pub enums: Vec<ApiEnum>,
    #[serde(default)]
    pub methods: Vec<ApiMethod>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiSingleton {
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiNativeStructure {
    pub name: String,
}
