use crate::descriptor::ParameterDescriptor;
use crate::model_builder::Models;
use crate::shape::PrimitiveType;
use serde::{Deserialize, Serialize};

/// Swagger specification version the documents conform to
pub const SWAGGER_VERSION: &str = "1.2";

/// Listing of every declaration, served at the documentation root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceListing {
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    pub apis: Vec<ApiRef>,
}

/// Pointer from the listing to one declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRef {
    pub path: String,
    pub description: String,
}

/// Declaration of the APIs of one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDeclaration {
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    /// Externally visible URL prefix
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Declared root of the service
    #[serde(rename = "resourcePath")]
    pub resource_path: String,
    #[serde(default)]
    pub apis: Vec<Api>,
    #[serde(default)]
    pub models: Models,
}

/// All operations of one concrete path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Api {
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// One method on a path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub method: String,
    pub summary: String,
    /// Response type: "void", a model or primitive name, or "array[T]"
    #[serde(rename = "type")]
    pub response_type: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// One documented parameter of an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    #[serde(rename = "paramType")]
    pub param_type: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    pub required: bool,
}

/// Translate a parameter descriptor into its declaration form
pub fn translate_parameter(descriptor: &ParameterDescriptor) -> Parameter {
    Parameter {
        name: descriptor.name.clone(),
        description: descriptor.description.clone(),
        param_type: descriptor.kind.tag().to_string(),
        parameter_type: descriptor.data_type.clone(),
        data_type: descriptor.data_type.clone(),
        format: format_of(&descriptor.data_type).to_string(),
        required: descriptor.required,
    }
}

/// Swagger format for a data type name, empty when it has none
pub fn format_of(data_type: &str) -> &'static str {
    PrimitiveType::parse(data_type)
        .and_then(|primitive| primitive.swagger_format())
        .unwrap_or("")
}
