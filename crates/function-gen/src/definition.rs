//! Function definition output types

use openapi_spec::Server;
use serde::Serialize;
use serde_json::{Map, Value};

/// A single tool-calling function definition, serializable directly as JSON
/// for submission to a tool-calling LLM API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: FunctionParameters,
}

/// JSON-Schema object describing a function's parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Map<String, Value>,
    /// Omitted from serialization when empty rather than emitted as `[]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl FunctionParameters {
    pub fn object(properties: Map<String, Value>, required: Option<Vec<String>>) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties,
            required,
        }
    }
}

/// All function definitions generated from one document, with spec metadata
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSet {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub servers: Vec<Server>,
    pub functions: Vec<FunctionDefinition>,
}
