//! OpenAPI 3.x document structures
//!
//! Deserialized with declaration order preserved via `IndexMap` so that
//! generated output follows the order of the source document.

use indexmap::IndexMap;
use serde::de;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods supported by OpenAPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Parse a lowercase path-item key. Non-method keys such as
    /// `parameters` or `summary` yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter location in HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parse the raw `in` field of a parameter. Unknown locations yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// OpenAPI document structure
#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: ApiInfo,
    #[serde(default)]
    pub servers: Vec<Server>,
    /// `None` when the `paths` key is absent, which is distinct from an
    /// empty path map and rejected at generation time.
    pub paths: Option<IndexMap<String, PathItem>>,
    #[serde(default)]
    pub components: Option<Components>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// A single path entry. Deserialized by hand so operations keep the order
/// they were declared in, which derived per-method fields cannot recover.
#[derive(Debug, Clone)]
pub struct PathItem {
    operations: Vec<(HttpMethod, Operation)>,
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Declared operations as (method, operation) pairs, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        self.operations.iter().map(|(method, op)| (*method, op))
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PathItemVisitor;

        impl<'de> de::Visitor<'de> for PathItemVisitor {
            type Value = PathItem;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an OpenAPI path item object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<PathItem, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut operations = Vec::new();
                let mut parameters = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if let Some(method) = HttpMethod::from_key(&key) {
                        operations.push((method, map.next_value()?));
                    } else if key == "parameters" {
                        parameters = map.next_value()?;
                    } else {
                        map.next_value::<de::IgnoredAny>()?;
                    }
                }
                Ok(PathItem {
                    operations,
                    parameters,
                })
            }
        }

        deserializer.deserialize_map(PathItemVisitor)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// Parameter name (absent when `$ref` is used)
    #[serde(default)]
    pub name: String,
    /// Raw parameter location (absent when `$ref` is used)
    #[serde(rename = "in", default)]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Schema>,
    /// Content-type to schema map, for body-style parameters
    pub content: Option<IndexMap<String, MediaType>>,
    /// Reference to a parameter in components/parameters
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    /// Reference to a body in components/requestBodies
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// The local component registry, the only valid target for `$ref` pointers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,
}

/// An OpenAPI schema object carrying every field the converter reads.
///
/// Classification into a closed set of shapes happens through [`Schema::kind`]
/// so conversion code can match exhaustively instead of probing a loose map.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub properties: Option<IndexMap<String, Schema>>,
    pub required: Option<Vec<String>>,
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub description: Option<String>,
    pub minimum: Option<Value>,
    pub maximum: Option<Value>,
    pub exclusive_minimum: Option<Value>,
    pub exclusive_maximum: Option<Value>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub example: Option<Value>,
}

/// Shape of a schema object, as seen by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind<'a> {
    /// A `$ref` pointer still awaiting resolution
    Reference(&'a str),
    /// An object schema (declared `type: object` or carrying `properties`)
    Object,
    /// An array schema (declared `type: array` or carrying `items`)
    Array,
    /// Everything else, including typeless schemas
    Primitive,
}

impl Schema {
    pub fn kind(&self) -> SchemaKind<'_> {
        if let Some(pointer) = self.reference.as_deref() {
            return SchemaKind::Reference(pointer);
        }
        match self.schema_type.as_deref() {
            Some("object") => SchemaKind::Object,
            Some("array") => SchemaKind::Array,
            Some(_) => SchemaKind::Primitive,
            None if self.properties.is_some() => SchemaKind::Object,
            None if self.items.is_some() => SchemaKind::Array,
            None => SchemaKind::Primitive,
        }
    }

    /// Whether conversion can determine a type for this schema. Object
    /// properties failing this check are dropped rather than errored.
    pub fn has_determinable_type(&self) -> bool {
        !matches!(self.kind(), SchemaKind::Primitive) || self.schema_type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            schema(json!({"$ref": "#/components/schemas/Pet"})).kind(),
            SchemaKind::Reference("#/components/schemas/Pet")
        );
        assert_eq!(schema(json!({"type": "object"})).kind(), SchemaKind::Object);
        assert_eq!(
            schema(json!({"properties": {"a": {"type": "string"}}})).kind(),
            SchemaKind::Object
        );
        assert_eq!(schema(json!({"type": "array"})).kind(), SchemaKind::Array);
        assert_eq!(
            schema(json!({"items": {"type": "string"}})).kind(),
            SchemaKind::Array
        );
        assert_eq!(schema(json!({"type": "integer"})).kind(), SchemaKind::Primitive);
        assert_eq!(schema(json!({})).kind(), SchemaKind::Primitive);
    }

    #[test]
    fn test_determinable_type() {
        assert!(schema(json!({"type": "string"})).has_determinable_type());
        assert!(schema(json!({"properties": {}})).has_determinable_type());
        assert!(schema(json!({"items": {}})).has_determinable_type());
        assert!(!schema(json!({"description": "no type at all"})).has_determinable_type());
    }

    #[test]
    fn test_parameter_location_parse() {
        assert_eq!(ParameterLocation::parse("query"), Some(ParameterLocation::Query));
        assert_eq!(ParameterLocation::parse("path"), Some(ParameterLocation::Path));
        assert_eq!(ParameterLocation::parse("body"), None);
        assert_eq!(ParameterLocation::parse(""), None);
    }

    #[test]
    fn test_path_item_keeps_declaration_order() {
        let item: PathItem = serde_yaml::from_str(
            r#"
post:
  summary: create
delete:
  summary: remove
get:
  summary: list
"#,
        )
        .unwrap();

        let methods: Vec<HttpMethod> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Post, HttpMethod::Delete, HttpMethod::Get]
        );
    }

    #[test]
    fn test_path_item_skips_non_method_keys() {
        let item: PathItem = serde_yaml::from_str(
            r#"
summary: widget collection
parameters:
  - name: tenant
    in: header
    schema:
      type: string
get:
  summary: list
"#,
        )
        .unwrap();

        assert_eq!(item.operations().count(), 1);
        assert_eq!(item.parameters.len(), 1);
        assert_eq!(item.parameters[0].name, "tenant");
    }
}
