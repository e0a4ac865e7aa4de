//! OpenAPI schema to JSON-Schema conversion

use crate::error::{SpecError, SpecResult};
use crate::resolver::SpecResolver;
use crate::types::{Schema, SchemaKind};
use serde_json::{json, Map, Value};

/// Rewrites OpenAPI schema objects into JSON-Schema values.
///
/// Purely functional over the resolved document. Recursion is bounded by the
/// resolver's configured depth so that reference cycles threaded through
/// object properties terminate with an error rather than a stack overflow.
pub struct SchemaConverter<'a> {
    resolver: &'a SpecResolver<'a>,
}

impl<'a> SchemaConverter<'a> {
    pub fn new(resolver: &'a SpecResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Convert a schema, following `$ref` pointers as they are encountered.
    pub fn convert(&self, schema: &Schema) -> SpecResult<Value> {
        self.convert_at(schema, 0)
    }

    fn convert_at(&self, schema: &Schema, depth: usize) -> SpecResult<Value> {
        if depth > self.resolver.max_depth() {
            return Err(SpecError::CircularReference {
                pointer: format!("schema nesting deeper than {}", self.resolver.max_depth()),
            });
        }

        let schema = self.resolver.resolve_schema(schema)?;
        match schema.kind() {
            // resolve_schema never yields a schema that still carries a $ref
            SchemaKind::Reference(pointer) => {
                Err(SpecError::UnresolvedReference(pointer.to_string()))
            }
            SchemaKind::Object => self.convert_object(schema, depth),
            SchemaKind::Array => self.convert_array(schema, depth),
            SchemaKind::Primitive => Ok(self.convert_primitive(schema)),
        }
    }

    fn convert_object(&self, schema: &Schema, depth: usize) -> SpecResult<Value> {
        let declared_required = schema.required.as_deref().unwrap_or(&[]);
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        if let Some(props) = &schema.properties {
            for (name, property) in props {
                let resolved = self.resolver.resolve_schema(property)?;
                if !resolved.has_determinable_type() {
                    // Typeless properties are dropped, not errored
                    continue;
                }
                properties.insert(name.clone(), self.convert_at(property, depth + 1)?);
                if declared_required.iter().any(|r| r == name) && !required.contains(name) {
                    required.push(name.clone());
                }
            }
        }

        let mut out = Map::new();
        out.insert("type".to_string(), json!("object"));
        out.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            out.insert("required".to_string(), json!(required));
        }
        if let Some(description) = &schema.description {
            out.insert("description".to_string(), json!(description));
        }
        Ok(Value::Object(out))
    }

    fn convert_array(&self, schema: &Schema, depth: usize) -> SpecResult<Value> {
        let items = match &schema.items {
            Some(items) => self.convert_at(items, depth + 1)?,
            None => json!({"type": "string"}),
        };

        let mut out = Map::new();
        out.insert("type".to_string(), json!("array"));
        out.insert("items".to_string(), items);
        if let Some(min) = schema.min_items {
            out.insert("minItems".to_string(), json!(min));
        }
        if let Some(max) = schema.max_items {
            out.insert("maxItems".to_string(), json!(max));
        }
        if let Some(description) = &schema.description {
            out.insert("description".to_string(), json!(description));
        }
        Ok(Value::Object(out))
    }

    fn convert_primitive(&self, schema: &Schema) -> Value {
        let mut out = Map::new();
        out.insert(
            "type".to_string(),
            json!(schema.schema_type.as_deref().unwrap_or("string")),
        );

        // Optional fields are copied only when present, never as null keys
        if let Some(description) = &schema.description {
            out.insert("description".to_string(), json!(description));
        }
        if let Some(values) = &schema.enum_values {
            out.insert("enum".to_string(), json!(values));
        }
        if let Some(default) = &schema.default {
            out.insert("default".to_string(), default.clone());
        }
        if let Some(format) = &schema.format {
            out.insert("format".to_string(), json!(format));
        }
        if let Some(pattern) = &schema.pattern {
            out.insert("pattern".to_string(), json!(pattern));
        }
        if let Some(minimum) = &schema.minimum {
            out.insert("minimum".to_string(), minimum.clone());
        }
        if let Some(maximum) = &schema.maximum {
            out.insert("maximum".to_string(), maximum.clone());
        }
        if let Some(bound) = &schema.exclusive_minimum {
            out.insert("exclusiveMinimum".to_string(), bound.clone());
        }
        if let Some(bound) = &schema.exclusive_maximum {
            out.insert("exclusiveMaximum".to_string(), bound.clone());
        }
        if let Some(example) = &schema.example {
            out.insert("example".to_string(), example.clone());
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpenApiDocument;
    use serde_json::json;

    const EMPTY_DOC: &str = r#"
openapi: "3.0.0"
info:
  title: Empty
  version: "1"
paths: {}
"#;

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn convert(doc: &OpenApiDocument, value: Value) -> SpecResult<Value> {
        let resolver = SpecResolver::new(doc);
        let converter = SchemaConverter::new(&resolver);
        converter.convert(&schema(value))
    }

    #[test]
    fn test_primitive_defaults_to_string() {
        let doc: OpenApiDocument = serde_yaml::from_str(EMPTY_DOC).unwrap();
        let converted = convert(&doc, json!({})).unwrap();
        assert_eq!(converted, json!({"type": "string"}));
    }

    #[test]
    fn test_primitive_copies_constraints_only_when_present() {
        let doc: OpenApiDocument = serde_yaml::from_str(EMPTY_DOC).unwrap();
        let converted = convert(
            &doc,
            json!({
                "type": "integer",
                "enum": [1, 2, 3],
                "default": 1,
                "exclusiveMaximum": 10
            }),
        )
        .unwrap();

        assert_eq!(
            converted,
            json!({
                "type": "integer",
                "enum": [1, 2, 3],
                "default": 1,
                "exclusiveMaximum": 10
            })
        );
        assert!(converted.get("pattern").is_none());
        assert!(converted.get("minimum").is_none());
    }

    #[test]
    fn test_object_drops_typeless_properties() {
        let doc: OpenApiDocument = serde_yaml::from_str(EMPTY_DOC).unwrap();
        let converted = convert(
            &doc,
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "mystery": {"description": "no type here"}
                },
                "required": ["name", "mystery"]
            }),
        )
        .unwrap();

        let properties = converted["properties"].as_object().unwrap();
        assert!(properties.contains_key("name"));
        assert!(!properties.contains_key("mystery"));
        // "mystery" was dropped, so it cannot be required either
        assert_eq!(converted["required"], json!(["name"]));
    }

    #[test]
    fn test_object_omits_empty_required() {
        let doc: OpenApiDocument = serde_yaml::from_str(EMPTY_DOC).unwrap();
        let converted = convert(
            &doc,
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}}
            }),
        )
        .unwrap();
        assert!(converted.get("required").is_none());
    }

    #[test]
    fn test_array_items_and_bounds() {
        let doc: OpenApiDocument = serde_yaml::from_str(EMPTY_DOC).unwrap();
        let converted = convert(
            &doc,
            json!({
                "type": "array",
                "items": {"type": "integer"},
                "minItems": 1,
                "maxItems": 5
            }),
        )
        .unwrap();
        assert_eq!(
            converted,
            json!({
                "type": "array",
                "items": {"type": "integer"},
                "minItems": 1,
                "maxItems": 5
            })
        );

        let no_items = convert(&doc, json!({"type": "array"})).unwrap();
        assert_eq!(no_items["items"], json!({"type": "string"}));
        assert!(no_items.get("minItems").is_none());
    }

    #[test]
    fn test_nested_refs_resolved_during_conversion() {
        let doc: OpenApiDocument = serde_yaml::from_str(
            r#"
openapi: "3.0.0"
info:
  title: Nested
  version: "1"
paths: {}
components:
  schemas:
    Address:
      type: object
      properties:
        street:
          type: string
      required: [street]
    User:
      type: object
      properties:
        name:
          type: string
        address:
          $ref: '#/components/schemas/Address'
      required: [name, address]
"#,
        )
        .unwrap();

        let converted = convert(&doc, json!({"$ref": "#/components/schemas/User"})).unwrap();
        assert_eq!(converted["properties"]["address"]["type"], json!("object"));
        assert_eq!(
            converted["properties"]["address"]["properties"]["street"]["type"],
            json!("string")
        );
        assert_eq!(converted["required"], json!(["name", "address"]));
    }

    #[test]
    fn test_property_level_cycle_fails() {
        let doc: OpenApiDocument = serde_yaml::from_str(
            r#"
openapi: "3.0.0"
info:
  title: Cyclic
  version: "1"
paths: {}
components:
  schemas:
    Node:
      type: object
      properties:
        next:
          $ref: '#/components/schemas/Node'
"#,
        )
        .unwrap();

        let result = convert(&doc, json!({"$ref": "#/components/schemas/Node"}));
        assert!(matches!(result, Err(SpecError::CircularReference { .. })));
    }
}
