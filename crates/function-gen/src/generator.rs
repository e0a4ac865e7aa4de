//! Function synthesis from OpenAPI documents

use crate::config::{FlatteningMode, GeneratorConfig};
use crate::definition::{FunctionDefinition, FunctionParameters, FunctionSet};
use crate::naming::NameGenerator;
use openapi_spec::{
    OpenApiDocument, Operation, Parameter, ParameterLocation, RequestBody, SchemaConverter,
    SpecError, SpecResolver, SpecResult,
};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Bucket names, in emission order, for [`FlatteningMode::Bucketed`]
const BUCKETS: [(ParameterLocation, &str); 4] = [
    (ParameterLocation::Query, "params"),
    (ParameterLocation::Header, "headers"),
    (ParameterLocation::Cookie, "cookies"),
    (ParameterLocation::Path, "path_params"),
];

/// Walks every path and method of a document and emits one function
/// definition per operation, in document declaration order.
pub struct FunctionGenerator {
    config: GeneratorConfig,
}

impl FunctionGenerator {
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate function definitions plus spec metadata.
    pub fn generate(&self, document: &OpenApiDocument) -> SpecResult<FunctionSet> {
        let functions = self.generate_functions(document)?;
        Ok(FunctionSet {
            title: document.info.title.clone(),
            description: document.info.description.clone(),
            version: document.info.version.clone(),
            servers: document.servers.clone(),
            functions,
        })
    }

    /// Generate the ordered list of function definitions.
    pub fn generate_functions(
        &self,
        document: &OpenApiDocument,
    ) -> SpecResult<Vec<FunctionDefinition>> {
        let paths = document
            .paths
            .as_ref()
            .ok_or_else(|| SpecError::InvalidSpec("document has no paths".to_string()))?;

        let resolver = SpecResolver::new(document).with_max_depth(self.config.max_ref_depth);
        let converter = SchemaConverter::new(&resolver);
        let mut names = NameGenerator::new(self.config.max_name_length);
        let mut functions = Vec::new();

        for path in paths.keys() {
            let path_params = resolver.parameters_for_path(path)?;

            for method in resolver.methods_for_path(path) {
                let operation = resolver.operation(path, method).ok_or_else(|| {
                    SpecError::InvalidSpec(format!("no operation at {} {}", method, path))
                })?;

                let op_params = resolver.parameters_for_operation(operation)?;
                let merged = merge_parameters(&path_params, &op_params);

                let parameters = match self.config.flattening {
                    FlatteningMode::Flat => {
                        self.flat_parameters(&merged, operation, &resolver, &converter)?
                    }
                    FlatteningMode::Bucketed => {
                        self.bucketed_parameters(&merged, operation, &resolver, &converter)?
                    }
                };

                let name = names.generate(operation, path, method);
                let mut description = operation
                    .description
                    .clone()
                    .or_else(|| operation.summary.clone())
                    .unwrap_or_default();
                if operation.deprecated {
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str("(DEPRECATED)");
                }

                functions.push(FunctionDefinition {
                    name,
                    description,
                    parameters,
                });
            }
        }

        debug!("Generated {} function definitions", functions.len());
        Ok(functions)
    }

    /// One flat `properties` map, every entry tagged with its location.
    fn flat_parameters(
        &self,
        params: &[&Parameter],
        operation: &Operation,
        resolver: &SpecResolver,
        converter: &SchemaConverter,
    ) -> SpecResult<FunctionParameters> {
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        for param in params {
            let Some(location) = ParameterLocation::parse(&param.location) else {
                debug!(
                    "skipping parameter {:?} with unknown location {:?}",
                    param.name, param.location
                );
                continue;
            };
            let Some(mut prop) = parameter_property(param, converter)? else {
                continue;
            };
            if let Some(obj) = prop.as_object_mut() {
                obj.insert("location".to_string(), json!(location.as_str()));
            }
            properties.insert(param.name.clone(), prop);
            if param.required && !required.contains(&param.name) {
                required.push(param.name.clone());
            }
        }

        if let Some(body) = resolver.request_body_for_operation(operation)? {
            if let Some(schema) = body_schema(body, converter)? {
                fold_body(&mut properties, &mut required, schema, body.required);
            }
        }

        let required = if required.is_empty() { None } else { Some(required) };
        Ok(FunctionParameters::object(properties, required))
    }

    /// Parameters grouped by location, request body under `data`.
    fn bucketed_parameters(
        &self,
        params: &[&Parameter],
        operation: &Operation,
        resolver: &SpecResolver,
        converter: &SchemaConverter,
    ) -> SpecResult<FunctionParameters> {
        let mut properties = Map::new();

        for (location, bucket) in BUCKETS {
            let group: Vec<&Parameter> = params
                .iter()
                .copied()
                .filter(|p| ParameterLocation::parse(&p.location) == Some(location))
                .collect();
            if group.is_empty() {
                continue;
            }
            properties.insert(bucket.to_string(), group_schema(&group, converter)?);
        }

        if let Some(body) = resolver.request_body_for_operation(operation)? {
            if let Some(schema) = body_schema(body, converter)? {
                properties.insert("data".to_string(), schema);
            }
        }

        // Every bucket present is required, even when the list ends up empty
        let required: Vec<String> = properties.keys().cloned().collect();
        Ok(FunctionParameters::object(properties, Some(required)))
    }
}

impl Default for FunctionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Path-level and operation-level parameters merged by (name, location);
/// operation-level wins on collision.
fn merge_parameters<'p>(
    path_params: &[&'p Parameter],
    op_params: &[&'p Parameter],
) -> Vec<&'p Parameter> {
    let mut merged: Vec<&Parameter> = path_params.to_vec();
    for &param in op_params {
        merged.retain(|existing| {
            !(existing.name == param.name && existing.location == param.location)
        });
        merged.push(param);
    }
    merged
}

/// Converted schema for a parameter, falling back to its first media type
/// when declared with `content` instead of `schema`. Parameters with neither
/// are skipped.
fn parameter_property(param: &Parameter, converter: &SchemaConverter) -> SpecResult<Option<Value>> {
    let schema = match (&param.schema, &param.content) {
        (Some(schema), _) => Some(schema),
        (None, Some(content)) => content.values().find_map(|media| media.schema.as_ref()),
        (None, None) => None,
    };
    let Some(schema) = schema else {
        return Ok(None);
    };

    let mut value = converter.convert(schema)?;
    if let Some(obj) = value.as_object_mut() {
        if !obj.contains_key("description") {
            if let Some(description) = &param.description {
                obj.insert("description".to_string(), json!(description));
            }
        }
    }
    Ok(Some(value))
}

/// Object schema covering one location group of parameters.
fn group_schema(params: &[&Parameter], converter: &SchemaConverter) -> SpecResult<Value> {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for param in params {
        let Some(prop) = parameter_property(param, converter)? else {
            continue;
        };
        properties.insert(param.name.clone(), prop);
        if param.required && !required.contains(&param.name) {
            required.push(param.name.clone());
        }
    }

    let mut out = Map::new();
    out.insert("type".to_string(), json!("object"));
    out.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".to_string(), json!(required));
    }
    Ok(Value::Object(out))
}

/// Converted request body schema: one media type directly, several combined
/// under `anyOf`, none at all yields `None`.
fn body_schema(body: &RequestBody, converter: &SchemaConverter) -> SpecResult<Option<Value>> {
    let mut schemas = Vec::new();
    for media in body.content.values() {
        if let Some(schema) = &media.schema {
            schemas.push(converter.convert(schema)?);
        }
    }

    Ok(match schemas.len() {
        0 => None,
        1 => schemas.pop(),
        _ => Some(json!({ "anyOf": schemas })),
    })
}

/// Fold a converted body schema into the flat properties map. Object bodies
/// contribute their properties tagged `location: body`; anything else lands
/// under a single `body` property.
fn fold_body(
    properties: &mut Map<String, Value>,
    required: &mut Vec<String>,
    schema: Value,
    body_required: bool,
) {
    match schema {
        Value::Object(mut obj) if obj.contains_key("properties") => {
            let body_required_names: Vec<String> = obj
                .get("required")
                .and_then(|r| r.as_array())
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();

            if let Some(Value::Object(body_props)) = obj.remove("properties") {
                for (name, mut prop) in body_props {
                    if let Some(p) = prop.as_object_mut() {
                        p.insert("location".to_string(), json!("body"));
                    }
                    properties.insert(name, prop);
                }
            }

            for name in body_required_names {
                if !required.contains(&name) {
                    required.push(name);
                }
            }
        }
        other => {
            let mut prop = other;
            if let Some(p) = prop.as_object_mut() {
                p.insert("location".to_string(), json!("body"));
            }
            properties.insert("body".to_string(), prop);
            if body_required && !required.iter().any(|r| r == "body") {
                required.push("body".to_string());
            }
        }
    }
}
