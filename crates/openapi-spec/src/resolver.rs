//! `$ref` resolution over an OpenAPI document
//!
//! References are followed one level at a time against the document's local
//! component registry. A visited set keyed by pointer catches reference
//! cycles; a depth bound backs it up for pathological documents.

use crate::error::{SpecError, SpecResult};
use crate::types::*;

/// Default bound on reference chain length and schema nesting depth.
pub const DEFAULT_MAX_REF_DEPTH: usize = 100;

const SCHEMA_PREFIX: &str = "#/components/schemas/";
const PARAMETER_PREFIX: &str = "#/components/parameters/";
const REQUEST_BODY_PREFIX: &str = "#/components/requestBodies/";

/// Resolves `$ref` pointers within a single OpenAPI document.
pub struct SpecResolver<'a> {
    document: &'a OpenApiDocument,
    max_depth: usize,
}

impl<'a> SpecResolver<'a> {
    pub fn new(document: &'a OpenApiDocument) -> Self {
        Self {
            document,
            max_depth: DEFAULT_MAX_REF_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn components(&self) -> Option<&'a Components> {
        self.document.components.as_ref()
    }

    /// Follow the `$ref` chain of a schema until a concrete schema remains.
    ///
    /// Resolving an already-concrete schema returns it unchanged.
    pub fn resolve_schema<'s>(&'s self, schema: &'s Schema) -> SpecResult<&'s Schema> {
        let mut current = schema;
        let mut visited: Vec<&str> = Vec::new();

        while let Some(pointer) = current.reference.as_deref() {
            if visited.contains(&pointer) || visited.len() >= self.max_depth {
                return Err(SpecError::CircularReference {
                    pointer: pointer.to_string(),
                });
            }
            visited.push(pointer);

            let name = strip_prefix(pointer, SCHEMA_PREFIX)?;
            current = self
                .components()
                .and_then(|c| c.schemas.get(name))
                .ok_or_else(|| SpecError::UnresolvedReference(pointer.to_string()))?;
        }

        Ok(current)
    }

    /// Follow the `$ref` chain of a parameter.
    pub fn resolve_parameter<'s>(&'s self, parameter: &'s Parameter) -> SpecResult<&'s Parameter> {
        let mut current = parameter;
        let mut visited: Vec<&str> = Vec::new();

        while let Some(pointer) = current.reference.as_deref() {
            if visited.contains(&pointer) || visited.len() >= self.max_depth {
                return Err(SpecError::CircularReference {
                    pointer: pointer.to_string(),
                });
            }
            visited.push(pointer);

            let name = strip_prefix(pointer, PARAMETER_PREFIX)?;
            current = self
                .components()
                .and_then(|c| c.parameters.get(name))
                .ok_or_else(|| SpecError::UnresolvedReference(pointer.to_string()))?;
        }

        Ok(current)
    }

    /// Follow the `$ref` chain of a request body.
    pub fn resolve_request_body<'s>(&'s self, body: &'s RequestBody) -> SpecResult<&'s RequestBody> {
        let mut current = body;
        let mut visited: Vec<&str> = Vec::new();

        while let Some(pointer) = current.reference.as_deref() {
            if visited.contains(&pointer) || visited.len() >= self.max_depth {
                return Err(SpecError::CircularReference {
                    pointer: pointer.to_string(),
                });
            }
            visited.push(pointer);

            let name = strip_prefix(pointer, REQUEST_BODY_PREFIX)?;
            current = self
                .components()
                .and_then(|c| c.request_bodies.get(name))
                .ok_or_else(|| SpecError::UnresolvedReference(pointer.to_string()))?;
        }

        Ok(current)
    }

    /// Path-level parameters for a path, `$ref`s resolved, declaration order.
    ///
    /// An unresolvable parameter reference is an error, not a skipped
    /// parameter.
    pub fn parameters_for_path(&self, path: &str) -> SpecResult<Vec<&Parameter>> {
        let Some(item) = self.path_item(path) else {
            return Ok(Vec::new());
        };
        item.parameters
            .iter()
            .map(|p| self.resolve_parameter(p))
            .collect()
    }

    /// Operation-level parameters, `$ref`s resolved, declaration order.
    pub fn parameters_for_operation<'s>(
        &'s self,
        operation: &'s Operation,
    ) -> SpecResult<Vec<&'s Parameter>> {
        operation
            .parameters
            .iter()
            .map(|p| self.resolve_parameter(p))
            .collect()
    }

    /// Methods declared for a path.
    pub fn methods_for_path(&self, path: &str) -> Vec<HttpMethod> {
        self.path_item(path)
            .map(|item| item.operations().map(|(method, _)| method).collect())
            .unwrap_or_default()
    }

    /// Look up the operation at (path, method).
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&'a Operation> {
        self.path_item(path)?
            .operations()
            .find(|(m, _)| *m == method)
            .map(|(_, op)| op)
    }

    /// Request body for an operation, `$ref` resolved.
    pub fn request_body_for_operation<'s>(
        &'s self,
        operation: &'s Operation,
    ) -> SpecResult<Option<&'s RequestBody>> {
        operation
            .request_body
            .as_ref()
            .map(|body| self.resolve_request_body(body))
            .transpose()
    }

    fn path_item(&self, path: &str) -> Option<&'a PathItem> {
        self.document.paths.as_ref()?.get(path)
    }
}

fn strip_prefix<'p>(pointer: &'p str, prefix: &str) -> SpecResult<&'p str> {
    pointer
        .strip_prefix(prefix)
        .ok_or_else(|| SpecError::UnresolvedReference(pointer.to_string()))
}
