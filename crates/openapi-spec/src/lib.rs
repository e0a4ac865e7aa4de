//! # openapi-spec
//!
//! OpenAPI 3.x document model, loader and `$ref` resolver.
//! Parses specs from URLs, files or inline text and resolves references
//! against the document's local component registry.

mod convert;
mod error;
mod parser;
mod resolver;
mod types;

pub use convert::SchemaConverter;
pub use error::{SpecError, SpecResult};
pub use parser::OpenApiParser;
pub use resolver::{SpecResolver, DEFAULT_MAX_REF_DEPTH};
pub use types::*;
