//! # function-gen
//!
//! Turns an OpenAPI 3.x document into tool-calling function definitions:
//! one function per (path, method) operation, with parameters flattened
//! into a single JSON-Schema object and names bounded in length.

mod config;
mod definition;
mod generator;
mod naming;

pub use config::{FlatteningMode, GeneratorConfig, DEFAULT_MAX_NAME_LENGTH};
pub use definition::{FunctionDefinition, FunctionParameters, FunctionSet};
pub use generator::FunctionGenerator;
pub use naming::NameGenerator;

use openapi_spec::{OpenApiParser, SpecResult};

/// Load a spec from a URL, file path or inline text and generate function
/// definitions from it.
pub async fn convert_spec_to_functions(
    source: &str,
    config: GeneratorConfig,
) -> SpecResult<FunctionSet> {
    let document = OpenApiParser::load(source).await?;
    FunctionGenerator::with_config(config).generate(&document)
}
