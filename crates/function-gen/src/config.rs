//! Generator configuration

use openapi_spec::DEFAULT_MAX_REF_DEPTH;

/// Default bound on function name length.
///
/// Tool-calling APIs commonly reject names longer than 64 characters; the
/// bound is configurable because it is an external constraint, not a
/// property of the spec.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;

/// How parameters of an operation are laid out in the emitted schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlatteningMode {
    /// One flat `properties` map; every entry carries a `location` tag
    /// (query/path/header/cookie/body) and `required` lists only names
    /// individually marked required.
    #[default]
    Flat,
    /// Parameters grouped by location under `params`, `headers`, `cookies`
    /// and `path_params`, request body under `data`; `required` lists every
    /// top-level key present.
    Bucketed,
}

/// Configuration for [`crate::FunctionGenerator`]
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub flattening: FlatteningMode,
    pub max_name_length: usize,
    pub max_ref_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            flattening: FlatteningMode::default(),
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_ref_depth: DEFAULT_MAX_REF_DEPTH,
        }
    }
}

impl GeneratorConfig {
    pub fn with_flattening(mut self, flattening: FlatteningMode) -> Self {
        self.flattening = flattening;
        self
    }

    pub fn with_max_name_length(mut self, max_name_length: usize) -> Self {
        self.max_name_length = max_name_length;
        self
    }

    pub fn with_max_ref_depth(mut self, max_ref_depth: usize) -> Self {
        self.max_ref_depth = max_ref_depth;
        self
    }
}
