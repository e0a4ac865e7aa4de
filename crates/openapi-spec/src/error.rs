//! Error types for spec loading and resolution

use thiserror::Error;

/// Result type alias for spec operations
pub type SpecResult<T> = std::result::Result<T, SpecError>;

/// Spec error types
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("invalid OpenAPI spec: {0}")]
    InvalidSpec(String),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("circular reference at {pointer}")]
    CircularReference { pointer: String },

    #[error("failed to load spec from {source_id}: {reason}")]
    Load { source_id: String, reason: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
