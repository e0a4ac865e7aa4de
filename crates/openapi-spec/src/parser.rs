//! Spec loading and parsing

use crate::error::{SpecError, SpecResult};
use crate::types::OpenApiDocument;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

/// OpenAPI 3.x document loader
pub struct OpenApiParser;

impl OpenApiParser {
    /// Parse an OpenAPI document from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> SpecResult<OpenApiDocument> {
        // Sanitize content to handle problematic large numbers
        let content = Self::sanitize_large_numbers(content);

        // Try JSON first, then YAML
        let document: OpenApiDocument = if content.trim().starts_with('{') {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Self::validate(document)
    }

    /// Parse an OpenAPI document from JSON
    pub fn parse_json(content: &str) -> SpecResult<OpenApiDocument> {
        let content = Self::sanitize_large_numbers(content);
        let document: OpenApiDocument = serde_json::from_str(&content)?;
        Self::validate(document)
    }

    /// Parse an OpenAPI document from YAML
    pub fn parse_yaml(content: &str) -> SpecResult<OpenApiDocument> {
        let content = Self::sanitize_large_numbers(content);
        let document: OpenApiDocument = serde_yaml::from_str(&content)?;
        Self::validate(document)
    }

    /// Read and parse an OpenAPI document from a file (extension-aware)
    pub fn from_file(path: &str) -> SpecResult<OpenApiDocument> {
        let content = std::fs::read_to_string(path)?;
        if path.ends_with(".yaml") || path.ends_with(".yml") {
            Self::parse_yaml(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Sanitize large numbers that may cause parsing issues
    ///
    /// Some specs (like OpenAI's) use very large integers for min/max values
    /// which can fail deserialization with "JSON number out of range". The
    /// exact value of such bounds does not matter for function generation.
    fn sanitize_large_numbers(content: &str) -> String {
        let re_large = Regex::new(
            r"(?m)^(\s*(?:minimum|maximum|exclusiveMinimum|exclusiveMaximum):\s*)(-?\d{16,})",
        )
        .unwrap();
        let content = re_large.replace_all(content, |caps: &regex::Captures| {
            let prefix = &caps[1];
            let num_str = &caps[2];
            if num_str.starts_with('-') {
                format!("{}-2147483648", prefix)
            } else {
                format!("{}2147483647", prefix)
            }
        });

        content.into_owned()
    }

    /// Fetch and parse an OpenAPI document from a URL
    pub async fn fetch_and_parse(url: &str) -> SpecResult<OpenApiDocument> {
        info!("Fetching OpenAPI spec from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| load_error(url, e))?;

        let response = client
            .get(url)
            .header("Accept", "application/json, application/yaml, text/yaml")
            .send()
            .await
            .map_err(|e| load_error(url, e))?;

        if !response.status().is_success() {
            return Err(SpecError::Load {
                source_id: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let content = response.text().await.map_err(|e| load_error(url, e))?;

        // Parse based on content type or file extension
        if content_type.contains("yaml") || url.ends_with(".yaml") || url.ends_with(".yml") {
            Self::parse_yaml(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Load a document from a URL, a file path, or inline document text.
    ///
    /// Failures carry the original source identifier for diagnostics.
    pub async fn load(source: &str) -> SpecResult<OpenApiDocument> {
        if let Ok(url) = Url::parse(source) {
            if matches!(url.scheme(), "http" | "https") {
                return Self::fetch_and_parse(source).await;
            }
        }

        if std::path::Path::new(source).is_file() {
            debug!("Loading OpenAPI spec from file: {}", source);
            return Self::from_file(source).map_err(|e| load_error(source, e));
        }

        Self::parse(source).map_err(|e| load_error(source, e))
    }

    /// Validate top-level document structure
    fn validate(document: OpenApiDocument) -> SpecResult<OpenApiDocument> {
        if !document.openapi.starts_with("3.") {
            return Err(SpecError::InvalidSpec(format!(
                "unsupported OpenAPI version: {}",
                document.openapi
            )));
        }

        debug!(
            "Parsed OpenAPI {} spec: {}",
            document.openapi, document.info.title
        );

        Ok(document)
    }
}

fn load_error(source: &str, reason: impl std::fmt::Display) -> SpecError {
    SpecError::Load {
        source_id: source_label(source),
        reason: reason.to_string(),
    }
}

/// Truncate inline document text so error messages stay readable.
fn source_label(source: &str) -> String {
    const MAX: usize = 120;
    if source.chars().count() > MAX {
        let truncated: String = source.chars().take(MAX).collect();
        format!("{}...", truncated)
    } else {
        source.to_string()
    }
}
