//! Function name derivation

use openapi_spec::{HttpMethod, Operation};
use std::collections::HashSet;

/// Derives bounded-length, collision-free names for operations.
///
/// The used-name registry lives for a single conversion; names assigned in
/// one conversion do not constrain another.
pub struct NameGenerator {
    max_len: usize,
    used: HashSet<String>,
}

impl NameGenerator {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            used: HashSet::new(),
        }
    }

    /// Name for an operation: its `operationId` truncated verbatim, or a
    /// sanitized `{method}_{path}` fallback. Collisions after truncation get
    /// a numeric suffix inside the length bound.
    pub fn generate(&mut self, operation: &Operation, path: &str, method: HttpMethod) -> String {
        let base = match &operation.operation_id {
            // An operationId is assumed identifier-safe and passed through as-is
            Some(id) => truncate(id, self.max_len),
            None => {
                let name = format!(
                    "{}_{}",
                    method.as_str().to_lowercase(),
                    sanitize_path(path)
                );
                truncate(&name, self.max_len)
            }
        };

        let name = self.disambiguate(base);
        self.used.insert(name.clone());
        name
    }

    fn disambiguate(&self, base: String) -> String {
        if !self.used.contains(&base) {
            return base;
        }
        let mut n: usize = 2;
        loop {
            let suffix = format!("_{}", n);
            let keep = self.max_len.saturating_sub(suffix.len());
            let candidate = format!("{}{}", truncate(&base, keep), suffix);
            if !self.used.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Replace every run of non-alphanumeric characters with a single underscore
/// and strip leading/trailing underscores.
fn sanitize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut pending_separator = false;

    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}

fn truncate(name: &str, max_len: usize) -> String {
    name.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(operation_id: Option<&str>) -> Operation {
        serde_json::from_value(serde_json::json!({
            "operationId": operation_id,
        }))
        .unwrap()
    }

    #[test]
    fn test_operation_id_passed_through() {
        let mut names = NameGenerator::new(64);
        let name = names.generate(
            &operation(Some("showPetById")),
            "/pets/{petId}",
            HttpMethod::Get,
        );
        assert_eq!(name, "showPetById");
    }

    #[test]
    fn test_operation_id_not_re_sanitized() {
        let mut names = NameGenerator::new(64);
        let name = names.generate(
            &operation(Some("users.get-all")),
            "/users",
            HttpMethod::Get,
        );
        assert_eq!(name, "users.get-all");
    }

    #[test]
    fn test_operation_id_truncated_verbatim() {
        let long_id = "a".repeat(80) + ".!?";
        let mut names = NameGenerator::new(64);
        let name = names.generate(&operation(Some(long_id.as_str())), "/x", HttpMethod::Get);
        assert_eq!(name, "a".repeat(64));
    }

    #[test]
    fn test_derived_name_from_path_and_method() {
        let mut names = NameGenerator::new(64);
        let name = names.generate(&operation(None), "/pets/{petId}", HttpMethod::Get);
        assert_eq!(name, "get_pets_petId");
    }

    #[test]
    fn test_derived_name_collapses_runs_and_trims() {
        let mut names = NameGenerator::new(64);
        let name = names.generate(&operation(None), "//v1//shops--{id}/", HttpMethod::Post);
        assert_eq!(name, "post_v1_shops_id");
    }

    #[test]
    fn test_derived_names_stay_in_charset_and_bounds() {
        let mut names = NameGenerator::new(20);
        let paths = [
            "/a/very/long/path/with/many/segments/{id}",
            "/weird/&^%$/chars!!",
            "/",
            "/unicode/路径/ok",
        ];
        for (i, path) in paths.iter().enumerate() {
            let method = if i % 2 == 0 { HttpMethod::Get } else { HttpMethod::Put };
            let name = names.generate(&operation(None), path, method);
            assert!(name.chars().count() <= 20, "too long: {}", name);
            assert!(
                name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "bad charset: {}",
                name
            );
        }
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let mut names = NameGenerator::new(16);
        let path = "/one/long/shared/prefix/that/truncates/identically";

        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let name = names.generate(&operation(None), path, HttpMethod::Get);
            assert!(name.chars().count() <= 16, "too long: {}", name);
            assert!(seen.insert(name.clone()), "duplicate name: {}", name);
        }
    }

    #[test]
    fn test_colliding_operation_ids_disambiguated() {
        let mut names = NameGenerator::new(64);
        let a = names.generate(&operation(Some("dup")), "/a", HttpMethod::Get);
        let b = names.generate(&operation(Some("dup")), "/b", HttpMethod::Get);
        assert_eq!(a, "dup");
        assert_eq!(b, "dup_2");
    }
}
