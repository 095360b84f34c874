//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a string for CLI output. Backend failures are
/// prefixed so scripts can tell them apart from input problems.
pub fn map_error(e: &ApiError) -> String {
    if e.is_backend() {
        format!("backend error: {}", e)
    } else {
        e.to_string()
    }
}

/// Parse a `--source`/`--args` flag value into a JSON object
pub fn parse_json_object(
    flag: &str,
    text: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::InvalidArgument {
            name: flag.to_string(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(ApiError::InvalidArgument {
            name: flag.to_string(),
            reason: format!("invalid JSON: {}", e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_object() {
        let map = parse_json_object("source", r#"{"title": "Inception"}"#).unwrap();
        assert_eq!(map["title"], "Inception");
        assert!(parse_json_object("source", "[1, 2]").is_err());
        assert!(parse_json_object("args", "{not json").is_err());
    }

    #[test]
    fn test_map_error_marks_backend_failures() {
        let err = ApiError::ProviderRateLimit("slow down".to_string());
        assert!(map_error(&err).starts_with("backend error:"));
        let err = ApiError::ConfigError("bad".to_string());
        assert!(!map_error(&err).starts_with("backend error:"));
    }
}
