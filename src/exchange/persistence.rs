use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{BlendError, Result};
use crate::exchange::request::OptimizationRequest;

/// Path that stands for standard input or output.
pub const STDIO_PATH: &str = "-";

/// Load a request from a JSON file, or from stdin when `path` is `-`.
///
/// A body that is not a valid request is a configuration error.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<OptimizationRequest> {
    let path = path.as_ref();
    let content = if path == Path::new(STDIO_PATH) {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    debug!(path = %path.display(), bytes = content.len(), "request read");
    parse_request(&content)
}

pub fn parse_request(content: &str) -> Result<OptimizationRequest> {
    serde_json::from_str(content)
        .map_err(|e| BlendError::configuration(format!("malformed request: {}", e)))
}

/// Pretty-print `value` as JSON to a file, or to stdout when `path` is `None` or `-`.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: Option<P>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) if p.as_ref() != Path::new(STDIO_PATH) => {
            fs::write(p.as_ref(), json)?;
            debug!(path = %p.as_ref().display(), "response written");
        }
        _ => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::response::ErrorResponse;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_request_from_file() {
        let json = r#"{"ingredients": [{"name": "Rice", "estimated_nutrition": {"calories": 350, "carbs": 78}}]}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let request = load_request(file.path()).unwrap();
        let ings = request.ingredients();
        assert_eq!(ings.len(), 1);
        assert_eq!(ings[0].nutrition_per_unit.carbs, 78.0);
    }

    #[test]
    fn test_malformed_request_is_configuration_error() {
        let result = parse_request(r#"{"target_nutrition": {}}"#);
        assert!(matches!(result, Err(BlendError::Configuration(_))));

        let result = parse_request("not json");
        assert!(matches!(result, Err(BlendError::Configuration(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_request(dir.path().join("absent.json"));
        assert!(matches!(result, Err(BlendError::Io(_))));
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(Some(&path), &ErrorResponse::new(&"boom")).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["error"], "boom");
    }
}
