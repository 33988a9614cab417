//! Flatten JSON input into path/leaf pairs

use super::{CliError, parse_input};
use crate::output::pathed;

/// Options for the flatten command
#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    /// JSON input string
    pub input: Option<String>,
    /// Leave special characters in keys unescaped
    pub raw: bool,
}

/// Execute a flatten operation, returning a JSON object from paths to leaves
pub fn execute_flatten(options: &FlattenOptions) -> Result<serde_json::Value, CliError> {
    let document = parse_input(options.input.as_deref())?;
    let flat = pathed(&document, !options.raw)
        .into_iter()
        .map(|(path, leaf)| (path, leaf.clone()))
        .collect();
    Ok(serde_json::Value::Object(flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_escapes_by_default() {
        let options = FlattenOptions {
            input: Some(r#"{"a.b": {"c": [1]}}"#.to_string()),
            raw: false,
        };
        assert_eq!(execute_flatten(&options).unwrap(), json!({"/a\\.b/c/0": 1}));
    }

    #[test]
    fn test_flatten_raw() {
        let options = FlattenOptions {
            input: Some(r#"{"a.b": {"c": [1]}}"#.to_string()),
            raw: true,
        };
        assert_eq!(execute_flatten(&options).unwrap(), json!({"/a.b/c/0": 1}));
    }
}
