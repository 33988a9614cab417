//! Run path queries against JSON input

use serde_json::json;

use super::{CliError, parse_flags, parse_input, path_to_json};
use crate::{Query, Tree};

/// Options for the find command
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// The path query to run
    pub query: String,
    /// JSON input string
    pub input: Option<String>,
    /// Regex flag letters merged with any `//flags` suffix of the query
    pub flags: Option<String>,
}

/// Execute a find operation, returning one JSON record per match
///
/// Each record has the form
/// `{"path": [...], "value": ..., "captures": [...], "splats": [[...], ...]}`.
pub fn execute_find(options: &FindOptions) -> Result<Vec<serde_json::Value>, CliError> {
    let flags = options.flags.as_deref().map(parse_flags).transpose()?;
    let query = Query::with_flags(&options.query, flags)?;
    let document = parse_input(options.input.as_deref())?;

    let mut records = Vec::new();
    query.find_each(&document, |container, key, found| {
        let value = container.child(key).cloned().unwrap_or(serde_json::Value::Null);
        let splats: Vec<serde_json::Value> =
            found.splats().iter().map(|splat| path_to_json(&splat.path)).collect();
        records.push(json!({
            "path": path_to_json(found.path()),
            "value": value,
            "captures": found.captures(),
            "splats": splats,
        }));
    });
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(query: &str, input: &str) -> FindOptions {
        FindOptions {
            query: query.to_string(),
            input: Some(input.to_string()),
            flags: None,
        }
    }

    #[test]
    fn test_find_records() {
        let records = execute_find(&options("**/name=a*", r#"{"users": [{"name": "ann"}]}"#)).unwrap();
        assert_eq!(
            records,
            vec![json!({
                "path": ["users", 0, "name"],
                "value": "ann",
                "captures": ["nn"],
                "splats": [["users", 0]],
            })]
        );
    }

    #[test]
    fn test_find_with_flags() {
        let mut opts = options("NAME", r#"{"name": 1}"#);
        assert!(execute_find(&opts).unwrap().is_empty());

        opts.flags = Some("i".to_string());
        assert_eq!(execute_find(&opts).unwrap().len(), 1);
    }

    #[test]
    fn test_find_bad_query() {
        let result = execute_find(&options("a(b", "{}"));
        assert!(matches!(result, Err(CliError::Path(_))));
    }
}
