//! Flattening documents into path strings.
//!
//! [`pathed()`] renders every leaf of a document under a `/`-joined path.
//! With escaping on, each rendered path is itself a query that selects
//! exactly that leaf again.
//!
//! # Examples
//!
//! ```
//! use treepath::output::pathed;
//! use serde_json::json;
//!
//! let doc = json!({"a": {"b.c": 1}, "list": ["x"]});
//!
//! let flat = pathed(&doc, true);
//! assert_eq!(flat["/a/b\\.c"], &json!(1));
//! assert_eq!(flat["/list/0"], &json!("x"));
//!
//! let readable = pathed(&doc, false);
//! assert_eq!(readable["/a/b.c"], &json!(1));
//! ```

use indexmap::IndexMap;

use crate::{tree::Tree, value::Key};

/// Characters with a meaning in path queries.
const SPECIAL_CHARS: &[char] = &['\\', '/', '.', '*', '?', '(', ')', '|', '=', ','];

pub struct PathPrinter {
    escape: bool,
}

impl PathPrinter {
    pub fn new(escape: bool) -> Self {
        PathPrinter { escape }
    }

    pub fn flatten<'a, T: Tree>(&self, data: &'a T) -> IndexMap<String, &'a T> {
        let mut result = IndexMap::new();
        self.flatten_into(data, String::new(), &mut result);
        result
    }

    fn flatten_into<'a, T: Tree>(
        &self,
        data: &'a T,
        prefix: String,
        result: &mut IndexMap<String, &'a T>,
    ) {
        for (key, child) in data.entries() {
            let path = format!("{}/{}", prefix, self.render_key(&key));
            if child.is_composite() && !child.entries().is_empty() {
                self.flatten_into(child, path, result);
            } else {
                result.insert(path, child);
            }
        }
    }

    fn render_key(&self, key: &Key) -> String {
        let text = key.to_string();
        if self.escape {
            escape_key(&text)
        } else {
            text
        }
    }
}

/// Backslash-escapes every character with a meaning in path queries.
///
/// ```
/// use treepath::output::escape_key;
///
/// assert_eq!(escape_key("*thing?"), "\\*thing\\?");
/// assert_eq!(escape_key(".."), "\\.\\.");
/// assert_eq!(escape_key("more/here"), "more\\/here");
/// ```
pub fn escape_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    for ch in key.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Maps the path of every leaf in `data` to the leaf.
///
/// Empty mappings and sequences count as leaves. Sequence entries appear
/// in enumeration order, highest index first. With `escape` off the paths
/// are easier to read but are not always valid queries.
pub fn pathed<T: Tree>(data: &T, escape: bool) -> IndexMap<String, &T> {
    PathPrinter::new(escape).flatten(data)
}
