//! # treepath
//!
//! A small path language for selecting elements inside nested documents
//! built from ordered mappings and sequences, such as parsed JSON or YAML.
//!
//! ```
//! use treepath::Key;
//! use serde_json::json;
//!
//! let doc = json!({"key1": {"key1a": 1, "key1b": 2}, "key2": 3});
//!
//! let keys: Vec<Key> = treepath::find("*/key1?", &doc)
//!     .unwrap()
//!     .into_iter()
//!     .filter_map(|m| m.key().cloned())
//!     .collect();
//! assert_eq!(keys, vec![Key::from("key1a"), Key::from("key1b")]);
//! ```
//!
//! See [`ast`] for the query grammar.

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod pattern;
pub mod tree;
pub mod value;

pub use ast::{RawToken, Segment};
pub use error::PathError;
pub use evaluator::{Match, Query, Splat, find, find_each};
pub use lexer::Lexer;
pub use matcher::SegmentMatcher;
pub use output::pathed;
pub use parser::Parser;
pub use pattern::{CompiledPattern, RegexFlags};
pub use tree::Tree;
pub use value::{Key, Scalar, Value};
