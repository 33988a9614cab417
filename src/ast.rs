//! # Path query syntax tree
//!
//! A query string such as `a/b=foo|bar/**/c` is split into [`Segment`]s, one
//! per `/`-delimited component. Each segment carries the raw key and value
//! tokens that the pattern compiler later turns into
//! [`CompiledPattern`](crate::pattern::CompiledPattern)s.
//!
//! ## Grammar
//!
//! ```text
//! path     := segment ( "/" segment )* ( "//" flags )?
//! segment  := "**" | ".." | "." | key ( "=" value )?
//! flags    := [imx]*
//! ```
//!
//! `\` escapes any of `/ . * ? | ( ) = \` (and `,`).
//!
//! - `**` marks the following segment as recursive
//! - `..` steps back to the parent of the current node
//! - `.` is the current node and is dropped
//! - `*` and `?` are wildcards; `|` and `( )` are regex alternation and groups
//! - `lo..hi`, `lo...hi` and `start,count` are numeric ranges

use crate::{pattern::CompiledPattern, value::Key};

/// A pattern token before compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawToken {
    /// Segment text, escapes still in place
    Text(String),

    /// A non-string key matched by equality
    Atom(Key),

    /// An already-compiled pattern, used as is
    Pattern(CompiledPattern),

    /// The `..` marker
    Parent,
}

impl From<&str> for RawToken {
    fn from(text: &str) -> Self {
        RawToken::Text(text.to_string())
    }
}

impl From<String> for RawToken {
    fn from(text: String) -> Self {
        RawToken::Text(text)
    }
}

impl From<Key> for RawToken {
    fn from(key: Key) -> Self {
        RawToken::Atom(key)
    }
}

impl From<CompiledPattern> for RawToken {
    fn from(pattern: CompiledPattern) -> Self {
        RawToken::Pattern(pattern)
    }
}

/// One component of a query path.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Key pattern; `None` leaves the key unconstrained
    pub key: Option<RawToken>,

    /// Value pattern; `None` leaves the value unconstrained
    pub value: Option<RawToken>,

    /// Search the whole subtree instead of the immediate children
    pub recursive: bool,

    /// Set on the final segment of a path
    pub is_last: bool,
}

impl Segment {
    pub fn new(key: Option<RawToken>, value: Option<RawToken>, recursive: bool) -> Self {
        Segment {
            key,
            value,
            recursive,
            is_last: false,
        }
    }
}
