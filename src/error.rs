//! Error types for path compilation.

use thiserror::Error;

/// Errors raised while turning a query string into a matcher chain.
///
/// Traversal itself never fails; everything that can go wrong happens
/// while compiling.
#[derive(Debug, Clone, Error)]
pub enum PathError {
    /// A segment produced a regular expression the regex engine rejected,
    /// e.g. unbalanced parentheses.
    #[error("Invalid pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
