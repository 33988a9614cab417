//! CLI support for treepath
//!
//! Provides programmatic access to the treepath commands for embedding in
//! other tools.

mod find;
mod flatten;

pub use find::{FindOptions, execute_find};
pub use flatten::{FlattenOptions, execute_flatten};

use std::io;

use thiserror::Error;

use crate::{Key, RegexFlags};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Query compilation error
    #[error("Query error: {0}")]
    Path(#[from] crate::PathError),
    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
    /// Letter other than i, m or x given as a regex flag
    #[error("Unknown regex flag: '{0}' (expected any of i, m, x)")]
    UnknownFlag(char),
}

fn parse_input(input: Option<&str>) -> Result<serde_json::Value, CliError> {
    let json_str = input.ok_or(CliError::NoInput)?;
    Ok(serde_json::from_str(json_str)?)
}

fn parse_flags(letters: &str) -> Result<RegexFlags, CliError> {
    letters.chars().try_fold(RegexFlags::empty(), |flags, letter| {
        RegexFlags::from_letter(letter)
            .map(|flag| flags | flag)
            .ok_or(CliError::UnknownFlag(letter))
    })
}

fn key_to_json(key: &Key) -> serde_json::Value {
    match key {
        Key::Name(name) => serde_json::Value::String(name.clone()),
        Key::Index(i) => serde_json::Value::from(*i),
    }
}

fn path_to_json(path: &[Key]) -> serde_json::Value {
    serde_json::Value::Array(path.iter().map(key_to_json).collect())
}
