//! Compiles single path tokens into typed patterns.
//!
//! Every token compiles to *some* pattern: malformed ranges fall back to
//! literal text, and only a regex the engine rejects is an error.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::{
    ast::RawToken,
    error::PathError,
    value::{Key, Scalar},
};

/// Regex options carried by a query, set with a `//imx` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RegexFlags(u8);

impl RegexFlags {
    /// `i`: case-insensitive
    pub const IGNORE_CASE: RegexFlags = RegexFlags(0b001);
    /// `x`: whitespace and `#` comments ignored
    pub const EXTENDED: RegexFlags = RegexFlags(0b010);
    /// `m`: `.` also matches newlines
    pub const MULTILINE: RegexFlags = RegexFlags(0b100);

    pub const fn empty() -> Self {
        RegexFlags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: RegexFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Maps a suffix letter to its flag.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'i' => Some(Self::IGNORE_CASE),
            'x' => Some(Self::EXTENDED),
            'm' => Some(Self::MULTILINE),
            _ => None,
        }
    }
}

impl BitOr for RegexFlags {
    type Output = RegexFlags;

    fn bitor(self, rhs: RegexFlags) -> RegexFlags {
        RegexFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for RegexFlags {
    fn bitor_assign(&mut self, rhs: RegexFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, letter) in [
            (Self::IGNORE_CASE, 'i'),
            (Self::MULTILINE, 'm'),
            (Self::EXTENDED, 'x'),
        ] {
            if self.contains(flag) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// A compiled key or value pattern.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Matches everything
    Any,

    /// Exact text, compared against the display form of keys and leaves
    Literal(String),

    /// Anchored full match; every group is a capture
    Regex { regex: Regex, flags: RegexFlags },

    /// `lo..hi`
    RangeInclusive(i64, i64),

    /// `lo...hi`
    RangeExclusive(i64, i64),

    /// `start,count`, i.e. `start...start+count`
    IndexLength { start: i64, count: i64 },

    /// The `..` marker; the query engine moves to the parent instead of
    /// matching entries
    Parent,

    /// A non-string key compared by equality
    PassThrough(Key),
}

/// Something a pattern can be tested against.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Key(&'a Key),
    Leaf(Scalar<'a>),
    /// A mapping or sequence value
    Composite,
    Pattern(&'a CompiledPattern),
}

impl CompiledPattern {
    /// Source of the anchored regex, if this is one.
    pub fn regex_source(&self) -> Option<&str> {
        match self {
            CompiledPattern::Regex { regex, .. } => Some(regex.as_str()),
            _ => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, CompiledPattern::Any)
    }

    pub fn is_parent(&self) -> bool {
        matches!(self, CompiledPattern::Parent)
    }

    /// Number of captures a successful match contributes.
    pub fn capture_count(&self) -> usize {
        match self {
            CompiledPattern::Regex { regex, .. } => regex.captures_len() - 1,
            _ => 0,
        }
    }

    /// Half-open `[lo, hi)` bounds of the exclusive range forms.
    fn exclusive_bounds(&self) -> Option<(i64, i64)> {
        match self {
            CompiledPattern::RangeExclusive(lo, hi) => Some((*lo, *hi)),
            CompiledPattern::IndexLength { start, count } => {
                Some((*start, start.saturating_add(*count)))
            }
            _ => None,
        }
    }

    fn contains(&self, n: f64) -> bool {
        match self {
            CompiledPattern::RangeInclusive(lo, hi) => *lo as f64 <= n && n <= *hi as f64,
            _ => match self.exclusive_bounds() {
                Some((lo, hi)) => lo as f64 <= n && n < hi as f64,
                None => false,
            },
        }
    }

    fn is_range(&self) -> bool {
        matches!(
            self,
            CompiledPattern::RangeInclusive(..)
                | CompiledPattern::RangeExclusive(..)
                | CompiledPattern::IndexLength { .. }
        )
    }

    /// Tests `subject` against this pattern.
    ///
    /// Returns the captured groups on success. Matching is directional: a
    /// regex pattern matches plain text, but plain text used as the pattern
    /// only matches an identical regex, and [`Any`](CompiledPattern::Any)
    /// only matches when it is the pattern.
    pub fn match_node(&self, subject: Subject<'_>) -> Option<Vec<String>> {
        if let Subject::Pattern(other) = subject {
            return self.match_pattern(other).then(Vec::new);
        }

        match self {
            CompiledPattern::Any => Some(Vec::new()),
            CompiledPattern::Parent => None,
            CompiledPattern::Literal(text) => text_of(subject)
                .filter(|candidate| candidate == text)
                .map(|_| Vec::new()),
            CompiledPattern::PassThrough(key) => text_of(subject)
                .filter(|candidate| *candidate == key.to_string())
                .map(|_| Vec::new()),
            CompiledPattern::Regex { regex, .. } => {
                let text = text_of(subject)?;
                let caps = regex.captures(&text)?;
                Some(
                    caps.iter()
                        .skip(1)
                        .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect(),
                )
            }
            _ => {
                let n = match subject {
                    Subject::Key(Key::Index(i)) => *i as f64,
                    Subject::Leaf(Scalar::Integer(n)) => n as f64,
                    Subject::Leaf(Scalar::Unsigned(n)) => n as f64,
                    Subject::Leaf(Scalar::Float(n)) => n,
                    _ => return None,
                };
                self.contains(n).then(Vec::new)
            }
        }
    }

    fn match_pattern(&self, other: &CompiledPattern) -> bool {
        match self {
            CompiledPattern::Any => true,
            CompiledPattern::Literal(text) => match other {
                CompiledPattern::Literal(o) => o == text,
                CompiledPattern::PassThrough(key) => key.to_string() == *text,
                _ => false,
            },
            CompiledPattern::PassThrough(key) => match other {
                CompiledPattern::Literal(o) => key.to_string() == *o,
                CompiledPattern::PassThrough(o) => o.to_string() == key.to_string(),
                _ => false,
            },
            _ => self == other,
        }
    }
}

fn text_of(subject: Subject<'_>) -> Option<String> {
    match subject {
        Subject::Key(key) => Some(key.to_string()),
        Subject::Leaf(scalar) => Some(scalar.to_string()),
        Subject::Composite | Subject::Pattern(_) => None,
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        use CompiledPattern::*;
        match (self, other) {
            (Any, Any) | (Parent, Parent) => true,
            (Literal(a), Literal(b)) => a == b,
            (PassThrough(a), PassThrough(b)) => a == b,
            (Regex { regex: a, flags: fa }, Regex { regex: b, flags: fb }) => {
                a.as_str() == b.as_str() && fa == fb
            }
            (RangeInclusive(a, b), RangeInclusive(c, d)) => a == c && b == d,
            _ if self.is_range() && other.is_range() => {
                match (self.exclusive_bounds(), other.exclusive_bounds()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledPattern::Any => f.write_str("*"),
            CompiledPattern::Literal(text) => f.write_str(text),
            CompiledPattern::Regex { regex, flags } if flags.is_empty() => {
                write!(f, "/{}/", regex.as_str())
            }
            CompiledPattern::Regex { regex, flags } => write!(f, "/{}/{}", regex.as_str(), flags),
            CompiledPattern::RangeInclusive(lo, hi) => write!(f, "{}..{}", lo, hi),
            CompiledPattern::RangeExclusive(lo, hi) => write!(f, "{}...{}", lo, hi),
            CompiledPattern::IndexLength { start, count } => write!(f, "{},{}", start, count),
            CompiledPattern::Parent => f.write_str(".."),
            CompiledPattern::PassThrough(key) => write!(f, "{}", key),
        }
    }
}

/// Compiles one token.
///
/// `flags` is the regex context of the whole query: when set, plain text
/// compiles to a regex as well so the flags apply to it.
pub fn compile(
    token: Option<&RawToken>,
    flags: Option<RegexFlags>,
) -> Result<CompiledPattern, PathError> {
    let pattern = match token {
        None => CompiledPattern::Any,
        Some(RawToken::Atom(key)) => CompiledPattern::PassThrough(key.clone()),
        Some(RawToken::Pattern(pattern)) => pattern.clone(),
        Some(RawToken::Parent) => CompiledPattern::Parent,
        Some(RawToken::Text(text)) => compile_text(text, flags)?,
    };
    trace!(?token, %pattern, "compiled token");
    Ok(pattern)
}

fn compile_text(text: &str, flags: Option<RegexFlags>) -> Result<CompiledPattern, PathError> {
    if text.chars().all(|c| c == '*' || c == '?') {
        return Ok(CompiledPattern::Any);
    }

    let plain = unescape(text);
    let escaped = text.contains('\\');

    if let Some(range) = parse_range(&plain) {
        return Ok(if escaped {
            CompiledPattern::Literal(plain)
        } else {
            range
        });
    }

    let scan = scan_glob(text);
    if !scan.has_syntax && flags.is_none() {
        return Ok(CompiledPattern::Literal(plain));
    }

    let flags = flags.unwrap_or_default();
    let source = format!(r"\A(?:{})\z", scan.source);
    let regex = RegexBuilder::new(&source)
        .case_insensitive(flags.contains(RegexFlags::IGNORE_CASE))
        .ignore_whitespace(flags.contains(RegexFlags::EXTENDED))
        .dot_matches_new_line(flags.contains(RegexFlags::MULTILINE))
        .build()
        .map_err(|source| PathError::Regex {
            pattern: text.to_string(),
            source,
        })?;

    Ok(CompiledPattern::Regex { regex, flags })
}

/// `lo..hi`, `lo...hi` or `start,count`.
fn parse_range(text: &str) -> Option<CompiledPattern> {
    if let Some((lo, hi)) = text.split_once("...") {
        return Some(CompiledPattern::RangeExclusive(parse_int(lo)?, parse_int(hi)?));
    }
    if let Some((lo, hi)) = text.split_once("..") {
        return Some(CompiledPattern::RangeInclusive(parse_int(lo)?, parse_int(hi)?));
    }
    if let Some((start, count)) = text.split_once(',') {
        return Some(CompiledPattern::IndexLength {
            start: parse_int(start)?,
            count: parse_int(count)?,
        });
    }
    None
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Drops escaping backslashes; a trailing lone backslash is dropped too.
pub(crate) fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                result.push(next);
            }
        } else {
            result.push(ch);
        }
    }
    result
}

struct GlobScan {
    source: String,
    has_syntax: bool,
}

/// Translates glob text into regex source.
///
/// `*` becomes `(.*)` and `?` becomes `(.?)`. Within a run of wildcards each
/// `?` before the first `*` is kept and the rest of the run collapses into a
/// single `(.*)`.
fn scan_glob(text: &str) -> GlobScan {
    let chars: Vec<char> = text.chars().collect();
    let mut source = String::new();
    let mut has_syntax = false;
    let mut position = 0;

    while position < chars.len() {
        match chars[position] {
            '\\' => {
                if let Some(&next) = chars.get(position + 1) {
                    push_literal(&mut source, next);
                }
                position += 2;
            }
            '*' | '?' => {
                has_syntax = true;
                while let Some('?') = chars.get(position) {
                    source.push_str("(.?)");
                    position += 1;
                }
                if let Some('*') = chars.get(position) {
                    source.push_str("(.*)");
                    while matches!(chars.get(position), Some('*') | Some('?')) {
                        position += 1;
                    }
                }
            }
            ch @ ('|' | '(' | ')') => {
                has_syntax = true;
                source.push(ch);
                position += 1;
            }
            ch => {
                push_literal(&mut source, ch);
                position += 1;
            }
        }
    }

    GlobScan { source, has_syntax }
}

/// Appends `ch` as literal regex text.
///
/// Whitespace is written as a `\x{..}` escape so the `x` flag cannot drop it.
fn push_literal(source: &mut String, ch: char) {
    if ch.is_whitespace() {
        source.push_str(&format!("\\x{{{:x}}}", ch as u32));
    } else {
        source.push_str(&regex::escape(&ch.to_string()));
    }
}
