use crate::{
    ast::{RawToken, Segment},
    error::PathError,
    lexer::{Lexer, split_key_value},
    matcher::SegmentMatcher,
    pattern::{CompiledPattern, RegexFlags},
};

/// Builds segments and matcher chains from path strings.
///
/// The `//flags` suffix is not handled here; strip it first with
/// [`parse_regex_opts`](crate::lexer::parse_regex_opts), as
/// [`Query`](crate::Query) does.
pub struct Parser {
    lexer: Lexer,
    recursive: bool,
}

impl Parser {
    pub fn new(path: &str) -> Self {
        Parser {
            lexer: Lexer::new(path),
            recursive: false,
        }
    }

    /// Splits `path` into its segments, the last one flagged `is_last`.
    ///
    /// ```
    /// use treepath::parser::Parser;
    ///
    /// let segments = Parser::segments("path/**/to=foo/item");
    /// assert_eq!(segments.len(), 3);
    /// assert!(segments[1].recursive);
    /// assert!(segments[2].is_last);
    /// ```
    pub fn segments(path: &str) -> Vec<Segment> {
        let mut parser = Parser::new(path);
        let mut segments = Vec::new();
        while let Some(segment) = parser.next_segment() {
            segments.push(segment);
        }
        if let Some(last) = segments.last_mut() {
            last.is_last = true;
        }
        segments
    }

    /// Compiles `path` into a matcher chain.
    pub fn parse(path: &str, flags: Option<RegexFlags>) -> Result<Vec<SegmentMatcher>, PathError> {
        let mut matchers = Vec::new();
        Self::parse_each(path, flags, |matcher, _| matchers.push(matcher))?;
        Ok(matchers)
    }

    /// Compiles `path` one segment at a time, handing each matcher to
    /// `callback` together with whether it is the last one.
    ///
    /// Nothing is handed over if any segment fails to compile.
    pub fn parse_each<F>(path: &str, flags: Option<RegexFlags>, mut callback: F) -> Result<(), PathError>
    where
        F: FnMut(SegmentMatcher, bool),
    {
        let mut compiled = Vec::new();
        for segment in Self::segments(path) {
            compiled.push((SegmentMatcher::from_segment(&segment, flags)?, segment.is_last));
        }

        for (matcher, is_last) in compiled {
            callback(matcher, is_last);
        }
        Ok(())
    }

    fn next_segment(&mut self) -> Option<Segment> {
        while let Some(text) = self.lexer.next_segment() {
            match text.as_str() {
                "" | "." => continue,
                "**" => {
                    self.recursive = true;
                    continue;
                }
                _ => {}
            }

            let (key, value) = split_key_value(&text);
            let value = value.filter(|v| !v.is_empty()).map(RawToken::Text);

            let key = match key.as_str() {
                // After `**` a parent step is meaningless: without a value
                // it is dropped, with one it matches any key.
                ".." if self.recursive => match value {
                    None => continue,
                    Some(_) => Some(RawToken::from("*")),
                },
                ".." => Some(RawToken::Parent),
                "**" => {
                    self.recursive = true;
                    Some(RawToken::from("*"))
                }
                "" => None,
                _ => Some(RawToken::Text(key)),
            };

            let recursive = std::mem::take(&mut self.recursive);
            return Some(Segment::new(key, value, recursive));
        }

        // A trailing `**` matches anything below.
        if std::mem::take(&mut self.recursive) {
            return Some(Segment::new(
                Some(RawToken::Pattern(CompiledPattern::Any)),
                None,
                true,
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_flags_last() {
        let segments = Parser::segments("a/b/c");
        let last: Vec<bool> = segments.iter().map(|s| s.is_last).collect();
        assert_eq!(last, vec![false, false, true]);
        assert!(Parser::segments("").is_empty());
        assert!(Parser::segments("///./").is_empty());
    }

    #[test]
    fn test_parent_token() {
        let segments = Parser::segments("path/../item");
        assert_eq!(segments[1].key, Some(RawToken::Parent));
        assert!(!segments[1].recursive);
    }

    #[test]
    fn test_recursive_value_segment() {
        let segments = Parser::segments("**=foo");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].key, Some(RawToken::from("*")));
        assert_eq!(segments[0].value, Some(RawToken::from("foo")));
        assert!(segments[0].recursive);
    }

    #[test]
    fn test_parse_each_reports_nothing_on_error() {
        let mut seen = 0;
        let result = Parser::parse_each("ok/a(b", None, |_, _| seen += 1);
        assert!(result.is_err());
        assert_eq!(seen, 0);
    }
}
