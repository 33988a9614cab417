use crate::pattern::RegexFlags;

/// Splits a path string into raw segment texts.
///
/// Segments are separated by unescaped `/`. An escaped slash (`\/`) is kept
/// as a plain `/` inside its segment; every other escape is left in place
/// for the pattern compiler. Empty segments are returned as empty strings.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the next segment text, or `None` once the input is consumed.
    pub fn next_segment(&mut self) -> Option<String> {
        if self.is_eof() {
            return None;
        }

        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            match ch {
                '/' => {
                    self.advance();
                    return Some(result);
                }
                '\\' => {
                    match self.peek_char(1) {
                        Some('/') => result.push('/'),
                        Some(next) => {
                            result.push('\\');
                            result.push(next);
                        }
                        None => result.push('\\'),
                    }
                    self.advance();
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }
        Some(result)
    }
}

impl Iterator for Lexer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_segment()
    }
}

/// Splits segment text on its first unescaped `=`.
///
/// The value half is `None` when there is no `=`.
pub fn split_key_value(text: &str) -> (String, Option<String>) {
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' => return (text[..i].to_string(), Some(text[i + 1..].to_string())),
            _ => {}
        }
    }
    (text.to_string(), None)
}

/// Strips a trailing `//flags` suffix from `path`.
///
/// The flags found are OR-ed onto `base`. Returns the merged flags and the
/// path without its suffix. With neither a suffix flag nor a base the flags
/// are `None`, which is distinct from an empty set.
///
/// ```
/// use treepath::lexer::parse_regex_opts;
/// use treepath::RegexFlags;
///
/// let (flags, path) = parse_regex_opts("path/to/item//m", Some(RegexFlags::EXTENDED));
/// assert_eq!(path, "path/to/item");
/// assert_eq!(flags, Some(RegexFlags::EXTENDED | RegexFlags::MULTILINE));
/// ```
pub fn parse_regex_opts(path: &str, base: Option<RegexFlags>) -> (Option<RegexFlags>, String) {
    let Some((start, letters)) = flag_suffix(path) else {
        return (base, path.to_string());
    };

    let mut flags = base.unwrap_or_default();
    for letter in letters.chars() {
        if let Some(flag) = RegexFlags::from_letter(letter) {
            flags |= flag;
        }
    }

    let flags = if flags.is_empty() && base.is_none() {
        None
    } else {
        Some(flags)
    };
    (flags, path[..start].to_string())
}

/// Byte offset of a trailing `//` made of two unescaped slashes, followed
/// only by flag letters.
fn flag_suffix(path: &str) -> Option<(usize, &str)> {
    let mut escaped = false;
    let mut slashes = Vec::new();
    for (i, ch) in path.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '/' => slashes.push(i),
            _ => {}
        }
    }

    // The suffix starts at the first of the last adjacent slash pair.
    let (&second, rest) = slashes.split_last()?;
    let &first = rest.last()?;
    if first + 1 != second {
        return None;
    }

    let letters = &path[second + 1..];
    letters
        .chars()
        .all(|c| RegexFlags::from_letter(c).is_some())
        .then_some((first, letters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(input: &str) -> Vec<String> {
        Lexer::new(input).collect()
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(segments("path/to/item"), vec!["path", "to", "item"]);
        assert_eq!(segments("/a//b/"), vec!["", "a", "", "b"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_escaped_slash() {
        assert_eq!(segments("path\\/to/item"), vec!["path/to", "item"]);
        assert_eq!(segments("path\\/to/item\\//i"), vec!["path/to", "item/", "i"]);
        assert_eq!(segments("a\\*b/c\\\\/d"), vec!["a\\*b", "c\\\\", "d"]);
    }

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value("to=foo"), ("to".into(), Some("foo".into())));
        assert_eq!(split_key_value("=foo"), ("".into(), Some("foo".into())));
        assert_eq!(split_key_value("a=b=c"), ("a".into(), Some("b=c".into())));
        assert_eq!(split_key_value("a\\=b"), ("a\\=b".into(), None));
        assert_eq!(split_key_value("item"), ("item".into(), None));
    }

    #[test]
    fn test_parse_regex_opts() {
        let (flags, path) = parse_regex_opts("path/to/item///mix", None);
        assert_eq!(path, "path/to/item/");
        assert_eq!(
            flags,
            Some(RegexFlags::IGNORE_CASE | RegexFlags::EXTENDED | RegexFlags::MULTILINE)
        );
    }

    #[test]
    fn test_parse_regex_opts_mix() {
        let (flags, _) = parse_regex_opts("path/to/item//m", Some(RegexFlags::EXTENDED));
        assert_eq!(flags, Some(RegexFlags::EXTENDED | RegexFlags::MULTILINE));
    }

    #[test]
    fn test_parse_regex_opts_none() {
        assert_eq!(parse_regex_opts("path/to/item//", None).0, None);
        assert_eq!(
            parse_regex_opts("path/to/item//", Some(RegexFlags::EXTENDED)).0,
            Some(RegexFlags::EXTENDED)
        );
        assert_eq!(parse_regex_opts("path/to/item", None), (None, "path/to/item".to_string()));
    }

    #[test]
    fn test_parse_regex_opts_requires_unescaped_slashes() {
        let (flags, path) = parse_regex_opts("path\\/to/item\\//i", None);
        assert_eq!(flags, None);
        assert_eq!(path, "path\\/to/item\\//i");

        let (flags, path) = parse_regex_opts("a//b/key", None);
        assert_eq!(flags, None);
        assert_eq!(path, "a//b/key");
    }
}
