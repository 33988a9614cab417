use crate::{
    ast::{RawToken, Segment},
    error::PathError,
    evaluator::{Match, Splat},
    pattern::{CompiledPattern, RegexFlags, Subject, compile},
    tree::Tree,
    value::Key,
};

/// Matches one path segment against the entries of a node.
///
/// A matcher pairs an optional key pattern with an optional value pattern.
/// Absent patterns leave that side unconstrained. A recursive matcher
/// searches the whole subtree below the node instead of its immediate
/// entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMatcher {
    key: Option<CompiledPattern>,
    value: Option<CompiledPattern>,
    recursive: bool,
}

/// One entry a matcher accepted.
#[derive(Debug)]
pub(crate) struct Hit<'a, T> {
    /// The node holding `key`
    pub container: &'a T,
    pub key: Key,
    pub value: &'a T,
    /// Path from the searched node down to `key`
    pub path: Vec<Key>,
    pub captures: Vec<String>,
    /// Set by recursive matchers
    pub splat: Option<Vec<Key>>,
}

impl SegmentMatcher {
    /// Compiles a matcher from raw tokens.
    ///
    /// Empty text counts as absent.
    ///
    /// ```
    /// use treepath::SegmentMatcher;
    ///
    /// let matcher = SegmentMatcher::new(Some("foo*".into()), Some("*bar*".into()), None).unwrap();
    /// assert_eq!(matcher.key().unwrap().regex_source(), Some(r"\A(?:foo(.*))\z"));
    /// assert!(!matcher.is_recursive());
    /// ```
    pub fn new(
        key: Option<RawToken>,
        value: Option<RawToken>,
        flags: Option<RegexFlags>,
    ) -> Result<Self, PathError> {
        Ok(SegmentMatcher {
            key: compile_present(key, flags)?,
            value: compile_present(value, flags)?,
            recursive: false,
        })
    }

    pub fn from_segment(segment: &Segment, flags: Option<RegexFlags>) -> Result<Self, PathError> {
        Ok(Self::new(segment.key.clone(), segment.value.clone(), flags)?.recursive(segment.recursive))
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn key(&self) -> Option<&CompiledPattern> {
        self.key.as_ref()
    }

    pub fn value(&self) -> Option<&CompiledPattern> {
        self.value.as_ref()
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Whether this is a `..` step rather than an entry match.
    pub fn is_parent(&self) -> bool {
        self.key.as_ref().is_some_and(CompiledPattern::is_parent)
    }

    /// Tests a single entry, returning key captures followed by value
    /// captures.
    pub fn match_entry<T: Tree>(&self, key: &Key, value: &T) -> Option<Vec<String>> {
        let mut captures = match &self.key {
            Some(pattern) => pattern.match_node(Subject::Key(key))?,
            None => Vec::new(),
        };
        if let Some(pattern) = &self.value {
            captures.extend(pattern.match_node(subject_of(value))?);
        }
        Some(captures)
    }

    /// Tests a value on its own, as a `..=value` step does.
    pub fn match_value<T: Tree>(&self, value: &T) -> Option<Vec<String>> {
        match &self.value {
            Some(pattern) => pattern.match_node(subject_of(value)),
            None => Some(Vec::new()),
        }
    }

    /// Every match below `data`, with paths relative to it.
    pub fn find_in<T: Tree>(&self, data: &T) -> Vec<Match> {
        self.find_in_each(data, |_, _, _| {})
    }

    /// Like [`find_in`](Self::find_in), also calling `visitor` with the
    /// node holding each matched key.
    pub fn find_in_each<'a, T, F>(&self, data: &'a T, mut visitor: F) -> Vec<Match>
    where
        T: Tree,
        F: FnMut(&'a T, &Key, &Match),
    {
        self.hits(data)
            .into_iter()
            .map(|hit| {
                let splats = hit
                    .splat
                    .map(|path| vec![Splat { segment: 0, path }])
                    .unwrap_or_default();
                let found = Match::new(hit.path, hit.captures, splats);
                visitor(hit.container, &hit.key, &found);
                found
            })
            .collect()
    }

    pub(crate) fn hits<'a, T: Tree>(&self, data: &'a T) -> Vec<Hit<'a, T>> {
        if self.recursive {
            self.search(data)
        } else {
            data.entries()
                .into_iter()
                .filter_map(|(key, value)| {
                    let captures = self.match_entry(&key, value)?;
                    Some(Hit {
                        container: data,
                        path: vec![key.clone()],
                        key,
                        value,
                        captures,
                        splat: None,
                    })
                })
                .collect()
        }
    }

    /// Depth-first pre-order search of the subtree below `data`.
    fn search<'a, T: Tree>(&self, data: &'a T) -> Vec<Hit<'a, T>> {
        let mut hits = Vec::new();
        let mut stack: Vec<(&'a T, Key, &'a T, Vec<Key>)> = data
            .entries()
            .into_iter()
            .rev()
            .map(|(key, value)| (data, key, value, Vec::new()))
            .collect();

        while let Some((container, key, value, descent)) = stack.pop() {
            let mut path = descent.clone();
            path.push(key.clone());

            if let Some(captures) = self.match_entry(&key, value) {
                // Without a key pattern the key itself was consumed by the
                // search.
                let splat = if self.key.is_none() { path.clone() } else { descent };
                hits.push(Hit {
                    container,
                    key: key.clone(),
                    value,
                    path: path.clone(),
                    captures,
                    splat: Some(splat),
                });
            }

            if value.is_composite() {
                for (child_key, child) in value.entries().into_iter().rev() {
                    stack.push((value, child_key, child, path.clone()));
                }
            }
        }
        hits
    }
}

fn compile_present(
    token: Option<RawToken>,
    flags: Option<RegexFlags>,
) -> Result<Option<CompiledPattern>, PathError> {
    match token {
        None => Ok(None),
        Some(RawToken::Text(text)) if text.is_empty() => Ok(None),
        Some(token) => compile(Some(&token), flags).map(Some),
    }
}

fn subject_of<T: Tree>(value: &T) -> Subject<'_> {
    match value.scalar() {
        Some(scalar) => Subject::Leaf(scalar),
        None => Subject::Composite,
    }
}
