use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    error::PathError,
    lexer::parse_regex_opts,
    matcher::SegmentMatcher,
    parser::Parser,
    pattern::RegexFlags,
    tree::Tree,
    value::Key,
};

/// The sub-path a recursive segment descended through before matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splat {
    /// Position of the recursive matcher in its chain
    pub segment: usize,
    /// Keys consumed by the search, relative to where the segment started
    pub path: Vec<Key>,
}

/// One located element: its path from the root plus what the patterns
/// captured on the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Match {
    path: Vec<Key>,
    captures: Vec<String>,
    splats: Vec<Splat>,
}

impl Match {
    pub(crate) fn new(path: Vec<Key>, captures: Vec<String>, splats: Vec<Splat>) -> Self {
        Match {
            path,
            captures,
            splats,
        }
    }

    /// Keys and indices from the root to the matched element.
    pub fn path(&self) -> &[Key] {
        &self.path
    }

    /// The matched key.
    pub fn key(&self) -> Option<&Key> {
        self.path.last()
    }

    /// Regex captures of every segment, in chain order.
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// One entry per recursive segment, in chain order.
    pub fn splats(&self) -> &[Splat] {
        &self.splats
    }

    pub fn into_path(self) -> Vec<Key> {
        self.path
    }

    /// Looks the matched value up again from `root`.
    pub fn value_in<'a, T: Tree>(&self, root: &'a T) -> Option<&'a T> {
        root.resolve(&self.path)
    }

    fn extend(&self, path: &[Key], captures: Vec<String>, splat: Option<Splat>) -> Match {
        let mut next = self.clone();
        next.path.extend_from_slice(path);
        next.captures.extend(captures);
        next.splats.extend(splat);
        next
    }
}

impl PartialEq<[Key]> for Match {
    fn eq(&self, other: &[Key]) -> bool {
        self.path == other
    }
}

impl PartialEq<Vec<Key>> for Match {
    fn eq(&self, other: &Vec<Key>) -> bool {
        self.path == *other
    }
}

/// A node reached by the segments processed so far.
struct Candidate<'a, T> {
    container: &'a T,
    node: &'a T,
    found: Match,
}

/// A compiled path query.
///
/// Queries are immutable and can be reused across documents and threads.
///
/// # Examples
///
/// ```
/// use treepath::{Key, Query};
/// use serde_json::json;
///
/// let doc = json!({"users": [{"name": "ann"}, {"name": "bob"}]});
/// let query = Query::new("users/*/name=b*").unwrap();
///
/// let matches = query.find(&doc);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].path(), [Key::from("users"), Key::Index(1), Key::from("name")]);
/// assert_eq!(matches[0].captures(), ["ob"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    matchers: Vec<SegmentMatcher>,
}

impl Query {
    /// Compiles a query string, honouring a trailing `//imx` flag suffix.
    pub fn new(path: &str) -> Result<Self, PathError> {
        Self::with_flags(path, None)
    }

    /// Compiles a query string with base regex flags, merged with any
    /// `//imx` suffix.
    pub fn with_flags(path: &str, flags: Option<RegexFlags>) -> Result<Self, PathError> {
        let (flags, path) = parse_regex_opts(path, flags);
        let matchers = Parser::parse(&path, flags)?;
        debug!(query = %path, segments = matchers.len(), ?flags, "compiled query");
        Ok(Query { matchers })
    }

    /// Uses an explicit matcher chain.
    pub fn from_matchers(matchers: Vec<SegmentMatcher>) -> Self {
        Query { matchers }
    }

    pub fn matchers(&self) -> &[SegmentMatcher] {
        &self.matchers
    }

    /// Every match in `data`.
    pub fn find<T: Tree>(&self, data: &T) -> Vec<Match> {
        self.find_each(data, |_, _, _| {})
    }

    /// Every match in `data`, also handed to `visitor` as
    /// `(container, key, match)` where `container` holds the matched key.
    pub fn find_each<'a, T, F>(&self, data: &'a T, mut visitor: F) -> Vec<Match>
    where
        T: Tree,
        F: FnMut(&'a T, &Key, &Match),
    {
        if self.matchers.is_empty() {
            return Vec::new();
        }

        let mut candidates = vec![Candidate {
            container: data,
            node: data,
            found: Match::default(),
        }];

        for (index, matcher) in self.matchers.iter().enumerate() {
            candidates = if matcher.is_parent() {
                step_to_parents(data, index, matcher, candidates)
            } else {
                step_into(index, matcher, candidates)
            };
            if candidates.is_empty() {
                break;
            }
        }

        let mut matches = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            // Only a located key is a match; the root itself is not.
            let Some(key) = candidate.found.key() else {
                continue;
            };
            trace!(path = ?candidate.found.path(), "match");
            visitor(candidate.container, key, &candidate.found);
            matches.push(candidate.found);
        }
        matches
    }
}

fn step_into<'a, T: Tree>(
    index: usize,
    matcher: &SegmentMatcher,
    candidates: Vec<Candidate<'a, T>>,
) -> Vec<Candidate<'a, T>> {
    let mut next = Vec::new();
    for candidate in candidates {
        for hit in matcher.hits(candidate.node) {
            let splat = hit.splat.map(|path| Splat {
                segment: index,
                path,
            });
            next.push(Candidate {
                container: hit.container,
                node: hit.value,
                found: candidate.found.extend(&hit.path, hit.captures, splat),
            });
        }
    }
    next
}

/// Moves every candidate to its parent, re-resolved from the root.
///
/// Siblings share a parent; only the first candidate to reach it is kept.
fn step_to_parents<'a, T: Tree>(
    root: &'a T,
    index: usize,
    matcher: &SegmentMatcher,
    candidates: Vec<Candidate<'a, T>>,
) -> Vec<Candidate<'a, T>> {
    let mut seen: HashSet<Vec<Key>> = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let (_, parent_path) = candidate.found.path.split_last()?;
            if seen.contains(parent_path) {
                return None;
            }
            let node = root.resolve(parent_path)?;
            let container = match parent_path.split_last() {
                Some((_, above)) => root.resolve(above)?,
                None => root,
            };
            let captures = matcher.match_value(node)?;
            let depth = parent_path.len();
            seen.insert(parent_path.to_vec());

            let mut found = candidate.found;
            found.path.truncate(depth);
            found.captures.extend(captures);
            if matcher.is_recursive() {
                found.splats.push(Splat {
                    segment: index,
                    path: Vec::new(),
                });
            }
            Some(Candidate {
                container,
                node,
                found,
            })
        })
        .collect()
}

/// Compiles `path` and returns every match in `data`.
///
/// ```
/// use treepath::Key;
/// use serde_json::json;
///
/// let doc = json!({"a": {"findme": 1}, "findme": 2});
/// let matches = treepath::find("**/findme", &doc).unwrap();
/// assert_eq!(matches.len(), 2);
/// assert_eq!(matches[0].path(), [Key::from("a"), Key::from("findme")]);
/// ```
pub fn find<T: Tree>(path: &str, data: &T) -> Result<Vec<Match>, PathError> {
    Ok(Query::new(path)?.find(data))
}

/// Compiles `path`, hands every match in `data` to `visitor`, and returns
/// them all.
pub fn find_each<'a, T, F>(path: &str, data: &'a T, visitor: F) -> Result<Vec<Match>, PathError>
where
    T: Tree,
    F: FnMut(&'a T, &Key, &Match),
{
    Ok(Query::new(path)?.find_each(data, visitor))
}
