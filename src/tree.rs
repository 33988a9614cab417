//! The enumeration interface the matcher walks documents through.
//!
//! Any document representation that can list its entries and expose its
//! leaves can be queried; [`Value`] and `serde_json::Value` are supported out
//! of the box.

use crate::value::{Key, Scalar, Value};

/// A queryable document node.
pub trait Tree {
    /// Every `(key, child)` entry of this node.
    ///
    /// Mappings yield their entries in insertion order; sequences yield
    /// theirs from the highest index down to `0`. Leaves yield nothing.
    /// Match order depends on this ordering.
    fn entries(&self) -> Vec<(Key, &Self)>;

    /// Leaf view, or `None` for mappings and sequences.
    fn scalar(&self) -> Option<Scalar<'_>>;

    fn is_composite(&self) -> bool {
        self.scalar().is_none()
    }

    /// Looks up a single child.
    fn child(&self, key: &Key) -> Option<&Self> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child)
    }

    /// Follows `path` down from this node.
    fn resolve(&self, path: &[Key]) -> Option<&Self> {
        path.iter().try_fold(self, |node, key| node.child(key))
    }
}

impl Tree for Value {
    fn entries(&self) -> Vec<(Key, &Self)> {
        match self {
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| (Key::Name(k.clone()), v))
                .collect(),
            Value::Array(arr) => arr
                .iter()
                .enumerate()
                .rev()
                .map(|(i, v)| (Key::Index(i), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        self.as_scalar()
    }

    fn child(&self, key: &Key) -> Option<&Self> {
        match (self, key) {
            (Value::Object(obj), Key::Name(name)) => obj.get(name),
            (Value::Array(arr), Key::Index(i)) => arr.get(*i),
            _ => None,
        }
    }
}

impl Tree for serde_json::Value {
    fn entries(&self) -> Vec<(Key, &Self)> {
        match self {
            serde_json::Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| (Key::Name(k.clone()), v))
                .collect(),
            serde_json::Value::Array(arr) => arr
                .iter()
                .enumerate()
                .rev()
                .map(|(i, v)| (Key::Index(i), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        match self {
            serde_json::Value::Null => Some(Scalar::Null),
            serde_json::Value::Bool(b) => Some(Scalar::Boolean(*b)),
            serde_json::Value::Number(n) => Some(match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Scalar::Integer(i),
                (None, Some(u)) => Scalar::Unsigned(u),
                (None, None) => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            serde_json::Value::String(s) => Some(Scalar::String(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    fn child(&self, key: &Key) -> Option<&Self> {
        match (self, key) {
            (serde_json::Value::Object(obj), Key::Name(name)) => obj.get(name),
            (serde_json::Value::Array(arr), Key::Index(i)) => arr.get(*i),
            _ => None,
        }
    }
}
