//! Callback types and pattern-based dispatch.
//!
//! Pattern registries are compiled once at construction into a
//! [`PatternDispatcher`], so no string matching logic lives at mutation
//! sites.

use crate::core::{KeyPath, Value};
use crate::error::{MapError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A change callback.
///
/// Invoked with the rendered path of the mutated entry and the stored value.
/// For assignments the value is `Some` of the post-wrap stored form (a
/// wrapped sub-map for map values, the literal value for leaves). `None`
/// signals that the entry at the path was removed.
pub type Callback<V> = Arc<dyn Fn(&str, Option<&Value<V>>) + Send + Sync>;

/// The callback configuration shared by a root map and all of its sub-maps.
///
/// The mechanism never mutates this after construction; it is read-only for
/// the lifetime of the map.
pub enum CallbackSet<V> {
    /// A single callback applied to every change, regardless of path.
    Single(Callback<V>),
    /// A compiled pattern registry resolving each path to at most one
    /// callback.
    Patterns(PatternDispatcher<V>),
}

impl<V> CallbackSet<V> {
    /// Wrap a plain function as a single-callback set.
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn(&str, Option<&Value<V>>) + Send + Sync + 'static,
    {
        Self::Single(Arc::new(callback))
    }

    /// Resolve the callback applicable to `path`, if any.
    pub(crate) fn resolve(&self, path: &KeyPath, rendered: &str) -> Option<&Callback<V>> {
        match self {
            Self::Single(callback) => Some(callback),
            Self::Patterns(dispatcher) => dispatcher.resolve(path, rendered),
        }
    }
}

/// A compiled registry of path patterns with deterministic precedence.
///
/// Resolution order for a given path:
/// 1. a pattern equal to the full rendered path (exact match);
/// 2. the deepest `"<prefix>/*"` pattern whose prefix segments lead the
///    path — `"B/*"` matches `"B/Ba"` and anything nested under `B`, but
///    not `"B"` itself;
/// 3. the `"*"` fallback, if registered.
///
/// A path matching none of the above resolves to no callback, and the
/// triggering mutation proceeds silently.
pub struct PatternDispatcher<V> {
    exact: HashMap<String, Callback<V>>,
    /// Prefix patterns as pre-split segments, deepest first.
    prefixes: Vec<(Vec<String>, Callback<V>)>,
    default: Option<Callback<V>>,
}

impl<V> PatternDispatcher<V> {
    /// Compile `(pattern, callback)` pairs into a dispatcher.
    ///
    /// Later registrations of the same pattern override earlier ones. A
    /// pattern containing `*` anywhere other than as the lone final segment,
    /// or containing an empty segment, is rejected with
    /// [`MapError::InvalidPattern`].
    pub fn compile(patterns: Vec<(String, Callback<V>)>, separator: char) -> Result<Self> {
        let mut exact = HashMap::new();
        let mut prefixes: Vec<(Vec<String>, Callback<V>)> = Vec::new();
        let mut default = None;

        for (pattern, callback) in patterns {
            let segments: Vec<&str> = pattern.split(separator).collect();
            if segments.iter().any(|segment| segment.is_empty()) {
                return Err(MapError::InvalidPattern(pattern));
            }
            let last = segments.len() - 1;
            let wildcard_tail = segments[last] == "*";
            let misplaced_star = segments
                .iter()
                .enumerate()
                .any(|(i, segment)| segment.contains('*') && !(wildcard_tail && i == last));
            if misplaced_star {
                return Err(MapError::InvalidPattern(pattern));
            }

            if segments == ["*"] {
                default = Some(callback);
            } else if wildcard_tail {
                let prefix: Vec<String> =
                    segments[..last].iter().map(|s| s.to_string()).collect();
                if let Some(existing) = prefixes.iter_mut().find(|(p, _)| *p == prefix) {
                    existing.1 = callback;
                } else {
                    prefixes.push((prefix, callback));
                }
            } else {
                exact.insert(pattern, callback);
            }
        }

        // Deepest prefix first, so the first match during resolution wins.
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(Self {
            exact,
            prefixes,
            default,
        })
    }

    fn resolve(&self, path: &KeyPath, rendered: &str) -> Option<&Callback<V>> {
        if let Some(callback) = self.exact.get(rendered) {
            return Some(callback);
        }
        let segments = path.segments();
        for (prefix, callback) in &self.prefixes {
            let leads = segments.len() > prefix.len()
                && segments[..prefix.len()]
                    .iter()
                    .zip(prefix.iter())
                    .all(|(a, b)| a == b);
            if leads {
                return Some(callback);
            }
        }
        self.default.as_ref()
    }
}
