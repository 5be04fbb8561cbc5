//! Builder for constructing notifying maps.

use crate::core::map::{NotifyMap, Value};
use crate::core::path::DEFAULT_SEPARATOR;
use crate::core::tree::Tree;
use crate::error::{MapError, Result};
use crate::notify::{Callback, CallbackSet, PatternDispatcher};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builder for constructing a [`NotifyMap`].
///
/// Register either one global callback with [`on_change`](Self::on_change)
/// or any number of qualified callbacks with
/// [`on_pattern`](Self::on_pattern); combining the two is an error. A
/// builder with no callbacks produces a map that never notifies.
///
/// # Examples
///
/// ```rust
/// use notifymap::prelude::*;
/// use notifymap::tree;
///
/// # fn example() -> Result<()> {
/// let mut d = NotifyMap::builder()
///     .on_pattern("*", |path, _value| println!("default {path}"))
///     .on_pattern("B/*", |path, _value| println!("subtree {path}"))
///     .build_from(tree! { "A" => 10, "B" => { "Ba" => 100 } })?;
///
/// d.insert("C", 9); // "default C"
/// d.get_map_mut("B").unwrap().insert("Bh", 8); // "subtree B/Bh"
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct NotifyMapBuilder<V> {
    single: Option<Callback<V>>,
    patterns: Vec<(String, Callback<V>)>,
    separator: char,
}

impl<V> NotifyMapBuilder<V> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            single: None,
            patterns: Vec::new(),
            separator: DEFAULT_SEPARATOR,
        }
    }

    /// Register a single callback applied to every change.
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&Value<V>>) + Send + Sync + 'static,
    {
        self.single = Some(Arc::new(callback));
        self
    }

    /// Register a qualified callback against a path pattern.
    ///
    /// Patterns are an exact path (`"B/Ba"`), a subtree wildcard (`"B/*"`),
    /// or the default fallback (`"*"`). Registering the same pattern twice
    /// keeps the later callback.
    pub fn on_pattern<F>(mut self, pattern: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, Option<&Value<V>>) + Send + Sync + 'static,
    {
        self.patterns.push((pattern.into(), Arc::new(callback)));
        self
    }

    /// Use a separator other than `/` for rendering and splitting paths.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Build an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPattern`] for a malformed pattern and
    /// [`MapError::CallbackConflict`] if both [`on_change`](Self::on_change)
    /// and [`on_pattern`](Self::on_pattern) were used.
    pub fn build(self) -> Result<NotifyMap<V>> {
        self.build_from(Tree::Map(BTreeMap::new()))
    }

    /// Build a map wrapping existing nested data. Construction never
    /// invokes callbacks.
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build), plus [`MapError::RootNotAMap`] if `tree`
    /// is a leaf.
    pub fn build_from(self, tree: impl Into<Tree<V>>) -> Result<NotifyMap<V>> {
        let Self {
            single,
            patterns,
            separator,
        } = self;

        let callbacks = match single {
            Some(_) if !patterns.is_empty() => return Err(MapError::CallbackConflict),
            Some(callback) => CallbackSet::Single(callback),
            None => CallbackSet::Patterns(PatternDispatcher::compile(patterns, separator)?),
        };

        let entries = tree.into().into_map().ok_or(MapError::RootNotAMap)?;
        Ok(NotifyMap::from_parts(callbacks, separator, entries))
    }
}

impl<V> Default for NotifyMapBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_conflicting_callbacks_rejected() {
        let result: Result<NotifyMap<i32>> = NotifyMap::builder()
            .on_change(|_p, _v| {})
            .on_pattern("*", |_p, _v| {})
            .build();
        assert!(matches!(result, Err(MapError::CallbackConflict)));
    }

    #[test]
    fn test_invalid_pattern_rejected_at_build() {
        let result: Result<NotifyMap<i32>> = NotifyMap::builder()
            .on_pattern("B/*/C", |_p, _v| {})
            .build();
        assert!(matches!(result, Err(MapError::InvalidPattern(_))));
    }

    #[test]
    fn test_no_callbacks_is_a_quiet_map() {
        let mut map: NotifyMap<i32> = NotifyMap::builder().build().unwrap();
        map.insert("A", 1);
        assert_eq!(map.get_leaf("A"), Some(&1));
    }

    #[test]
    fn test_custom_separator() {
        let paths = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&paths);

        let mut map = NotifyMap::builder()
            .on_change(move |path, _value| seen.lock().unwrap().push(path.to_string()))
            .with_separator('.')
            .build_from(tree! { "B" => { "Ba" => 100 } })
            .unwrap();

        map.get_map_mut("B").unwrap().insert("Ba", 101);
        map.set_path("B.Ba", 102).unwrap();

        assert_eq!(*paths.lock().unwrap(), ["B.Ba", "B.Ba"]);
    }

    #[test]
    fn test_single_callback_sees_every_path() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut map = NotifyMap::builder()
            .on_change(move |_path, _value| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build_from(tree! { "B" => { "Ba" => 100 } })
            .unwrap();

        map.insert("C", 9);
        map.get_map_mut("B").unwrap().insert("Bh", 8);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
