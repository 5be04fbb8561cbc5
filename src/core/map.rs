//! The mutation-observable nested map.

use crate::core::NotifyMapBuilder;
use crate::core::path::{DEFAULT_SEPARATOR, KeyPath};
use crate::core::tree::Tree;
use crate::error::{MapError, Result};
use crate::notify::CallbackSet;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Configuration shared by a root map and every sub-map wrapped under it.
pub(crate) struct Shared<V> {
    callbacks: CallbackSet<V>,
    separator: char,
    muted: AtomicBool,
}

impl<V> Shared<V> {
    pub(crate) fn new(callbacks: CallbackSet<V>, separator: char) -> Self {
        Self {
            callbacks,
            separator,
            muted: AtomicBool::new(false),
        }
    }

    fn notify(&self, path: &KeyPath, value: Option<&Value<V>>) {
        if self.muted.load(Ordering::Relaxed) {
            return;
        }
        let rendered = path.render(self.separator);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            path = %rendered,
            removed = value.is_none(),
            "dispatching change notification"
        );
        if let Some(callback) = self.callbacks.resolve(path, &rendered) {
            callback(&rendered, value);
        }
    }
}

/// Suppresses notifications while alive; used for stealth writes.
struct MuteGuard<'a>(&'a AtomicBool);

impl<'a> MuteGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Relaxed);
        Self(flag)
    }
}

impl Drop for MuteGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A stored value: either a terminal leaf or a wrapped sub-map.
pub enum Value<V> {
    /// A terminal value.
    Leaf(V),
    /// A nested map, wrapped so mutations through it notify with the full
    /// path from the root.
    Map(NotifyMap<V>),
}

impl<V> Value<V> {
    /// The terminal value, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Map(_) => None,
        }
    }

    /// The wrapped sub-map, if this is a map.
    pub fn as_map(&self) -> Option<&NotifyMap<V>> {
        match self {
            Self::Map(map) => Some(map),
            Self::Leaf(_) => None,
        }
    }

    /// Mutable access to the wrapped sub-map, if this is a map.
    pub fn as_map_mut(&mut self) -> Option<&mut NotifyMap<V>> {
        match self {
            Self::Map(map) => Some(map),
            Self::Leaf(_) => None,
        }
    }

    /// Whether this value is a wrapped sub-map.
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }
}

impl<V: Clone> Value<V> {
    /// Deep copy back to plain tree data.
    pub fn to_tree(&self) -> Tree<V> {
        match self {
            Self::Leaf(value) => Tree::Leaf(value.clone()),
            Self::Map(map) => map.to_tree(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Value<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => value.fmt(f),
            Self::Map(map) => map.fmt(f),
        }
    }
}

impl<V: PartialEq> PartialEq for Value<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// A nested map that dispatches a callback on every mutation.
///
/// Every map-valued entry reachable from the root is itself a `NotifyMap`
/// sharing the root's callback configuration, with a path extended by the
/// chain of keys leading to it. Assigning plain nested data re-establishes
/// this invariant by wrapping it on the spot, so mutations at any depth are
/// observable from the root.
///
/// Callbacks run synchronously, after the store has been committed: a
/// panicking callback propagates out of the mutating call, but the data is
/// already updated.
///
/// # Examples
///
/// ```rust
/// use notifymap::prelude::*;
/// use notifymap::tree;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// # fn example() -> Result<()> {
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
///
/// let mut d = NotifyMap::from_tree(
///     move |_path, _value| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     },
///     tree! { "A" => 10, "B" => { "Ba" => 100 } },
/// )?;
///
/// d.get_map_mut("B").unwrap().insert("Ba", 101);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct NotifyMap<V> {
    shared: Arc<Shared<V>>,
    path: KeyPath,
    data: BTreeMap<String, Value<V>>,
}

fn wrap_value<V>(shared: &Arc<Shared<V>>, path: KeyPath, tree: Tree<V>) -> Value<V> {
    match tree {
        Tree::Leaf(value) => Value::Leaf(value),
        Tree::Map(entries) => {
            let data = wrap_entries(shared, &path, entries);
            Value::Map(NotifyMap {
                shared: Arc::clone(shared),
                path,
                data,
            })
        }
    }
}

fn wrap_entries<V>(
    shared: &Arc<Shared<V>>,
    path: &KeyPath,
    entries: BTreeMap<String, Tree<V>>,
) -> BTreeMap<String, Value<V>> {
    entries
        .into_iter()
        .map(|(key, tree)| {
            let value = wrap_value(shared, path.child(&key), tree);
            (key, value)
        })
        .collect()
}

impl<V> NotifyMap<V> {
    /// Create an empty map with a single callback applied to every change.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str, Option<&Value<V>>) + Send + Sync + 'static,
    {
        Self::with_callbacks(CallbackSet::from_fn(callback))
    }

    /// Create an empty map from a prepared callback set.
    pub fn with_callbacks(callbacks: CallbackSet<V>) -> Self {
        Self {
            shared: Arc::new(Shared::new(callbacks, DEFAULT_SEPARATOR)),
            path: KeyPath::root(),
            data: BTreeMap::new(),
        }
    }

    /// Wrap existing nested data with a single callback.
    ///
    /// Every map value in `tree` is recursively converted to a `NotifyMap`
    /// with a path extended by its key. Construction never invokes the
    /// callback — it is initialization, not mutation.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::RootNotAMap`] if `tree` is a leaf.
    pub fn from_tree<F>(callback: F, tree: Tree<V>) -> Result<Self>
    where
        F: Fn(&str, Option<&Value<V>>) + Send + Sync + 'static,
    {
        let entries = tree.into_map().ok_or(MapError::RootNotAMap)?;
        Ok(Self::from_parts(
            CallbackSet::from_fn(callback),
            DEFAULT_SEPARATOR,
            entries,
        ))
    }

    /// Builder for pattern registries and custom separators.
    pub fn builder() -> NotifyMapBuilder<V> {
        NotifyMapBuilder::new()
    }

    pub(crate) fn from_parts(
        callbacks: CallbackSet<V>,
        separator: char,
        entries: BTreeMap<String, Tree<V>>,
    ) -> Self {
        let shared = Arc::new(Shared::new(callbacks, separator));
        let path = KeyPath::root();
        let data = wrap_entries(&shared, &path, entries);
        Self { shared, path, data }
    }

    /// Insert a value, wrapping it if it is a map, then notify.
    ///
    /// Exactly one notification fires per call — assigning a whole sub-tree
    /// notifies once for this key, not once per descendant. The callback
    /// receives the post-wrap stored value. Returns the previous value at
    /// the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tree<V>>) -> Option<Value<V>> {
        let key = key.into();
        let path = self.path.child(&key);
        let wrapped = wrap_value(&self.shared, path.clone(), value.into());
        let previous = self.data.insert(key.clone(), wrapped);
        if let Some(stored) = self.data.get(&key) {
            self.shared.notify(&path, Some(stored));
        }
        previous
    }

    /// Insert without firing a notification.
    pub fn insert_quiet(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Tree<V>>,
    ) -> Option<Value<V>> {
        let key = key.into();
        let path = self.path.child(&key);
        let wrapped = wrap_value(&self.shared, path, value.into());
        self.data.insert(key, wrapped)
    }

    /// Remove a key, notifying with `None` as the removal sentinel.
    ///
    /// Returns the removed value, or `None` if the key was absent (in which
    /// case nothing is notified).
    pub fn remove(&mut self, key: &str) -> Option<Value<V>> {
        let removed = self.data.remove(key)?;
        self.shared.notify(&self.path.child(key), None);
        Some(removed)
    }

    /// Look up a key. No notification.
    pub fn get(&self, key: &str) -> Option<&Value<V>> {
        self.data.get(key)
    }

    /// Mutable access to a stored value. No notification; mutating a leaf
    /// through this reference is not observed.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value<V>> {
        self.data.get_mut(key)
    }

    /// Look up a key, returning the leaf value if it is one.
    pub fn get_leaf(&self, key: &str) -> Option<&V> {
        self.get(key)?.as_leaf()
    }

    /// Look up a key, returning the wrapped sub-map if it is one.
    pub fn get_map(&self, key: &str) -> Option<&NotifyMap<V>> {
        self.get(key)?.as_map()
    }

    /// Mutable access to a wrapped sub-map; mutations through it notify
    /// with the full path from the root.
    pub fn get_map_mut(&mut self, key: &str) -> Option<&mut NotifyMap<V>> {
        self.data.get_mut(key)?.as_map_mut()
    }

    /// Whether the map contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of entries in this map (not counting nested entries).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this map has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the keys of this map.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Iterate over the entries of this map.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value<V>)> {
        self.data.iter()
    }

    /// The path from the conceptual root to this map. Empty for the root.
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// The rendered form of [`path`](Self::path).
    pub fn path_string(&self) -> String {
        self.path.render(self.shared.separator)
    }

    /// The separator used to render paths and split path arguments.
    pub fn separator(&self) -> char {
        self.shared.separator
    }

    /// Look up a value by multi-level path, e.g. `"B/Bb"`.
    pub fn get_path(&self, path: &str) -> Option<&Value<V>> {
        let parsed = KeyPath::parse(path, self.shared.separator);
        let (last, parents) = parsed.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get_map(segment)?;
        }
        current.get(last)
    }

    /// Assign a value at a multi-level path, e.g. `"B/Bb"`.
    ///
    /// Intermediate maps must already exist. Exactly one notification fires,
    /// carrying the full path.
    ///
    /// # Errors
    ///
    /// - [`MapError::EmptyPath`] if `path` has no segments
    /// - [`MapError::KeyNotFound`] if an intermediate key is missing
    /// - [`MapError::NotAMap`] if an intermediate segment is a leaf
    pub fn set_path(&mut self, path: &str, value: impl Into<Tree<V>>) -> Result<()> {
        let (parent, key) = self.parent_of_mut(path)?;
        parent.insert(key, value);
        Ok(())
    }

    /// Same as [`set_path`](Self::set_path), but suppresses notification.
    ///
    /// The suppression covers the whole write, at every depth.
    pub fn set_path_quiet(&mut self, path: &str, value: impl Into<Tree<V>>) -> Result<()> {
        let shared = Arc::clone(&self.shared);
        let _guard = MuteGuard::new(&shared.muted);
        self.set_path(path, value)
    }

    /// Navigate to the map holding the final segment of `path`.
    fn parent_of_mut(&mut self, path: &str) -> Result<(&mut NotifyMap<V>, String)> {
        let parsed = KeyPath::parse(path, self.shared.separator);
        let (last, parents) = parsed.segments().split_last().ok_or(MapError::EmptyPath)?;
        let mut current = self;
        for segment in parents {
            current = match current.data.get_mut(segment) {
                Some(Value::Map(map)) => map,
                Some(Value::Leaf(_)) => return Err(MapError::NotAMap(segment.clone())),
                None => return Err(MapError::KeyNotFound(segment.clone())),
            };
        }
        Ok((current, last.clone()))
    }
}

impl<V: Clone> NotifyMap<V> {
    /// Deep copy back to plain tree data.
    pub fn to_tree(&self) -> Tree<V> {
        Tree::Map(
            self.data
                .iter()
                .map(|(key, value)| (key.clone(), value.to_tree()))
                .collect(),
        )
    }
}

/// Bulk insertion; fires one notification per inserted key.
impl<V, K, T> Extend<(K, T)> for NotifyMap<V>
where
    K: Into<String>,
    T: Into<Tree<V>>,
{
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for NotifyMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for NotifyMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for NotifyMap<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for (key, value) in &self.data {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for Value<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(value) => value.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

#[cfg(feature = "serde")]
impl<V: serde::de::DeserializeOwned> NotifyMap<V> {
    /// Parse a JSON document into a wrapped map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] for malformed JSON and
    /// [`MapError::RootNotAMap`] if the document is not an object.
    pub fn from_json_str<F>(callback: F, json: &str) -> Result<Self>
    where
        F: Fn(&str, Option<&Value<V>>) + Send + Sync + 'static,
    {
        let tree: Tree<V> =
            serde_json::from_str(json).map_err(|e| MapError::Parse(e.to_string()))?;
        Self::from_tree(callback, tree)
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> NotifyMap<V> {
    /// Serialize the current contents as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] if a leaf value fails to serialize.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| MapError::Parse(e.to_string()))
    }
}
