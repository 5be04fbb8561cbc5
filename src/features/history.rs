//! Change-history recording over a notifying map.

use crate::core::{NotifyMap, Tree, Value};
use crate::error::Result;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A single recorded change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord<V> {
    /// Rendered path of the mutated entry.
    pub path: String,
    /// Snapshot of the stored value, or `None` for a removal.
    pub value: Option<Tree<V>>,
}

/// A nested map that records every change it observes.
///
/// Each mutation appends a [`ChangeRecord`] holding the rendered path and a
/// deep snapshot of the stored value (`None` for removals), in mutation
/// order.
///
/// # Examples
///
/// ```rust
/// use notifymap::features::HistoryMap;
/// use notifymap::core::Tree;
///
/// let mut d = HistoryMap::new();
/// assert!(d.history().is_empty());
///
/// d.insert("C", 30);
/// d.insert("D", 40);
///
/// let history = d.history();
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[0].path, "C");
/// assert_eq!(history[0].value, Some(Tree::leaf(30)));
///
/// d.clear_history();
/// assert!(d.history().is_empty());
/// ```
pub struct HistoryMap<V> {
    map: NotifyMap<V>,
    log: Arc<Mutex<Vec<ChangeRecord<V>>>>,
}

impl<V: Clone + Send + 'static> HistoryMap<V> {
    /// Create an empty history-tracked map.
    pub fn new() -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));
        let map = NotifyMap::new(Self::recorder(&log));
        Self { map, log }
    }

    /// Wrap existing nested data. The history starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::RootNotAMap`](crate::error::MapError::RootNotAMap)
    /// if `tree` is a leaf.
    pub fn from_tree(tree: Tree<V>) -> Result<Self> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let map = NotifyMap::from_tree(Self::recorder(&log), tree)?;
        Ok(Self { map, log })
    }

    fn recorder(
        log: &Arc<Mutex<Vec<ChangeRecord<V>>>>,
    ) -> impl Fn(&str, Option<&Value<V>>) + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |path, value| {
            log.lock().push(ChangeRecord {
                path: path.to_string(),
                value: value.map(Value::to_tree),
            });
        }
    }

    /// The recorded changes, oldest first.
    pub fn history(&self) -> Vec<ChangeRecord<V>> {
        self.log.lock().clone()
    }

    /// Number of recorded changes.
    pub fn history_len(&self) -> usize {
        self.log.lock().len()
    }

    /// Discard the recorded changes.
    pub fn clear_history(&self) {
        self.log.lock().clear();
    }
}

impl<V> Deref for HistoryMap<V> {
    type Target = NotifyMap<V>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<V> DerefMut for HistoryMap<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.map
    }
}

impl<V: Clone + Send + 'static> Default for HistoryMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
