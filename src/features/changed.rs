//! Change-flag tracking over a notifying map.

use crate::core::{NotifyMap, Tree};
use crate::error::Result;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A nested map that remembers whether anything changed since the last
/// [`reset`](Self::reset).
///
/// The flag starts clear: wrapping existing data is initialization, not
/// mutation. Any insert or removal at any depth sets it.
///
/// # Examples
///
/// ```rust
/// use notifymap::features::ChangedMap;
/// use notifymap::tree;
///
/// # fn example() -> notifymap::error::Result<()> {
/// let mut d = ChangedMap::from_tree(tree! { "A" => 10, "B" => 20 })?;
/// assert!(!d.changed());
///
/// d.insert("A", 20);
/// assert!(d.changed());
///
/// d.reset();
/// assert!(!d.changed());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ChangedMap<V> {
    map: NotifyMap<V>,
    changed: Arc<AtomicBool>,
}

impl<V> ChangedMap<V> {
    /// Create an empty change-tracked map.
    pub fn new() -> Self {
        let changed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&changed);
        let map = NotifyMap::new(move |_path, _value| {
            flag.store(true, Ordering::Relaxed);
        });
        Self { map, changed }
    }

    /// Wrap existing nested data. The flag starts clear.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::RootNotAMap`](crate::error::MapError::RootNotAMap)
    /// if `tree` is a leaf.
    pub fn from_tree(tree: Tree<V>) -> Result<Self> {
        let changed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&changed);
        let map = NotifyMap::from_tree(
            move |_path, _value| {
                flag.store(true, Ordering::Relaxed);
            },
            tree,
        )?;
        Ok(Self { map, changed })
    }

    /// Whether any mutation happened since construction or the last reset.
    pub fn changed(&self) -> bool {
        self.changed.load(Ordering::Relaxed)
    }

    /// Clear the change flag.
    pub fn reset(&self) {
        self.changed.store(false, Ordering::Relaxed);
    }
}

impl<V> Deref for ChangedMap<V> {
    type Target = NotifyMap<V>;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl<V> DerefMut for ChangedMap<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.map
    }
}

impl<V> Default for ChangedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    #[test]
    fn test_flag_clear_after_construction() {
        let d = ChangedMap::from_tree(tree! { "A" => 10, "B" => 20 }).unwrap();
        assert!(!d.changed());
    }

    #[test]
    fn test_flag_set_on_insert() {
        let mut d = ChangedMap::from_tree(tree! { "A" => 10 }).unwrap();
        d.insert("A", 20);
        assert!(d.changed());
    }

    #[test]
    fn test_flag_set_on_nested_mutation() {
        let mut d = ChangedMap::from_tree(tree! { "B" => { "Ba" => 100 } }).unwrap();
        d.get_map_mut("B").unwrap().insert("Ba", 101);
        assert!(d.changed());
    }

    #[test]
    fn test_flag_set_on_removal() {
        let mut d = ChangedMap::from_tree(tree! { "A" => 10 }).unwrap();
        d.remove("A");
        assert!(d.changed());
    }

    #[test]
    fn test_reset_clears_flag() {
        let mut d = ChangedMap::new();
        d.insert("A", 1);
        assert!(d.changed());
        d.reset();
        assert!(!d.changed());
    }
}
