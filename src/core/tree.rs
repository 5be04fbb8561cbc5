//! Plain nested data: the unwrapped counterpart of a notifying map.

use std::collections::BTreeMap;

/// A plain nested tree of values.
///
/// `Tree` is what a notifying map accepts as input (at construction and on
/// assignment) and what it produces as a snapshot via
/// [`NotifyMap::to_tree`](crate::core::NotifyMap::to_tree). Any `Map` variant
/// assigned into a notifying map is recursively wrapped before being stored.
///
/// The [`tree!`](crate::tree) macro builds literals:
///
/// ```rust
/// use notifymap::tree;
///
/// let t = tree! {
///     "A" => 10,
///     "B" => { "Ba" => 100 },
/// };
/// assert!(t.is_map());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Tree<V> {
    /// A nested map of keys to further trees.
    Map(BTreeMap<String, Tree<V>>),
    /// A terminal value.
    Leaf(V),
}

impl<V> Tree<V> {
    /// A terminal value.
    pub fn leaf(value: V) -> Self {
        Self::Leaf(value)
    }

    /// A map built from key/tree pairs.
    pub fn map<K, T, I>(entries: I) -> Self
    where
        K: Into<String>,
        T: Into<Tree<V>>,
        I: IntoIterator<Item = (K, T)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, tree)| (key.into(), tree.into()))
                .collect(),
        )
    }

    /// An empty map.
    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Whether this tree is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// The map entries, if this tree is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Tree<V>>> {
        match self {
            Self::Map(entries) => Some(entries),
            Self::Leaf(_) => None,
        }
    }

    /// Consume the tree and return the map entries, if it is a map.
    pub fn into_map(self) -> Option<BTreeMap<String, Tree<V>>> {
        match self {
            Self::Map(entries) => Some(entries),
            Self::Leaf(_) => None,
        }
    }

    /// The terminal value, if this tree is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Map(_) => None,
        }
    }

    /// Look up a nested tree by segment chain.
    pub fn get<'a, I>(&self, segments: I) -> Option<&Tree<V>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }
}

impl<V> From<V> for Tree<V> {
    fn from(value: V) -> Self {
        Self::Leaf(value)
    }
}

impl<V> FromIterator<(String, Tree<V>)> for Tree<V> {
    fn from_iter<I: IntoIterator<Item = (String, Tree<V>)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}

/// Build a [`Tree`] literal.
///
/// Keys are any expression convertible to `String`; values are either leaf
/// expressions or nested `{ ... }` blocks.
///
/// ```rust
/// use notifymap::tree;
///
/// let t = tree! {
///     "A" => 10,
///     "B" => { "Ba" => 100, "Bb" => 200 },
/// };
/// assert_eq!(t.get(["B", "Ba"]).and_then(|t| t.as_leaf()), Some(&100));
/// ```
#[macro_export]
macro_rules! tree {
    (@value { $($inner:tt)* }) => {
        $crate::tree!($($inner)*)
    };
    (@value $value:expr) => {
        $crate::core::Tree::from($value)
    };
    ($($key:expr => $value:tt),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut entries = ::std::collections::BTreeMap::new();
        $(
            entries.insert(::std::string::String::from($key), $crate::tree!(@value $value));
        )*
        $crate::core::Tree::Map(entries)
    }};
}
