//! Path representation for nested keys.

/// Default separator used to render and parse paths.
pub const DEFAULT_SEPARATOR: char = '/';

/// An ordered chain of key segments identifying a location in a nested map.
///
/// The root is the empty chain. A path is rendered for callbacks by joining
/// its segments with the map's separator, in root-to-leaf order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path, identifying the root map.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from pre-split segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split a rendered path back into segments. Empty segments (leading,
    /// trailing, or doubled separators) are dropped, so an empty or
    /// separator-only input parses to the root.
    pub fn parse(raw: &str, separator: char) -> Self {
        Self {
            segments: raw
                .split(separator)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The key segments, in root-to-leaf order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root (empty) path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// A new path extended by one key.
    pub fn child(&self, key: &str) -> KeyPath {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(key.to_string());
        Self { segments }
    }

    /// Join the segments with `separator` into the string form delivered to
    /// callbacks.
    pub fn render(&self, separator: char) -> String {
        let mut rendered = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                rendered.push(separator);
            }
            rendered.push_str(segment);
        }
        rendered
    }
}
