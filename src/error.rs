//! Error types for notifymap.

/// Result type alias for notifymap operations.
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors that can occur when constructing or traversing a notifying map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A callback pattern is malformed. `*` may only appear as the lone
    /// final segment, and no segment may be empty.
    #[error("Invalid callback pattern '{0}': '*' may only appear as the final segment")]
    InvalidPattern(String),

    /// A single callback and a pattern registry were both configured.
    #[error("Conflicting callbacks: a single callback cannot be combined with a pattern registry")]
    CallbackConflict,

    /// An intermediate key on a multi-level path does not exist.
    #[error("Key not found while traversing path: {0}")]
    KeyNotFound(String),

    /// An intermediate segment on a multi-level path refers to a leaf value.
    #[error("Path segment '{0}' refers to a leaf value, not a nested map")]
    NotAMap(String),

    /// A multi-level path contained no segments.
    #[error("Path must contain at least one segment")]
    EmptyPath,

    /// The data handed to a root constructor was a leaf, not a map.
    #[error("Root of a notifying map must be a map, not a leaf value")]
    RootNotAMap,

    #[cfg(feature = "serde")]
    /// Failed to parse or serialize tree data.
    #[error("Failed to parse tree: {0}")]
    Parse(String),
}
