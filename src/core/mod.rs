//! Core container types.

mod builder;
mod map;
mod path;
mod tree;

pub use builder::NotifyMapBuilder;
pub use map::{NotifyMap, Value};
pub use path::{DEFAULT_SEPARATOR, KeyPath};
pub use tree::Tree;
