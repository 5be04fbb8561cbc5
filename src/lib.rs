//! # notifymap
//!
//! Mutation-observable nested maps with path-qualified change callbacks.
//!
//! ## Overview
//!
//! `notifymap` provides a nested map type that intercepts mutations — key
//! assignment and key deletion, at any depth — and dispatches a callback
//! describing what changed:
//! - Every nested map value is recursively wrapped, so mutations deep inside
//!   the structure are observable from the root
//! - Each change is reported with a `/`-joined path from the root to the
//!   mutated key (e.g. `"B/Ba"`)
//! - Callbacks can be registered globally, against an exact path, against a
//!   subtree wildcard (`"B/*"`), or as a default fallback (`"*"`)
//!
//! ## Quick Start
//!
//! ```rust
//! use notifymap::prelude::*;
//! use notifymap::tree;
//!
//! # fn example() -> Result<()> {
//! let source = tree! {
//!     "A" => 10,
//!     "B" => { "Ba" => 100, "Bb" => 200 },
//! };
//!
//! let mut d = NotifyMap::from_tree(|path, _value| println!("changed: {path}"), source)?;
//!
//! // Prints "changed: B/Ba"
//! d.get_map_mut("B").unwrap().insert("Ba", 101);
//!
//! assert_eq!(d.get_path("B/Ba").and_then(Value::as_leaf), Some(&101));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Qualified callbacks
//!
//! ```rust
//! use notifymap::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let mut d: NotifyMap<i32> = NotifyMap::builder()
//!     .on_pattern("*", |path, _value| println!("default {path}"))
//!     .on_pattern("B/*", |path, _value| println!("subtree {path}"))
//!     .build()?;
//!
//! d.insert("C", 9); // "default C"
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Recursive wrapping**: assigning a plain sub-tree wraps it on the spot,
//!   so nothing escapes observation
//! - **Single notification per mutation**: assigning a whole sub-tree fires
//!   one callback for that key, not one per descendant
//! - **Path operations**: `get_path`/`set_path` address multi-level keys in
//!   one call; `set_path_quiet` writes without notifying
//! - **Variants**: [`ChangedMap`](features::ChangedMap) tracks a dirty flag,
//!   [`HistoryMap`](features::HistoryMap) records a change log
//!
//! ## Feature Flags
//!
//! Enable optional features in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! notifymap = { version = "0.1", features = ["serde", "tracing"] }
//! ```
//!
//! `change-tracking` and `history` (the map variants) are on by default.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;

#[cfg(any(feature = "change-tracking", feature = "history"))]
pub mod features;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{NotifyMap, NotifyMapBuilder, Tree, Value};
    pub use crate::error::{MapError, Result};

    #[cfg(feature = "change-tracking")]
    pub use crate::features::ChangedMap;
    #[cfg(feature = "history")]
    pub use crate::features::HistoryMap;
}
