//! Map variants built on the notification mechanism.

#[cfg(feature = "change-tracking")]
mod changed;

#[cfg(feature = "history")]
mod history;

#[cfg(feature = "change-tracking")]
pub use changed::ChangedMap;

#[cfg(feature = "history")]
pub use history::{ChangeRecord, HistoryMap};
