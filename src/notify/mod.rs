//! Change-notification dispatch.

mod dispatch;

pub use dispatch::{Callback, CallbackSet, PatternDispatcher};
