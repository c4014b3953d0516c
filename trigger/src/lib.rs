//! Filesystem trigger detection.
//!
//! The mosaic publisher touches a marker file after writing new imagery.
//! [`MarkerWatcher`] polls that marker's modification time and publishes a
//! [`events::TriggerEvent`] for each strict increase. The marker's content is
//! never read.

pub mod error;
pub mod watcher;

pub use watcher::{MarkerWatcher, TriggerState};
