//! Watcher core: status catalog, snapshot diffing and summary helpers.
//!
//! Everything in this crate is synchronous and free of IO.
mod catalog;
mod diff;
mod event;
mod index;
mod snapshot;
mod summary;
mod watched;

pub use catalog::{lookup, JobColor, Status, StatusInfo};
pub use diff::diff;
pub use event::JobEvent;
pub use index::{IndexedJob, SnapshotIndex};
pub use snapshot::{source_key, Job, Snapshot};
pub use summary::{summarize, Badge, BadgeColor};
pub use watched::{merge_watched, toggle_watch, WatchToggled};
