use crate::index::SnapshotIndex;
use crate::snapshot::Snapshot;

/// Carries the `watched` flag from `old` into `new`, matching jobs by name.
///
/// Jobs that did not exist in `old` (or when there is no `old` at all) end
/// up unwatched.
pub fn merge_watched(old: Option<&Snapshot>, new: &mut Snapshot) {
    let old_index = old.map(|snapshot| SnapshotIndex::build(&snapshot.jobs));

    for job in &mut new.jobs {
        job.watched = match (old, old_index.as_ref()) {
            (Some(old), Some(index)) => index
                .get(job.name.as_str())
                .map(|entry| old.jobs[entry.seq].watched)
                .unwrap_or(false),
            _ => false,
        };
    }
}

/// Result of a successful [`toggle_watch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchToggled {
    /// Position of the modified snapshot in the slice.
    pub snapshot: usize,
    pub watched: bool,
}

/// Sets or flips the `watched` flag of the first job named `job_name`.
///
/// `watch == None` flips the current value. Only the first match across all
/// snapshots is touched; returns `None` when no job has that name.
pub fn toggle_watch(
    snapshots: &mut [Snapshot],
    job_name: &str,
    watch: Option<bool>,
) -> Option<WatchToggled> {
    for (position, snapshot) in snapshots.iter_mut().enumerate() {
        if let Some(job) = snapshot.jobs.iter_mut().find(|job| job.name == job_name) {
            job.watched = watch.unwrap_or(!job.watched);
            return Some(WatchToggled {
                snapshot: position,
                watched: job.watched,
            });
        }
    }
    None
}
