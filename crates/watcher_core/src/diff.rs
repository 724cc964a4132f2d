use crate::catalog::lookup;
use crate::event::JobEvent;
use crate::index::{IndexedJob, SnapshotIndex};
use crate::snapshot::Snapshot;

/// Pure diff: computes the events that turn `old` into `new`.
///
/// Event order is fixed so callers and tests can compare whole lists:
/// removals and transitions of previously known jobs first, in `old`
/// order, then additions in `new` order. A first observation (`old ==
/// None`) produces nothing. A job that vanishes while another appears is
/// reported as one removal plus one addition, even when the URLs match.
pub fn diff(old: Option<&Snapshot>, new: &Snapshot) -> Vec<JobEvent> {
    let Some(old) = old else {
        return Vec::new();
    };

    let old_index = SnapshotIndex::build(&old.jobs);
    let new_index = SnapshotIndex::build(&new.jobs);
    let mut events = Vec::new();

    for (name, old_job) in old_index.in_sequence_order() {
        match new_index.get(name) {
            None => events.push(JobEvent::JobRemoved {
                name: name.to_string(),
                status: lookup(old_job.color).status,
                url: old_job.url.to_string(),
            }),
            Some(new_job) => events.extend(transition(name, &old_job, new_job)),
        }
    }

    for (name, new_job) in new_index.in_sequence_order() {
        if !old_index.contains(name) {
            events.push(JobEvent::JobAdded {
                name: name.to_string(),
                status: lookup(new_job.color).status,
                url: new_job.url.to_string(),
            });
        }
    }

    events
}

fn transition(name: &str, old_job: &IndexedJob<'_>, new_job: &IndexedJob<'_>) -> Option<JobEvent> {
    let old_info = lookup(old_job.color);
    let new_info = lookup(new_job.color);
    let name = name.to_string();
    let url = old_job.url.to_string();

    if new_info.building && !old_info.building {
        Some(JobEvent::JobBuildStarted {
            name,
            previous_status: old_info.status,
            url,
        })
    } else if !new_info.building && old_info.building {
        Some(JobEvent::JobBuildFinished {
            name,
            previous_status: old_info.status,
            new_status: new_info.status,
            url,
        })
    } else if new_info.status != old_info.status {
        Some(JobEvent::JobStatusChanged {
            name,
            previous_status: old_info.status,
            new_status: new_info.status,
            url,
        })
    } else {
        None
    }
}
