use watcher_core::{diff, merge_watched, Job, JobEvent, Snapshot};

const COLORS: &[Option<&str>] = &[
    Some("blue"),
    Some("blue_anime"),
    Some("red"),
    Some("red_anime"),
    Some("yellow"),
    Some("grey_anime"),
    Some("disabled"),
    Some("aborted"),
    Some("notbuilt"),
    None,
];

fn jobs_with_prefix(prefix: &str, count: usize, offset: usize) -> Vec<Job> {
    (0..count)
        .map(|i| {
            Job::new(
                format!("{prefix}-{i}"),
                COLORS[(i + offset) % COLORS.len()],
                format!("https://ci.example.com/job/{prefix}-{i}/"),
            )
        })
        .collect()
}

fn sample_snapshots() -> Vec<Snapshot> {
    vec![
        Snapshot::new("https://ci.example.com", Vec::new()),
        Snapshot::new("https://ci.example.com", jobs_with_prefix("job", 1, 0)),
        Snapshot::new("https://ci.example.com", jobs_with_prefix("job", COLORS.len(), 3)),
        Snapshot::new("https://ci.example.com", jobs_with_prefix("job", 25, 7)),
    ]
}

#[test]
fn first_observation_emits_nothing() {
    for snapshot in sample_snapshots() {
        assert!(diff(None, &snapshot).is_empty());
    }
}

#[test]
fn identical_snapshots_emit_nothing() {
    for snapshot in sample_snapshots() {
        assert!(diff(Some(&snapshot), &snapshot.clone()).is_empty());
    }
}

#[test]
fn disjoint_snapshots_only_remove_and_add() {
    let old = Snapshot::new("https://ci.example.com", jobs_with_prefix("old", 6, 0));
    let new = Snapshot::new("https://ci.example.com", jobs_with_prefix("new", 4, 2));

    let events = diff(Some(&old), &new);
    let removed = events
        .iter()
        .filter(|e| matches!(e, JobEvent::JobRemoved { .. }))
        .count();
    let added = events
        .iter()
        .filter(|e| matches!(e, JobEvent::JobAdded { .. }))
        .count();

    assert_eq!(removed, 6);
    assert_eq!(added, 4);
    assert_eq!(events.len(), removed + added);
}

#[test]
fn at_most_one_event_per_job() {
    for offset in 0..COLORS.len() {
        let old = Snapshot::new("https://ci.example.com", jobs_with_prefix("job", COLORS.len(), 0));
        let new = Snapshot::new("https://ci.example.com", jobs_with_prefix("job", COLORS.len(), offset));

        let events = diff(Some(&old), &new);
        let mut names: Vec<_> = events.iter().map(JobEvent::name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before, "offset {offset} produced duplicate events");
    }
}

#[test]
fn watched_flags_never_change_the_events() {
    let old = Snapshot::new("https://ci.example.com", jobs_with_prefix("job", 10, 0));
    let new = Snapshot::new("https://ci.example.com", jobs_with_prefix("job", 12, 4));
    let baseline = diff(Some(&old), &new);

    let mut watched_old = old.clone();
    for job in watched_old.jobs.iter_mut().step_by(2) {
        job.watched = true;
    }
    let mut merged_new = new.clone();
    merge_watched(Some(&watched_old), &mut merged_new);

    assert!(merged_new.jobs.iter().any(|job| job.watched));
    assert_eq!(diff(Some(&watched_old), &merged_new), baseline);
}
