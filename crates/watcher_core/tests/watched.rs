use watcher_core::{merge_watched, toggle_watch, Job, Snapshot, WatchToggled};

fn job(name: &str, watched: bool) -> Job {
    let mut job = Job::new(name, Some("blue"), format!("https://ci/job/{name}"));
    job.watched = watched;
    job
}

#[test]
fn watched_flag_survives_a_poll() {
    let old = Snapshot::new("https://ci", vec![job("A", true), job("B", false)]);
    let mut new = Snapshot::new(
        "https://ci",
        vec![
            Job::new("B", Some("red"), "https://ci/job/B"),
            Job::new("A", Some("red"), "https://ci/job/A"),
            Job::new("C", Some("blue"), "https://ci/job/C"),
        ],
    );

    merge_watched(Some(&old), &mut new);

    let flags: Vec<_> = new.jobs.iter().map(|j| (j.name.as_str(), j.watched)).collect();
    assert_eq!(flags, vec![("B", false), ("A", true), ("C", false)]);
}

#[test]
fn without_old_snapshot_every_job_is_unwatched() {
    let mut new = Snapshot::new("https://ci", vec![job("A", true), job("B", true)]);

    merge_watched(None, &mut new);

    assert!(new.jobs.iter().all(|j| !j.watched));
}

#[test]
fn duplicate_old_names_use_the_last_occurrence() {
    let old = Snapshot::new("https://ci", vec![job("A", false), job("A", true)]);
    let mut new = Snapshot::new("https://ci", vec![job("A", false)]);

    merge_watched(Some(&old), &mut new);

    assert!(new.jobs[0].watched);
}

#[test]
fn toggle_flips_or_sets_the_first_match() {
    let mut snapshots = vec![
        Snapshot::new("https://one", vec![job("A", false)]),
        Snapshot::new("https://two", vec![job("B", false), job("A", false)]),
    ];

    assert_eq!(
        toggle_watch(&mut snapshots, "A", None),
        Some(WatchToggled {
            snapshot: 0,
            watched: true
        })
    );
    assert!(snapshots[0].jobs[0].watched);
    assert!(!snapshots[1].jobs[1].watched);

    assert_eq!(
        toggle_watch(&mut snapshots, "B", Some(true)),
        Some(WatchToggled {
            snapshot: 1,
            watched: true
        })
    );
    assert_eq!(
        toggle_watch(&mut snapshots, "B", Some(true)).map(|t| t.watched),
        Some(true)
    );
    assert_eq!(
        toggle_watch(&mut snapshots, "A", Some(false)).map(|t| t.watched),
        Some(false)
    );
}

#[test]
fn toggle_unknown_job_changes_nothing() {
    let mut snapshots = vec![Snapshot::new("https://one", vec![job("A", false)])];
    let before = snapshots.clone();

    assert_eq!(toggle_watch(&mut snapshots, "missing", None), None);
    assert_eq!(snapshots, before);
}
