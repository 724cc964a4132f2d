use std::sync::Mutex;

use watcher_core::{Badge, BadgeColor, JobEvent, Snapshot};
use watcher_engine::{Indicator, Notifier};

/// Prints one line per job event.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, event: &JobEvent) {
        println!("{} | {} | {}", event.title(), event.body(), event.url());
    }
}

/// Prints the badge whenever it changes. States without a color keep the
/// last count color, like a browser badge does.
#[derive(Debug, Default)]
pub struct TerminalIndicator {
    last: Mutex<Option<(String, Option<BadgeColor>)>>,
}

impl Indicator for TerminalIndicator {
    fn show(&self, badge: &Badge) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        let color = badge
            .color()
            .or_else(|| last.as_ref().and_then(|(_, color)| *color));
        let next = (badge.text(), color);
        if last.as_ref() == Some(&next) {
            return;
        }
        match color {
            Some(color) => println!("[{}] ({})", next.0, color.hex()),
            None => println!("[{}]", next.0),
        }
        *last = Some(next);
    }
}

/// Prints the stored snapshots, or asks for a poll when there are none yet.
/// Returns whether a poll was requested.
pub fn show_or_request(snapshots: &[Snapshot], request_poll: impl FnOnce()) -> bool {
    if snapshots.is_empty() {
        println!("no data stored yet; polling now");
        request_poll();
        return true;
    }
    print_snapshots(snapshots);
    false
}

pub fn print_snapshots(snapshots: &[Snapshot]) {
    if snapshots.is_empty() {
        println!("no data stored yet");
        return;
    }
    for snapshot in snapshots {
        let captured = snapshot
            .timestamp
            .map(|ts| ts.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{} ({} jobs, captured {})", snapshot.source_url, snapshot.jobs.len(), captured);
        for job in &snapshot.jobs {
            let marker = if job.watched { '*' } else { ' ' };
            let building = if watcher_core::lookup(job.job_color()).building {
                " (building)"
            } else {
                ""
            };
            println!("  {marker} {:<40} {}{}", job.name, job.status(), building);
        }
    }
}
