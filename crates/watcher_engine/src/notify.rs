use watcher_core::{Badge, JobEvent};

/// Receives job events in the order the diff produced them.
///
/// Delivery is fire-and-forget; implementations must not block the poll.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &JobEvent);
}

/// The single summary indicator shared by all sources.
pub trait Indicator: Send + Sync {
    fn show(&self, badge: &Badge);
}

/// Indicator for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn show(&self, _badge: &Badge) {}
}
