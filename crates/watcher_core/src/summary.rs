use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Normal,
    Alert,
}

impl BadgeColor {
    pub fn hex(self) -> &'static str {
        match self {
            BadgeColor::Normal => "#5cb85c",
            BadgeColor::Alert => "#d9534f",
        }
    }
}

/// State of the single summary indicator shared by all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    Loading,
    /// No source is configured; nothing was fetched.
    NoConfig,
    /// Every configured source failed to respond.
    FetchFailed,
    Count { total: usize, color: BadgeColor },
}

impl Badge {
    pub fn text(&self) -> String {
        match self {
            Badge::Loading => "Loading...".to_string(),
            Badge::NoConfig => "no".to_string(),
            Badge::FetchFailed => "fail".to_string(),
            Badge::Count { total, .. } => total.to_string(),
        }
    }

    /// Only counts carry a color; other states keep whatever was shown before.
    pub fn color(&self) -> Option<BadgeColor> {
        match self {
            Badge::Count { color, .. } => Some(*color),
            _ => None,
        }
    }
}

/// Aggregates the snapshots that arrived in one cycle into a badge.
pub fn summarize<'a>(snapshots: impl IntoIterator<Item = &'a Snapshot>) -> Badge {
    let mut received = 0usize;
    let mut total = 0usize;
    let mut failing = false;

    for snapshot in snapshots {
        received += 1;
        total += snapshot.jobs.len();
        failing |= snapshot.has_failing_job();
    }

    if received == 0 {
        return Badge::FetchFailed;
    }

    let color = if failing {
        BadgeColor::Alert
    } else {
        BadgeColor::Normal
    };
    Badge::Count { total, color }
}
