use std::fmt;
use std::time::Duration;

use watcher_core::{Badge, JobEvent, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidPayload,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidPayload => write!(f, "invalid jobs payload"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no CI source configured")]
    NoSources,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings read at the start of every poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub sources: Vec<String>,
    pub refresh_interval: Duration,
}

impl PollConfig {
    pub fn new(sources: Vec<String>, refresh_interval: Duration) -> Self {
        Self {
            sources,
            refresh_interval,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.iter().all(|source| source.trim().is_empty()) {
            return Err(ConfigError::NoSources);
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::Invalid("refresh interval must be positive".into()));
        }
        Ok(())
    }
}

/// Broadcast to every subscriber of an orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    Loading { cycle: u64 },
    NotConfigured(ConfigError),
    SourceFailed { source: String, error: FetchError },
    /// Snapshots of every source that answered in this cycle.
    Data(Vec<Snapshot>),
    WatchToggled { job_name: String, watched: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub snapshot: Snapshot,
    pub events: Vec<JobEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub source: String,
    pub result: Result<SourceReport, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub badge: Badge,
    pub outcomes: Vec<SourceOutcome>,
}

impl CycleReport {
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .map(|report| &report.snapshot)
    }

    pub fn events(&self) -> impl Iterator<Item = &JobEvent> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .flat_map(|report| report.events.iter())
    }
}
