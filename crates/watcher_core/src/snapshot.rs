use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{lookup, JobColor, Status};

/// One job as reported by a CI source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    /// Raw status code; folders and views report none.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub url: String,
    /// User annotation, carried between polls by job name.
    #[serde(default)]
    pub watched: bool,
}

impl Job {
    pub fn new(name: impl Into<String>, color: Option<&str>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.map(ToOwned::to_owned),
            url: url.into(),
            watched: false,
        }
    }

    pub fn job_color(&self) -> JobColor {
        JobColor::from_code(self.color.as_deref())
    }

    pub fn status(&self) -> Status {
        lookup(self.job_color()).status
    }
}

/// The full set of job statuses for one source at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub source_url: String,
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(source_url: impl Into<String>, jobs: Vec<Job>) -> Self {
        Self {
            source_url: source_key(&source_url.into()),
            jobs,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn has_failing_job(&self) -> bool {
        self.jobs.iter().any(|job| job.status() == Status::Failure)
    }
}

/// Canonical identity for a source URL, used as the storage key.
///
/// `https://ci.example.com/` and `https://CI.example.com` name the same
/// server; unparsable input is only trimmed.
pub fn source_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match url::Url::parse(trimmed) {
        Ok(parsed) => parsed.as_str().trim_end_matches('/').to_string(),
        Err(_) => trimmed.trim_end_matches('/').to_string(),
    }
}
