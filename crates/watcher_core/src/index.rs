use std::collections::HashMap;

use crate::catalog::JobColor;
use crate::snapshot::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedJob<'a> {
    pub color: JobColor,
    pub url: &'a str,
    /// Position of the job in its snapshot.
    pub seq: usize,
}

/// Jobs of one snapshot keyed by name. Built per comparison, never stored.
#[derive(Debug, Clone, Default)]
pub struct SnapshotIndex<'a> {
    entries: HashMap<&'a str, IndexedJob<'a>>,
}

impl<'a> SnapshotIndex<'a> {
    /// Indexes `jobs` by name. A name that occurs twice keeps its last entry.
    pub fn build(jobs: &'a [Job]) -> Self {
        let mut entries = HashMap::with_capacity(jobs.len());
        for (seq, job) in jobs.iter().enumerate() {
            entries.insert(
                job.name.as_str(),
                IndexedJob {
                    color: job.job_color(),
                    url: job.url.as_str(),
                    seq,
                },
            );
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&IndexedJob<'a>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by their position in the source snapshot.
    pub fn in_sequence_order(&self) -> Vec<(&'a str, IndexedJob<'a>)> {
        let mut ordered: Vec<_> = self
            .entries
            .iter()
            .map(|(name, job)| (*name, *job))
            .collect();
        ordered.sort_by_key(|(_, job)| job.seq);
        ordered
    }
}
