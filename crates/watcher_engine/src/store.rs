use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use engine_logging::{engine_debug, engine_warn};
use watcher_core::Snapshot;

use crate::filename::snapshot_filename;
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("invalid snapshot data in {location}: {source}")]
    Corrupt {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Persisted snapshots, one per source, keyed by the snapshot's `source_url`.
///
/// `save` replaces the stored snapshot of that source only; concurrent saves
/// for different sources never overwrite each other.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, source: &str) -> Result<Option<Snapshot>, StoreError>;

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Every stored snapshot, ordered by source.
    async fn load_all(&self) -> Result<Vec<Snapshot>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<BTreeMap<String, Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, source: &str) -> Result<Option<Snapshot>, StoreError> {
        let guard = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(source).cloned())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut guard = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        guard.insert(snapshot.source_url.clone(), snapshot.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Snapshot>, StoreError> {
        let guard = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }
}

/// One pretty-printed JSON file per source inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    writer: AtomicFileWriter,
}

const SNAPSHOT_EXTENSION: &str = "json";

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    fn parse(&self, filename: &str, text: &str) -> Result<Snapshot, StoreError> {
        serde_json::from_str(text).map_err(|source| StoreError::Corrupt {
            location: self.writer.dir().join(filename).display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn load(&self, source: &str) -> Result<Option<Snapshot>, StoreError> {
        let filename = snapshot_filename(source);
        match self.writer.read(&filename)? {
            Some(text) => self.parse(&filename, &text).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let filename = snapshot_filename(&snapshot.source_url);
        let content = serde_json::to_string_pretty(snapshot)?;
        let path = self.writer.write(&filename, &content)?;
        engine_debug!("stored {} jobs of {} in {:?}", snapshot.jobs.len(), snapshot.source_url, path);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Snapshot>, StoreError> {
        let mut snapshots = Vec::new();
        for filename in self.writer.list(SNAPSHOT_EXTENSION)? {
            let Some(text) = self.writer.read(&filename)? else {
                continue;
            };
            match self.parse(&filename, &text) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(err) => engine_warn!("skipping unreadable snapshot: {}", err),
            }
        }
        snapshots.sort_by(|a, b| a.source_url.cmp(&b.source_url));
        Ok(snapshots)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        for filename in self.writer.list(SNAPSHOT_EXTENSION)? {
            self.writer.remove(&filename)?;
        }
        Ok(())
    }
}
