//! Watcher engine: fetching, storage, poll orchestration and scheduling.
mod decode;
mod engine;
mod fetch;
mod filename;
mod notify;
mod orchestrator;
mod persist;
mod store;
mod types;

pub use decode::decode_jobs;
pub use engine::{ConfigSource, EngineHandle, FALLBACK_REFRESH};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::snapshot_filename;
pub use notify::{Indicator, NoIndicator, Notifier};
pub use orchestrator::{Clock, PollOrchestrator};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use store::{FileStore, MemoryStore, SnapshotStore, StoreError};
pub use types::{
    ConfigError, CycleEvent, CycleReport, FailureKind, FetchError, PollConfig, SourceOutcome,
    SourceReport,
};
