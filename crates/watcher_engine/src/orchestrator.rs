use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn, set_poll_cycle};
use futures_util::future::join_all;
use tokio::sync::broadcast;
use watcher_core::{diff, merge_watched, source_key, summarize, toggle_watch, Badge, Snapshot};

use crate::fetch::Fetcher;
use crate::notify::{Indicator, Notifier};
use crate::store::{SnapshotStore, StoreError};
use crate::{ConfigError, CycleEvent, CycleReport, PollConfig, SourceOutcome, SourceReport};

const EVENT_CAPACITY: usize = 64;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Runs poll cycles: fetch every source, diff against the stored snapshot,
/// notify, persist, and summarize.
pub struct PollOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn SnapshotStore>,
    indicator: Arc<dyn Indicator>,
    notifiers: Vec<Arc<dyn Notifier>>,
    events: broadcast::Sender<CycleEvent>,
    cycle: AtomicU64,
    clock: Clock,
}

impl PollOrchestrator {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn SnapshotStore>,
        indicator: Arc<dyn Indicator>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            fetcher,
            store,
            indicator,
            notifiers: Vec::new(),
            events,
            cycle: AtomicU64::new(0),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Registers another notifier; earlier registrations stay active.
    pub fn add_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CycleEvent> {
        self.events.subscribe()
    }

    /// Runs one complete poll cycle.
    ///
    /// Sources are fetched concurrently on the calling task. The indicator
    /// is updated once, after every fetch has finished.
    pub async fn poll_all(&self, config: &PollConfig) -> CycleReport {
        let cycle = self.cycle.fetch_add(1, Ordering::Relaxed) + 1;
        set_poll_cycle(cycle);

        if let Err(err) = config.validate() {
            return self.report_unconfigured(cycle, err);
        }

        // At most one poll_source per storage key.
        let mut seen = BTreeSet::new();
        let sources: Vec<String> = config
            .sources
            .iter()
            .map(|source| source_key(source))
            .filter(|source| !source.is_empty())
            .filter(|source| {
                let first = seen.insert(source.clone());
                if !first {
                    engine_warn!("ignoring duplicate source {}", source);
                }
                first
            })
            .collect();

        engine_info!("polling {} sources", sources.len());
        self.indicator.show(&Badge::Loading);
        self.publish(CycleEvent::Loading { cycle });

        let outcomes = join_all(sources.into_iter().map(|source| self.poll_source(source))).await;

        let badge = summarize(
            outcomes
                .iter()
                .filter_map(|outcome| outcome.result.as_ref().ok())
                .map(|report| &report.snapshot),
        );
        self.indicator.show(&badge);

        let report = CycleReport {
            cycle,
            badge,
            outcomes,
        };
        let received: Vec<Snapshot> = report.snapshots().cloned().collect();
        engine_info!(
            "cycle finished: {}/{} sources answered, badge {}",
            received.len(),
            report.outcomes.len(),
            report.badge.text()
        );
        if !received.is_empty() {
            self.publish(CycleEvent::Data(received));
        }
        report
    }

    /// Shows the "no configuration" state without fetching anything.
    pub fn mark_unconfigured(&self, err: ConfigError) -> CycleReport {
        let cycle = self.cycle.fetch_add(1, Ordering::Relaxed) + 1;
        set_poll_cycle(cycle);
        self.report_unconfigured(cycle, err)
    }

    fn report_unconfigured(&self, cycle: u64, err: ConfigError) -> CycleReport {
        engine_warn!("skipping poll: {}", err);
        self.indicator.show(&Badge::NoConfig);
        self.publish(CycleEvent::NotConfigured(err));
        CycleReport {
            cycle,
            badge: Badge::NoConfig,
            outcomes: Vec::new(),
        }
    }

    async fn poll_source(&self, source: String) -> SourceOutcome {
        let result = match self.fetcher.fetch_jobs(&source).await {
            Ok(mut snapshot) => {
                snapshot.source_url = source.clone();
                snapshot.timestamp = Some((self.clock)());
                Ok(self.apply_snapshot(snapshot).await)
            }
            Err(error) => {
                engine_warn!("failed to fetch {}: {}", source, error);
                self.publish(CycleEvent::SourceFailed {
                    source: source.clone(),
                    error: error.clone(),
                });
                Err(error)
            }
        };
        SourceOutcome { source, result }
    }

    async fn apply_snapshot(&self, mut snapshot: Snapshot) -> SourceReport {
        let previous = match self.store.load(&snapshot.source_url).await {
            Ok(previous) => previous,
            Err(err) => {
                engine_error!("failed to load stored snapshot of {}: {}", snapshot.source_url, err);
                None
            }
        };
        if previous.is_none() {
            engine_debug!("first observation of {}", snapshot.source_url);
        }

        merge_watched(previous.as_ref(), &mut snapshot);
        let events = diff(previous.as_ref(), &snapshot);
        for event in &events {
            engine_info!("{}: {}", snapshot.source_url, event.title());
            for notifier in &self.notifiers {
                notifier.notify(event);
            }
        }

        if let Err(err) = self.store.save(&snapshot).await {
            engine_error!("failed to store snapshot of {}: {}", snapshot.source_url, err);
        }
        SourceReport { snapshot, events }
    }

    /// Sets (`Some`) or flips (`None`) the watched flag of the first stored
    /// job with this name. Returns the new value, or `None` if no job matched.
    pub async fn toggle_watch(
        &self,
        job_name: &str,
        watch: Option<bool>,
    ) -> Result<Option<bool>, StoreError> {
        let mut snapshots = self.store.load_all().await?;
        let Some(toggled) = toggle_watch(&mut snapshots, job_name, watch) else {
            engine_debug!("no stored job named {}", job_name);
            return Ok(None);
        };
        self.store.save(&snapshots[toggled.snapshot]).await?;
        engine_info!("job {} watched={}", job_name, toggled.watched);
        self.publish(CycleEvent::WatchToggled {
            job_name: job_name.to_string(),
            watched: toggled.watched,
        });
        Ok(Some(toggled.watched))
    }

    pub async fn snapshots(&self) -> Result<Vec<Snapshot>, StoreError> {
        self.store.load_all().await
    }

    /// Forgets every stored snapshot; the next poll is a first observation.
    pub async fn reset(&self) -> Result<(), StoreError> {
        engine_info!("clearing stored snapshots");
        self.store.clear().await
    }

    fn publish(&self, event: CycleEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
