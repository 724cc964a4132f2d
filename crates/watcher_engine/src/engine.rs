use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use engine_logging::{engine_error, engine_info, engine_warn};
use tokio::sync::{broadcast, mpsc, oneshot};
use watcher_core::Snapshot;

use crate::orchestrator::PollOrchestrator;
use crate::{ConfigError, CycleEvent, PollConfig};

/// Used when the configuration cannot be read and so has no interval.
pub const FALLBACK_REFRESH: Duration = Duration::from_secs(5 * 60);

/// Where the engine reads its settings at the start of every cycle.
pub trait ConfigSource: Send + Sync + 'static {
    fn load(&self) -> Result<PollConfig, ConfigError>;
}

impl ConfigSource for PollConfig {
    fn load(&self) -> Result<PollConfig, ConfigError> {
        Ok(self.clone())
    }
}

enum EngineCommand {
    PollNow,
    Reset,
    ToggleWatch {
        job_name: String,
        watch: Option<bool>,
        reply: oneshot::Sender<Option<bool>>,
    },
    Snapshots {
        reply: oneshot::Sender<Vec<Snapshot>>,
    },
    Shutdown,
}

/// Background scheduler: polls on a fixed interval on its own single-threaded
/// runtime and accepts commands from any thread.
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    orchestrator: Arc<PollOrchestrator>,
    next_refresh: Arc<Mutex<Option<Instant>>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    /// Starts the scheduler; the first poll runs immediately.
    pub fn spawn(orchestrator: PollOrchestrator, config: Arc<dyn ConfigSource>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let orchestrator = Arc::new(orchestrator);
        let next_refresh = Arc::new(Mutex::new(None));

        let thread = {
            let orchestrator = orchestrator.clone();
            let next_refresh = next_refresh.clone();
            thread::spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        engine_error!("failed to start engine runtime: {}", err);
                        return;
                    }
                };
                runtime.block_on(run_loop(orchestrator, config, cmd_rx, next_refresh));
            })
        };

        Self {
            cmd_tx,
            orchestrator,
            next_refresh,
            thread: Some(thread),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CycleEvent> {
        self.orchestrator.subscribe()
    }

    /// Re-reads the configuration and polls now; the interval restarts.
    pub fn poll_now(&self) {
        let _ = self.cmd_tx.send(EngineCommand::PollNow);
    }

    /// Clears stored snapshots, then polls.
    pub fn reset(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Reset);
    }

    /// Blocks until the engine has applied the change. Must not be called
    /// from inside an async context.
    pub fn toggle_watch(&self, job_name: impl Into<String>, watch: Option<bool>) -> Option<bool> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(EngineCommand::ToggleWatch {
                job_name: job_name.into(),
                watch,
                reply,
            })
            .ok()?;
        rx.blocking_recv().ok().flatten()
    }

    /// Blocking; see [`EngineHandle::toggle_watch`].
    pub fn snapshots(&self) -> Vec<Snapshot> {
        let (reply, rx) = oneshot::channel();
        if self.cmd_tx.send(EngineCommand::Snapshots { reply }).is_err() {
            return Vec::new();
        }
        rx.blocking_recv().unwrap_or_default()
    }

    /// Time until the next scheduled poll, if one is scheduled.
    pub fn next_refresh_in(&self) -> Option<Duration> {
        let deadline = (*self.next_refresh.lock().ok()?)?;
        Some(deadline.saturating_duration_since(Instant::now()))
    }

    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                engine_error!("engine thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}

async fn run_loop(
    orchestrator: Arc<PollOrchestrator>,
    config: Arc<dyn ConfigSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
    next_refresh: Arc<Mutex<Option<Instant>>>,
) {
    loop {
        let period = match config.load() {
            Ok(config) => {
                orchestrator.poll_all(&config).await;
                config.refresh_interval
            }
            Err(err) => {
                orchestrator.mark_unconfigured(err);
                FALLBACK_REFRESH
            }
        };

        let deadline = tokio::time::Instant::now() + period;
        if let Ok(mut slot) = next_refresh.lock() {
            *slot = Some(deadline.into_std());
        }
        engine_info!("next refresh in {}s", period.as_secs());

        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                command = cmd_rx.recv() => match command {
                    None | Some(EngineCommand::Shutdown) => {
                        engine_info!("engine shutting down");
                        return;
                    }
                    Some(EngineCommand::PollNow) => break,
                    Some(EngineCommand::Reset) => {
                        if let Err(err) = orchestrator.reset().await {
                            engine_error!("failed to clear stored snapshots: {}", err);
                        }
                        break;
                    }
                    Some(EngineCommand::ToggleWatch { job_name, watch, reply }) => {
                        let watched = match orchestrator.toggle_watch(&job_name, watch).await {
                            Ok(watched) => watched,
                            Err(err) => {
                                engine_warn!("failed to toggle watch for {}: {}", job_name, err);
                                None
                            }
                        };
                        let _ = reply.send(watched);
                    }
                    Some(EngineCommand::Snapshots { reply }) => {
                        let snapshots = orchestrator.snapshots().await.unwrap_or_else(|err| {
                            engine_warn!("failed to read stored snapshots: {}", err);
                            Vec::new()
                        });
                        let _ = reply.send(snapshots);
                    }
                },
            }
        }
    }
}
