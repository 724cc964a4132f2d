mod config;
mod logging;
mod terminal;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine_logging::{engine_info, engine_warn};
use watcher_engine::{CycleEvent, EngineHandle, FileStore, PollOrchestrator, ReqwestFetcher};

use config::{AppConfig, FileConfigSource};
use logging::LogDestination;
use terminal::{print_snapshots, show_or_request, TerminalIndicator, TerminalNotifier};

#[derive(Debug, Parser)]
#[command(name = "jenkins-watcher", version, about = "Watch Jenkins jobs and report status changes")]
struct Cli {
    /// RON options file.
    #[arg(long, default_value = "watcher.ron")]
    config: PathBuf,
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Poll on the configured interval; reads commands from stdin.
    Run {
        /// Forget stored snapshots (and watched flags) before the first poll.
        #[arg(long)]
        reset: bool,
    },
    /// Run a single poll cycle.
    Poll,
    /// Flip, or set with --set, the watched flag of a job.
    Watch {
        job: String,
        #[arg(long)]
        set: Option<bool>,
    },
    /// Print the stored snapshots.
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let config = AppConfig::load(&cli.config).unwrap_or_else(|err| {
        engine_warn!("{:#}; continuing with defaults", err);
        AppConfig::default()
    });
    let orchestrator = build_orchestrator(&config)?;

    match cli.command {
        Command::Run { reset } => run(orchestrator, cli.config, reset),
        Command::Poll => block_on(async {
            let report = orchestrator.poll_all(&config.poll_config()).await;
            for outcome in &report.outcomes {
                if let Err(err) = &outcome.result {
                    eprintln!("{}: {}", outcome.source, err);
                }
            }
            anyhow::Ok(())
        }),
        Command::Watch { job, set } => block_on(async {
            match orchestrator.toggle_watch(&job, set).await? {
                Some(watched) => println!("{job}: watched={watched}"),
                None => println!("{job}: no such job in stored data"),
            }
            anyhow::Ok(())
        }),
        Command::Show => block_on(async {
            let mut snapshots = orchestrator.snapshots().await?;
            if snapshots.is_empty() {
                orchestrator.poll_all(&config.poll_config()).await;
                snapshots = orchestrator.snapshots().await?;
            }
            print_snapshots(&snapshots);
            anyhow::Ok(())
        }),
    }
}

fn build_orchestrator(config: &AppConfig) -> Result<PollOrchestrator> {
    let fetcher = ReqwestFetcher::new(config.fetch_settings()).context("creating HTTP client")?;
    let store = FileStore::new(config.state_dir.clone());
    let mut orchestrator = PollOrchestrator::new(
        Arc::new(fetcher),
        Arc::new(store),
        Arc::new(TerminalIndicator::default()),
    );
    orchestrator.add_notifier(Arc::new(TerminalNotifier));
    Ok(orchestrator)
}

fn block_on<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?
        .block_on(future)
}

fn run(orchestrator: PollOrchestrator, config_path: PathBuf, reset: bool) -> Result<()> {
    if reset {
        block_on(async { anyhow::Ok(orchestrator.reset().await?) })?;
    }
    let mut events = orchestrator.subscribe();
    let handle = EngineHandle::spawn(orchestrator, Arc::new(FileConfigSource::new(config_path)));

    std::thread::spawn(move || loop {
        match events.blocking_recv() {
            Ok(CycleEvent::SourceFailed { source, error }) => eprintln!("{source}: {error}"),
            Ok(CycleEvent::NotConfigured(err)) => eprintln!("not polling: {err}"),
            Ok(_) => {}
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                engine_warn!("missed {} cycle events", skipped);
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    });

    println!("commands: poll | watch <job> | unwatch <job> | toggle <job> | show | next | reset | quit");
    for line in std::io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("poll"), _) => handle.poll_now(),
            (Some("reset"), _) => handle.reset(),
            (Some("show"), _) => {
                show_or_request(&handle.snapshots(), || handle.poll_now());
            }
            (Some("next"), _) => match handle.next_refresh_in() {
                Some(remaining) => println!("next refresh in {}s", remaining.as_secs()),
                None => println!("no refresh scheduled"),
            },
            (Some(verb @ ("watch" | "unwatch" | "toggle")), Some(job)) => {
                let set = match verb {
                    "watch" => Some(true),
                    "unwatch" => Some(false),
                    _ => None,
                };
                match handle.toggle_watch(job, set) {
                    Some(watched) => println!("{job}: watched={watched}"),
                    None => println!("{job}: no such job in stored data"),
                }
            }
            (Some("quit" | "exit"), _) => break,
            (None, _) => {}
            (Some(other), _) => println!("unknown command: {other}"),
        }
    }

    engine_info!("stopping");
    handle.shutdown();
    Ok(())
}
