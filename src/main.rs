//! active-noted — drives the pointer pipeline from a scripted host.
//!
//! Reads editor state and events as JSON lines on stdin (see
//! `active_note::host::script`) and keeps the pointer file under `--root`
//! up to date until stdin closes or the process is interrupted.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use active_note::config::{DEFAULT_CONFIG_DIR, Settings, SettingsStore};
use active_note::host::EventSource;
use active_note::host::script::ScriptHost;
use active_note::pipeline::Pipeline;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "active-noted", version, about = "Mirror editor focus state into a pointer file")]
struct Cli {
    /// Storage root the pointer path is resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Host private configuration directory, relative to the root.
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: String,

    /// Settings file (JSON). Defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the pointer file path for this run.
    #[arg(long)]
    pointer_path: Option<String>,

    /// Override the debounce interval (ms) for this run.
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.settings {
        Some(path) => match SettingsStore::open(path, cli.config_dir.clone()) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "failed to load settings");
                return ExitCode::FAILURE;
            }
        },
        None => SettingsStore::new(Settings::default(), cli.config_dir.clone()),
    };
    store.apply(|s| {
        if let Some(path) = cli.pointer_path.clone() {
            s.pointer_file_path = path;
        }
        if let Some(ms) = cli.debounce_ms {
            s.debounce_ms = ms;
        }
    });
    let store = Arc::new(store);

    let mut host = ScriptHost::new(tokio::io::stdin());
    let mut subscription = match host.subscribe() {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::error!(error = %e, "failed to subscribe to host events");
            return ExitCode::FAILURE;
        }
    };

    let mut pipeline = Pipeline::new(host.editor(), Arc::clone(&store), cli.root.clone());
    tracing::info!(
        pointer = %store.resolve_pointer_path(pipeline.storage_root()).display(),
        config_dir = store.config_dir(),
        debounce_ms = store.snapshot().debounce_ms,
        "active-noted started"
    );

    tokio::select! {
        stats = pipeline.run(&mut subscription) => {
            tracing::info!(
                writes = stats.writes,
                skipped = stats.skipped,
                failures = stats.failures,
                "host closed, shutting down"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }

    pipeline.shutdown();
    host.unsubscribe();
    ExitCode::SUCCESS
}
