use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use docqa_application::SessionController;
use docqa_core::config::ClientConfig;
use docqa_core::registry::KeyValueStore;
use docqa_infrastructure::{ConfigService, DocqaPaths, FileKeyValueStore, MemoryKeyValueStore};
use docqa_interaction::HttpRagBackend;

mod commands;
mod helper;
mod render;
mod repl;

#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "DocQA - ask questions about your PDF documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Address of the question-answering backend
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Number of context passages requested per question
    #[arg(long, value_name = "N")]
    top_k: Option<u32>,

    /// Configuration file (defaults to ~/.config/docqa/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// File holding the list of uploaded documents
    #[arg(long, value_name = "PATH", conflicts_with = "ephemeral")]
    store: Option<PathBuf>,

    /// Keep the document list in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Mirror logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(&config, cli.verbose)?;
    tracing::info!(
        "[docqa] Starting v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.backend_url
    );

    let store = open_store(&cli)?;
    let backend = Arc::new(HttpRagBackend::new(config.backend_url.clone()));
    let controller = Arc::new(SessionController::new(backend, store, &config));

    repl::run(controller).await
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = service
        .load()
        .with_context(|| format!("Failed to load config from {}", service.path().display()))?;

    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    Ok(config)
}

/// Logs go to a daily file under the data directory so they never interleave
/// with the prompt. `RUST_LOG` takes precedence over the configured level.
fn init_tracing(config: &ClientConfig, verbose: bool) -> Result<WorkerGuard> {
    let log_dir = DocqaPaths::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "docqa.log"));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(stderr_layer)
        .init();

    Ok(guard)
}

fn open_store(cli: &Cli) -> Result<Arc<dyn KeyValueStore>> {
    if cli.ephemeral {
        tracing::info!("[docqa] Using in-memory document list");
        return Ok(Arc::new(MemoryKeyValueStore::new()));
    }

    let path = match &cli.store {
        Some(path) => path.clone(),
        None => DocqaPaths::store_file()?,
    };
    tracing::info!("[docqa] Using document list at {}", path.display());
    Ok(Arc::new(FileKeyValueStore::new(path)))
}
