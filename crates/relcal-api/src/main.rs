//! # relcal — Binary Entry Point
//!
//! Parses configuration from flags and `RELCAL_*` environment variables,
//! opens the document store, and serves the API until Ctrl-C.

use std::fs::OpenOptions;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use relcal_api::state::{AppConfig, AppState, DEFAULT_PORT, DEFAULT_TRACKER_TIMEOUT_SECS};
use relcal_store::config::{DEFAULT_DATA_DIR, DEFAULT_MAX_BACKUPS};
use relcal_store::{DocumentStore, StoreConfig};
use relcal_tracker::JiraClient;

/// Release calendar document service.
#[derive(Parser, Debug)]
#[command(name = "relcal", version, about, long_about = None)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "RELCAL_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// TCP port to listen on.
    #[arg(long, env = "RELCAL_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory holding the live documents.
    #[arg(long, env = "RELCAL_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory holding backups. Defaults to `<data-dir>/backups`.
    #[arg(long, env = "RELCAL_BACKUP_DIR")]
    backup_dir: Option<PathBuf>,

    /// Backups kept per document when a write does not send X-Max-Backups.
    #[arg(long, env = "RELCAL_MAX_BACKUPS", default_value_t = DEFAULT_MAX_BACKUPS, value_parser = parse_positive)]
    max_backups: usize,

    /// Directory of static files served for unmatched paths.
    #[arg(long, env = "RELCAL_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Timeout for each issue tracker request, in seconds.
    #[arg(long, env = "RELCAL_TRACKER_TIMEOUT_SECS", default_value_t = DEFAULT_TRACKER_TIMEOUT_SECS)]
    tracker_timeout_secs: u64,

    /// Emit logs as JSON lines.
    #[arg(long, env = "RELCAL_LOG_JSON")]
    log_json: bool,

    /// Also append plain-text logs to this file.
    #[arg(long, env = "RELCAL_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a positive integer, got {s:?}")),
    }
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let mut store = StoreConfig::rooted_at(self.data_dir);
        if let Some(backup_dir) = self.backup_dir {
            store.backup_dir = backup_dir;
        }
        store.default_max_backups = self.max_backups;
        AppConfig {
            host: self.host,
            port: self.port,
            store,
            static_dir: self.static_dir,
            tracker_timeout_secs: self.tracker_timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json, cli.log_file.as_deref())?;

    let config = cli.into_config();
    tracing::debug!(?config, "configuration loaded");

    let store = DocumentStore::open(&config.store).context("opening document store")?;
    let tracker = JiraClient::new(Duration::from_secs(config.tracker_timeout_secs))
        .context("building issue tracker client")?;

    let addr = config.socket_addr();
    let state = AppState::new(config, store, Arc::new(tracker));
    let app = relcal_api::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("relcal listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("relcal stopped");
    Ok(())
}

/// Log to stdout, and to `log_file` as well when one is given.
fn init_tracing(log_json: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout = if log_json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    let file = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)).boxed())
        }
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .init();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_optional() {
        let cli = Cli::try_parse_from(["relcal"]).unwrap();
        assert!(cli.log_file.is_none());

        let cli = Cli::try_parse_from(["relcal", "--log-file", "server.log"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("server.log")));
    }

    #[test]
    fn max_backups_must_be_positive() {
        assert!(Cli::try_parse_from(["relcal", "--max-backups", "0"]).is_err());
        let config = Cli::try_parse_from(["relcal", "--max-backups", "4", "--data-dir", "/srv/relcal"])
            .unwrap()
            .into_config();
        assert_eq!(config.store.default_max_backups, 4);
        assert_eq!(config.store.backup_dir, PathBuf::from("/srv/relcal/backups"));
    }
}
