//! order-confirm - submit an order confirmation spreadsheet to the
//! supplier portal and report the outcome to Telegram.

use anyhow::{Context, Result};
use clap::Parser;
use order_confirm::config::{self, NotifierSettings, DEFAULT_CONFIG_FILE};
use order_confirm::notify::TelegramNotifier;
use order_confirm::pipeline;
use order_confirm::portal::HttpConnector;
use order_confirm::types::RunStatus;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run log written next to the process, truncated on every start
const LOG_FILE: &str = "app.log";

#[derive(Parser)]
#[command(name = "order-confirm")]
#[command(about = "Submit an order confirmation spreadsheet to the supplier portal")]
#[command(version)]
struct Cli {
    /// Spreadsheet to submit (overrides confirmation_file_path from config.json)
    file: Option<PathBuf>,
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("cannot create log file {LOG_FILE}"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    // Everything environment-sourced is resolved here, once; the pipeline
    // only sees explicit values. Without Telegram settings no terminal
    // notification could be delivered at all, so that is fatal too.
    let credentials = match config::credentials_from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let settings = match NotifierSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let notifier = TelegramNotifier::new(settings);
    let connector = HttpConnector;

    let status = pipeline::run(
        Path::new(DEFAULT_CONFIG_FILE),
        cli.file.as_deref(),
        &credentials,
        &connector,
        &notifier,
    )
    .await;

    match status {
        RunStatus::Done => ExitCode::SUCCESS,
        RunStatus::Failed => ExitCode::FAILURE,
    }
}
