//! Submission pipeline orchestration
//!
//! One run walks a strictly linear sequence of stages:
//! load config -> resolve file path -> open session -> authorize ->
//! upload -> process. The first stage to fail short-circuits the run, and
//! either way exactly one terminal notification leaves this module.

use crate::config::Config;
use crate::error::StageError;
use crate::notify::{Notification, Notifier};
use crate::portal::PortalConnector;
use crate::types::{Credentials, ProcessingOutcome, RunStatus};
use std::fmt;
use std::path::Path;
use tracing::{error, info};

/// Stage labels for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadConfig,
    OpenSession,
    Authorize,
    Upload,
    Process,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadConfig => "load-config",
            Stage::OpenSession => "open-session",
            Stage::Authorize => "authorize",
            Stage::Upload => "upload",
            Stage::Process => "process",
        };
        f.write_str(name)
    }
}

/// Why a run ended in `Failed`
///
/// A stage error is a fault somewhere in the machinery; a rejection is
/// the portal exercising its business rules. Both terminate the run, the
/// distinction only shapes the message.
enum RunFailure {
    Stage(StageError),
    Rejected(String),
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunFailure::Stage(e) => e.fmt(f),
            RunFailure::Rejected(message) => write!(f, "portal rejected the file: {message}"),
        }
    }
}

fn stage<E: Into<StageError>>(error: E) -> RunFailure {
    RunFailure::Stage(error.into())
}

/// Execute one submission run to its terminal state
///
/// Returns `Done` only when every stage succeeded and the portal accepted
/// the file. Exactly one notification is sent per call, on every path.
pub async fn run(
    config_path: &Path,
    file_override: Option<&Path>,
    credentials: &Credentials,
    connector: &dyn PortalConnector,
    notifier: &dyn Notifier,
) -> RunStatus {
    match run_stages(config_path, file_override, credentials, connector).await {
        Ok(file_label) => {
            info!("run complete: {file_label} accepted");
            notifier.send(&Notification::success(&file_label)).await;
            RunStatus::Done
        }
        Err(failure) => {
            error!("run failed: {failure}");
            notifier
                .send(&Notification::failure(&failure.to_string()))
                .await;
            RunStatus::Failed
        }
    }
}

/// The linear stage sequence, minus notification
///
/// Returns the submitted file's label (file name only) on success.
async fn run_stages(
    config_path: &Path,
    file_override: Option<&Path>,
    credentials: &Credentials,
    connector: &dyn PortalConnector,
) -> Result<String, RunFailure> {
    info!(stage = %Stage::LoadConfig, path = %config_path.display(), "loading configuration");
    let config = Config::load(config_path).map_err(stage)?;

    // Resolved before any network call so a missing path never costs an
    // authenticated session.
    let file_path = config.resolve_file_path(file_override).map_err(stage)?;

    info!(stage = %Stage::OpenSession, url = %config.base_url, "opening portal session");
    let session = connector.connect(&config.base_url).await.map_err(stage)?;

    info!(stage = %Stage::Authorize, "authorizing");
    session.authorize(credentials).await.map_err(stage)?;

    info!(stage = %Stage::Upload, path = %file_path.display(), "uploading confirmation file");
    let token = session.upload(&file_path).await.map_err(stage)?;

    info!(stage = %Stage::Process, %token, "requesting processing");
    match session.process(&token, &config.columns).await {
        ProcessingOutcome::Success => Ok(file_label(&file_path)),
        ProcessingOutcome::Failure(message) => Err(RunFailure::Rejected(message)),
    }
}

// The notification names the artifact, not where it lived on this machine.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
