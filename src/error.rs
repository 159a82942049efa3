//! Error types for order-confirm
//!
//! Each pipeline stage owns a small typed error enum; the orchestrator
//! only ever pattern-matches on `StageError`. All of these are fatal to
//! the run — none is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration faults, all detected before any network activity
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON
    #[error("malformed config file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Neither the config file nor the environment supplies a base URL
    #[error("no base_url in config file and BASE_URL is not set")]
    MissingBaseUrl,

    /// The resolved base URL does not parse
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// No spreadsheet path from either the CLI argument or the config file
    #[error("no confirmation file path: pass one as an argument or set confirmation_file_path")]
    MissingFilePath,

    /// A required environment variable is absent
    #[error("required environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Failure to open a session against the portal host
#[derive(Debug, Error)]
pub enum SessionError {
    /// Network, DNS, or TLS fault reaching the host
    #[error("cannot reach portal: {0}")]
    Transport(String),

    /// The reachability probe answered with a non-success status
    #[error("portal probe returned HTTP {0}")]
    Probe(u16),
}

/// Authentication failure
///
/// `Transport` and `Rejected` halt the run identically; they are
/// distinguished only so the log says whether the portal was unreachable
/// or the credentials were refused.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP-level fault: network error, non-2xx status, or an unreadable body
    #[error("authentication transport failure: {0}")]
    Transport(String),

    /// HTTP 2xx but the response body carries a non-empty `errors` field
    #[error("authentication rejected by portal: {0}")]
    Rejected(String),
}

/// Upload failure
#[derive(Debug, Error)]
pub enum UploadError {
    /// The spreadsheet could not be read from disk
    #[error("cannot read confirmation file {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP-level fault during the upload call
    #[error("upload transport failure: {0}")]
    Transport(String),

    /// The upload response lacks the expected `data.file_name` token
    #[error("upload response missing data.file_name: {0}")]
    Malformed(String),
}

/// Any stage error, as seen by the pipeline orchestrator
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}
