//! Supplier portal client
//!
//! `PortalSession` is the seam the pipeline works against: one
//! authenticated connection to the portal, reused for every call of the
//! run. `PortalConnector` opens sessions, so tests can drive the pipeline
//! with scripted doubles.

mod http;

pub use http::{HttpConnector, HttpPortal};

use crate::error::{AuthError, SessionError, UploadError};
use crate::types::{ColumnMapping, Credentials, ProcessingOutcome, UploadToken};
use async_trait::async_trait;
use std::path::Path;
use url::Url;

/// One authenticated connection to the supplier portal
#[async_trait]
pub trait PortalSession: Send + Sync {
    /// Log in; on success the session carries authenticated state for
    /// all following calls
    async fn authorize(&self, credentials: &Credentials) -> Result<(), AuthError>;

    /// Upload the confirmation spreadsheet, returning the server-assigned
    /// token for it
    async fn upload(&self, file_path: &Path) -> Result<UploadToken, UploadError>;

    /// Ask the portal to process an uploaded file and classify its verdict
    ///
    /// A rejection is an outcome, not an error, so this is infallible.
    async fn process(&self, token: &UploadToken, columns: &ColumnMapping) -> ProcessingOutcome;
}

/// Opens portal sessions against a base URL
#[async_trait]
pub trait PortalConnector: Send + Sync {
    /// Probe the host and hand back a fresh session
    async fn connect(&self, base_url: &Url) -> Result<Box<dyn PortalSession>, SessionError>;
}
