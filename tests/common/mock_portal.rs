//! Mock portal and notifier for pipeline testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use order_confirm::error::{AuthError, SessionError, UploadError};
use order_confirm::notify::{Notification, Notifier};
use order_confirm::portal::{PortalConnector, PortalSession};
use order_confirm::types::{ColumnMapping, Credentials, ProcessingOutcome, UploadToken};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;

/// Scripted portal session with call tracking
///
/// Defaults to the happy path; individual stages can be made to fail via
/// the `fail_*` setters. Injected errors are consumed on first use, which
/// is enough for a pipeline that never retries.
pub struct MockSession {
    token: String,
    auth_error: Mutex<Option<AuthError>>,
    upload_error: Mutex<Option<UploadError>>,
    outcome: Mutex<ProcessingOutcome>,
    // Call tracking
    authorize_calls: Mutex<u32>,
    upload_calls: Mutex<Vec<PathBuf>>,
    process_calls: Mutex<Vec<String>>,
}

impl MockSession {
    /// A session that accepts everything
    pub fn accepting() -> Self {
        Self {
            token: "srv_20240101_0001.xls".to_string(),
            auth_error: Mutex::new(None),
            upload_error: Mutex::new(None),
            outcome: Mutex::new(ProcessingOutcome::Success),
            authorize_calls: Mutex::new(0),
            upload_calls: Mutex::new(Vec::new()),
            process_calls: Mutex::new(Vec::new()),
        }
    }

    // === Error injection ===

    /// Make `authorize` return an error
    pub fn fail_authorize(&self, error: AuthError) {
        *self.auth_error.lock().unwrap() = Some(error);
    }

    /// Make `upload` return an error
    pub fn fail_upload(&self, error: UploadError) {
        *self.upload_error.lock().unwrap() = Some(error);
    }

    /// Set the processing verdict
    pub fn set_outcome(&self, outcome: ProcessingOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    // === Call verification ===

    /// How many times `authorize` was called
    pub fn authorize_count(&self) -> u32 {
        *self.authorize_calls.lock().unwrap()
    }

    /// Paths `upload` was called with
    pub fn upload_paths(&self) -> Vec<PathBuf> {
        self.upload_calls.lock().unwrap().clone()
    }

    /// How many times `process` was called
    pub fn process_count(&self) -> usize {
        self.process_calls.lock().unwrap().len()
    }

    /// Tokens `process` was called with
    pub fn processed_tokens(&self) -> Vec<String> {
        self.process_calls.lock().unwrap().clone()
    }
}

// The connector hands out boxed sessions while tests keep their own Arc
// for verification, so the trait is implemented on a shared handle.
struct SessionHandle(Arc<MockSession>);

#[async_trait]
impl PortalSession for SessionHandle {
    async fn authorize(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        *self.0.authorize_calls.lock().unwrap() += 1;
        match self.0.auth_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn upload(&self, file_path: &Path) -> Result<UploadToken, UploadError> {
        self.0
            .upload_calls
            .lock()
            .unwrap()
            .push(file_path.to_path_buf());
        match self.0.upload_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(UploadToken(self.0.token.clone())),
        }
    }

    async fn process(&self, token: &UploadToken, _columns: &ColumnMapping) -> ProcessingOutcome {
        self.0
            .process_calls
            .lock()
            .unwrap()
            .push(token.as_str().to_string());
        self.0.outcome.lock().unwrap().clone()
    }
}

/// Connector handing out handles to one shared mock session
pub struct MockConnector {
    session: Arc<MockSession>,
    connect_error: Mutex<Option<SessionError>>,
    connect_calls: Mutex<Vec<Url>>,
}

impl MockConnector {
    pub fn new(session: Arc<MockSession>) -> Self {
        Self {
            session,
            connect_error: Mutex::new(None),
            connect_calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `connect` return an error
    pub fn fail_connect(&self, error: SessionError) {
        *self.connect_error.lock().unwrap() = Some(error);
    }

    /// How many times `connect` was called
    pub fn connect_count(&self) -> usize {
        self.connect_calls.lock().unwrap().len()
    }

    /// Base URLs `connect` was called with
    pub fn connected_urls(&self) -> Vec<Url> {
        self.connect_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortalConnector for MockConnector {
    async fn connect(&self, base_url: &Url) -> Result<Box<dyn PortalSession>, SessionError> {
        self.connect_calls.lock().unwrap().push(base_url.clone());
        if let Some(error) = self.connect_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(Box::new(SessionHandle(self.session.clone())))
    }
}

/// Notifier that records every notification it is asked to send
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// All notifications sent so far
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) {
        self.sent.lock().unwrap().push(notification.clone());
    }
}
