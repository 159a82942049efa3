//! Core types for order-confirm

use serde::Deserialize;
use std::fmt;

/// Portal login credentials, sourced from the environment once per run
#[derive(Clone)]
pub struct Credentials {
    /// Portal account login
    pub login: String,
    /// Portal account password
    pub password: String,
}

// Manual Debug so a stray debug log can never leak the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Spreadsheet column indices the portal needs to interpret the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    /// Column holding the customer order number
    pub order_id_col: u32,
    /// Column holding the confirmed quantity
    pub quantity_col: u32,
    /// Column holding the order position code
    pub order_product_id_col: u32,
}

/// Server-assigned identifier for a just-uploaded file
///
/// Opaque: the portal hands it back from the upload call and expects it
/// verbatim in the processing call. It is meaningless after the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToken(pub String);

impl UploadToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The portal's business-level verdict on a submitted file
///
/// Independent of HTTP transport status: a 2xx response can still carry a
/// rejection, and a rejection is a normal outcome rather than a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The portal accepted the file (`status_code` == "0")
    Success,
    /// The portal rejected the file, with its own description
    Failure(String),
}

/// Terminal state of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every stage completed and the portal accepted the file
    Done,
    /// Some stage failed or the portal rejected the file
    Failed,
}
