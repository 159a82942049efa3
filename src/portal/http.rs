//! Portal client over HTTP
//!
//! The portal signals business failure inside HTTP-successful responses,
//! so every call here splits transport interpretation from body
//! interpretation. The body-interpretation helpers are plain functions on
//! strings to keep them testable without a server.

use crate::error::{AuthError, SessionError, UploadError};
use crate::portal::{PortalConnector, PortalSession};
use crate::types::{ColumnMapping, Credentials, ProcessingOutcome, UploadToken};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const AUTH_ENDPOINT: &str = "/auth-ajax_login";
const UPLOAD_ENDPOINT: &str = "/supplier_answer-load_answer_file";
const PROCESS_ENDPOINT: &str = "/supplier_answer-proc_answer_file";

/// Multipart field name the portal expects the spreadsheet under
const UPLOAD_FIELD: &str = "order_answer_file";
const EXCEL_MIME: &str = "application/vnd.ms-excel";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Cookie-carrying HTTP session bound to one portal host
pub struct HttpPortal {
    client: Client,
    base_url: Url,
}

impl HttpPortal {
    /// Open a session: build a cookie-store client and probe the host
    ///
    /// The probe GET makes DNS/TLS/reachability problems surface before
    /// any credentials are sent, and lets the server seed its session
    /// cookie.
    pub async fn open(base_url: Url) -> Result<Self, SessionError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let response = client
            .get(base_url.clone())
            .send()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Probe(status.as_u16()));
        }

        debug!(url = %base_url, "portal session opened");
        Ok(Self { client, base_url })
    }

    // Endpoints are concatenated onto the base URL as strings; never
    // filesystem path joins, which would be separator-dependent.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PortalSession for HttpPortal {
    async fn authorize(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let form = [
            ("login", credentials.login.as_str()),
            ("password", credentials.password.as_str()),
            ("save_password", "on"),
        ];

        let response = self
            .client
            .post(self.endpoint(AUTH_ENDPOINT))
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Transport(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        // HTTP 2xx does not mean the login worked: rejections arrive in
        // the `errors` field of an otherwise successful response.
        match auth_rejection(&body) {
            Ok(Some(errors)) => Err(AuthError::Rejected(errors)),
            Ok(None) => Ok(()),
            Err(e) => Err(AuthError::Transport(format!("unreadable auth response: {e}"))),
        }
    }

    async fn upload(&self, file_path: &Path) -> Result<UploadToken, UploadError> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| UploadError::NotFound {
                path: file_path.to_path_buf(),
                source,
            })?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "order_answer.xls".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(EXCEL_MIME)
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.endpoint(UPLOAD_ENDPOINT))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Transport(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        match parse_upload_token(&body) {
            Some(token) => {
                info!(%token, "confirmation file uploaded");
                Ok(token)
            }
            None => Err(UploadError::Malformed(body)),
        }
    }

    async fn process(&self, token: &UploadToken, columns: &ColumnMapping) -> ProcessingOutcome {
        let form = [
            ("order_id_col", columns.order_id_col.to_string()),
            ("quantity_col", columns.quantity_col.to_string()),
            (
                "order_product_id_col",
                columns.order_product_id_col.to_string(),
            ),
            ("file_name", token.as_str().to_string()),
            ("cancel_reason", String::new()),
            ("dataType", "json".to_string()),
        ];

        let response = match self
            .client
            .post(self.endpoint(PROCESS_ENDPOINT))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProcessingOutcome::Failure(format!("processing request failed: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            return ProcessingOutcome::Failure(format!("processing returned HTTP {status}"));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return ProcessingOutcome::Failure(format!("unreadable processing response: {e}"))
            }
        };

        // The raw portal verdict always goes to the console and the log,
        // whatever the classification says.
        println!("{body}");
        info!("processing response: {body}");

        classify_processing(&body)
    }
}

/// Opens real `HttpPortal` sessions
pub struct HttpConnector;

#[async_trait]
impl PortalConnector for HttpConnector {
    async fn connect(&self, base_url: &Url) -> Result<Box<dyn PortalSession>, SessionError> {
        Ok(Box::new(HttpPortal::open(base_url.clone()).await?))
    }
}

/// Extract a rejection from an HTTP-successful auth response
///
/// Returns `Ok(Some(..))` when the body's `errors` field is non-empty,
/// `Ok(None)` when it is absent or empty, `Err` when the body is not JSON.
fn auth_rejection(body: &str) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    Ok(match value.get("errors") {
        None | Some(Value::Null) => None,
        Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::Array(a)) if a.is_empty() => None,
        Some(Value::Object(m)) if m.is_empty() => None,
        Some(errors) => Some(render_json(errors)),
    })
}

/// Pull the `data.file_name` token out of an upload response
fn parse_upload_token(body: &str) -> Option<UploadToken> {
    let value: Value = serde_json::from_str(body).ok()?;
    let file_name = value.get("data")?.get("file_name")?.as_str()?;
    Some(UploadToken(file_name.to_string()))
}

/// Classify a processing response body into the portal's verdict
///
/// Vendor convention: `status_code` compared as text equal to "0" means
/// accepted (the portal has been seen sending both the number 0 and the
/// string "0"). Anything else, including a body that is not JSON at all,
/// is a rejection.
fn classify_processing(body: &str) -> ProcessingOutcome {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return ProcessingOutcome::Failure(body.trim().to_string());
    };

    let status_code = value
        .get("status_code")
        .map(render_json)
        .unwrap_or_default();
    if status_code == "0" {
        return ProcessingOutcome::Success;
    }

    let message = value
        .get("err_msg")
        .filter(|v| !v.is_null())
        .map(render_json)
        .unwrap_or_else(|| value.to_string());
    ProcessingOutcome::Failure(message)
}

// Strings render bare (no surrounding quotes); everything else as JSON.
fn render_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_clean_response_is_accepted() {
        assert_eq!(auth_rejection(r#"{"user": "supplier1"}"#).unwrap(), None);
        assert_eq!(auth_rejection(r#"{"errors": null}"#).unwrap(), None);
        assert_eq!(auth_rejection(r#"{"errors": ""}"#).unwrap(), None);
        assert_eq!(auth_rejection(r#"{"errors": []}"#).unwrap(), None);
        assert_eq!(auth_rejection(r#"{"errors": {}}"#).unwrap(), None);
    }

    #[test]
    fn test_auth_errors_field_is_a_rejection() {
        assert_eq!(
            auth_rejection(r#"{"errors": "bad password"}"#).unwrap(),
            Some("bad password".to_string())
        );
        assert_eq!(
            auth_rejection(r#"{"errors": ["bad password"]}"#).unwrap(),
            Some(r#"["bad password"]"#.to_string())
        );
    }

    #[test]
    fn test_auth_non_json_body_is_an_error() {
        assert!(auth_rejection("<html>login page</html>").is_err());
    }

    #[test]
    fn test_upload_token_extracted_verbatim() {
        let token =
            parse_upload_token(r#"{"data": {"file_name": "tmp_20240101_0001.xls"}}"#).unwrap();
        assert_eq!(token.as_str(), "tmp_20240101_0001.xls");
    }

    #[test]
    fn test_upload_response_without_token_is_malformed() {
        assert!(parse_upload_token(r#"{"data": {}}"#).is_none());
        assert!(parse_upload_token(r#"{"file_name": "x.xls"}"#).is_none());
        assert!(parse_upload_token("Internal Error").is_none());
    }

    #[test]
    fn test_processing_status_zero_is_success() {
        // Numeric and string forms both count as "0".
        assert_eq!(
            classify_processing(r#"{"status_code": 0, "rows": 12}"#),
            ProcessingOutcome::Success
        );
        assert_eq!(
            classify_processing(r#"{"status_code": "0"}"#),
            ProcessingOutcome::Success
        );
    }

    #[test]
    fn test_processing_nonzero_status_uses_err_msg() {
        assert_eq!(
            classify_processing(r#"{"status_code": 1, "err_msg": "bad column"}"#),
            ProcessingOutcome::Failure("bad column".to_string())
        );
    }

    #[test]
    fn test_processing_nonzero_status_without_err_msg_carries_body() {
        let outcome = classify_processing(r#"{"status_code": 7}"#);
        assert_eq!(
            outcome,
            ProcessingOutcome::Failure(r#"{"status_code":7}"#.to_string())
        );
    }

    #[test]
    fn test_processing_non_json_body_is_failure() {
        assert_eq!(
            classify_processing("Internal Error"),
            ProcessingOutcome::Failure("Internal Error".to_string())
        );
    }

    #[test]
    fn test_processing_missing_status_code_is_failure() {
        assert!(matches!(
            classify_processing(r#"{"ok": true}"#),
            ProcessingOutcome::Failure(_)
        ));
    }

    #[test]
    fn test_endpoint_concatenation_ignores_trailing_slash() {
        // Url::parse normalizes "https://host" to "https://host/".
        let base = Url::parse("https://host").unwrap();
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), AUTH_ENDPOINT);
        assert_eq!(joined, "https://host/auth-ajax_login");
    }
}
