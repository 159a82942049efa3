//! Configuration loading
//!
//! The config file is a flat JSON object; the environment can override the
//! base URL and is the only source for credentials and Telegram settings.
//! Everything ambient is read here, once, at process start - stage logic
//! never touches the environment.

use crate::error::ConfigError;
use crate::types::{ColumnMapping, Credentials};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const ENV_BASE_URL: &str = "BASE_URL";
const ENV_LOGIN: &str = "LOGIN";
const ENV_PASSWORD: &str = "PASSWORD";
const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
const ENV_BOT_CHAT_ID: &str = "BOT_CHAT_ID";
const ENV_BOT_THREAD_ID: &str = "BOT_THREAD_ID";

/// On-disk shape of the config file
#[derive(Debug, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    confirmation_file_path: Option<PathBuf>,
    #[serde(flatten)]
    columns: ColumnMapping,
}

/// Resolved run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Portal host all endpoints are appended to
    pub base_url: Url,
    /// Spreadsheet path from the config file, if any
    pub confirmation_file_path: Option<PathBuf>,
    /// Column indices forwarded to the processing call
    pub columns: ColumnMapping,
}

impl Config {
    /// Load and resolve configuration from a JSON file
    ///
    /// `BASE_URL` in the environment takes precedence over the file's
    /// `base_url` field.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = serde_json::from_str(&raw)?;
        Self::resolve(file, env::var(ENV_BASE_URL).ok())
    }

    fn resolve(file: ConfigFile, env_base_url: Option<String>) -> Result<Self, ConfigError> {
        let base_url = env_base_url
            .or(file.base_url)
            .ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url,
            source,
        })?;

        Ok(Self {
            base_url,
            confirmation_file_path: file.confirmation_file_path,
            columns: file.columns,
        })
    }

    /// Pick the spreadsheet path for this run
    ///
    /// Precedence: explicit CLI argument, then the config file field.
    /// Failing here keeps the run from ever opening a session.
    pub fn resolve_file_path(&self, override_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        self.confirmation_file_path
            .clone()
            .ok_or(ConfigError::MissingFilePath)
    }
}

/// Read portal credentials from `LOGIN` / `PASSWORD`
pub fn credentials_from_env() -> Result<Credentials, ConfigError> {
    let login = env::var(ENV_LOGIN).map_err(|_| ConfigError::MissingEnv(ENV_LOGIN))?;
    let password = env::var(ENV_PASSWORD).map_err(|_| ConfigError::MissingEnv(ENV_PASSWORD))?;
    Ok(Credentials { login, password })
}

/// Telegram bot settings for the terminal notification
#[derive(Debug, Clone)]
pub struct NotifierSettings {
    /// Bot API token
    pub token: String,
    /// Target chat
    pub chat_id: String,
    /// Optional forum thread within the chat
    pub thread_id: Option<String>,
}

impl NotifierSettings {
    /// Read settings from `BOT_TOKEN` / `BOT_CHAT_ID` / `BOT_THREAD_ID`
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var(ENV_BOT_TOKEN).map_err(|_| ConfigError::MissingEnv(ENV_BOT_TOKEN))?;
        let chat_id =
            env::var(ENV_BOT_CHAT_ID).map_err(|_| ConfigError::MissingEnv(ENV_BOT_CHAT_ID))?;
        let thread_id = env::var(ENV_BOT_THREAD_ID).ok();
        Ok(Self {
            token,
            chat_id,
            thread_id,
        })
    }
}
