//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `HRIS_API_URL` - Backend REST base URL (default: `http://localhost:5000/api`)
//! - `HRIS_ASSET_URL` - Base URL for uploaded profile photos and company logos
//!   (default: the API URL with a trailing `/api` removed)
//! - `HRIS_STATE_FILE` - Where the durable session is kept (default: `.hris-session.json`)
//! - `HRIS_POLL_INTERVAL_SECS` - Sidebar badge refresh period (default: 120)
//! - `HRIS_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `HRIS_GOOGLE_CLIENT_ID` - OAuth client ID used to obtain Google ID tokens

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_STATE_FILE: &str = ".hris-session.json";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Backend REST base URL, without trailing slash.
    pub api_url: Url,
    /// Base URL for `/public/{profiles,logos}/…` assets.
    pub asset_url: Url,
    /// Durable session file used by the file-backed store.
    pub state_file: PathBuf,
    /// Sidebar badge polling period.
    pub poll_interval: Duration,
    /// Timeout applied to every backend request.
    pub request_timeout: Duration,
    /// Google OAuth client ID, if Google sign-in is enabled.
    pub google_client_id: Option<String>,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration pointing at `api_url`, everything else defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not an absolute URL.
    pub fn for_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = api_url.to_owned();
        Self::from_lookup(move |key| (key == "HRIS_API_URL").then(|| api_url.clone()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_url(
            "HRIS_API_URL",
            &lookup("HRIS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let asset_url = match lookup("HRIS_ASSET_URL") {
            Some(raw) => parse_url("HRIS_ASSET_URL", &raw)?,
            None => default_asset_url(&api_url),
        };
        let state_file = lookup("HRIS_STATE_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_FILE), PathBuf::from);
        let poll_interval = Duration::from_secs(parse_secs(
            "HRIS_POLL_INTERVAL_SECS",
            lookup("HRIS_POLL_INTERVAL_SECS"),
            DEFAULT_POLL_INTERVAL_SECS,
        )?);
        let request_timeout = Duration::from_secs(parse_secs(
            "HRIS_REQUEST_TIMEOUT_SECS",
            lookup("HRIS_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let google_client_id = lookup("HRIS_GOOGLE_CLIENT_ID").filter(|id| !id.is_empty());

        Ok(Self {
            api_url,
            asset_url,
            state_file,
            poll_interval,
            request_timeout,
            google_client_id,
        })
    }

    /// The Google OAuth client ID that ID tokens must be issued for.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when Google sign-in is not enabled.
    pub fn require_google_client_id(&self) -> Result<&str, ConfigError> {
        self.google_client_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("HRIS_GOOGLE_CLIENT_ID".to_string()))
    }
}

/// Parse an absolute URL, rejecting relative or non-HTTP values.
fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var.to_string(),
            format!("unsupported scheme {:?}", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_secs(var: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            var.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::InvalidEnvVar(var.to_string(), e.to_string())),
    }
}

/// Assets are served next to the API, outside its `/api` prefix.
fn default_asset_url(api_url: &Url) -> Url {
    let mut asset = api_url.clone();
    let trimmed = api_url
        .path()
        .trim_end_matches('/')
        .strip_suffix("/api")
        .unwrap_or_else(|| api_url.path().trim_end_matches('/'))
        .to_string();
    asset.set_path(&trimmed);
    asset
}
