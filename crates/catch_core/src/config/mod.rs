//! Backend configuration resolution.
//!
//! The base URL comes from the secrets file first, then the `RAG_API_BASE` environment
//! variable, then [`DEFAULT_BACKEND_URL`]. The default is a placeholder: a config that
//! resolves to it is treated as "not configured" by the dispatcher.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_BACKEND_URL: &str = "https://rag-backend-llnz.onrender.com";
pub const BACKEND_URL_ENV: &str = "RAG_API_BASE";
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Time bounds for every backend interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Bound on the `POST /ask` call.
    pub ask: Duration,
    /// Bound on the status probe shown to the user.
    pub status_probe: Duration,
    /// Bound on the startup probe that decides whether to wait for a cold start.
    pub wake_probe: Duration,
    /// One-time blocking wait when the startup probe fails.
    pub wake_delay: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            ask: Duration::from_secs(180),
            status_probe: Duration::from_secs(30),
            wake_probe: Duration::from_secs(60),
            wake_delay: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimeoutOverrides {
    pub ask_secs: Option<u64>,
    pub status_probe_secs: Option<u64>,
    pub wake_probe_secs: Option<u64>,
    pub wake_delay_secs: Option<u64>,
}

impl TimeoutOverrides {
    pub fn apply(&self, base: Timeouts) -> Timeouts {
        Timeouts {
            ask: self.ask_secs.map(Duration::from_secs).unwrap_or(base.ask),
            status_probe: self
                .status_probe_secs
                .map(Duration::from_secs)
                .unwrap_or(base.status_probe),
            wake_probe: self
                .wake_probe_secs
                .map(Duration::from_secs)
                .unwrap_or(base.wake_probe),
            wake_delay: self
                .wake_delay_secs
                .map(Duration::from_secs)
                .unwrap_or(base.wake_delay),
        }
    }
}

/// Contents of the TOML secrets file.
///
/// ```toml
/// RAG_API_BASE = "https://my-backend.example.com"
///
/// [timeouts]
/// ask_secs = 180
/// wake_delay_secs = 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Secrets {
    #[serde(rename = "RAG_API_BASE", default)]
    pub rag_api_base: Option<String>,
    #[serde(default)]
    pub timeouts: TimeoutOverrides,
}

/// Read the secrets file. A missing file is not an error and yields empty secrets.
pub fn read_secrets(path: &Path) -> Result<Secrets, AppError> {
    if !path.exists() {
        return Ok(Secrets::default());
    }
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new("CONFIG_SECRETS_READ_FAILED", "Failed to read secrets file")
            .with_details(format!("path={}; err={e}", path.display()))
    })?;
    toml::from_str(&text).map_err(|e| {
        AppError::new("CONFIG_SECRETS_INVALID", "Secrets file is not valid TOML")
            .with_details(format!("path={}; err={e}", path.display()))
    })
}

/// Pick the first non-blank candidate in precedence order, falling back to the placeholder.
pub fn resolve_base_url(secret: Option<&str>, env: Option<&str>) -> String {
    [secret, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_BACKEND_URL)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
    pub timeouts: Timeouts,
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Resolve from already-read secrets and the environment variable value.
    pub fn resolve(secrets: &Secrets, env_value: Option<&str>) -> Self {
        let url = resolve_base_url(secrets.rag_api_base.as_deref(), env_value);
        Self::new(&url).with_timeouts(secrets.timeouts.apply(Timeouts::default()))
    }

    /// Resolve from the secrets file at `secrets_path` and the process environment.
    ///
    /// An unreadable or malformed secrets file is logged and skipped, so resolution
    /// falls through to the environment.
    pub fn load(secrets_path: &Path) -> Self {
        let secrets = match read_secrets(secrets_path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring secrets file");
                Secrets::default()
            }
        };
        let env_value = std::env::var(BACKEND_URL_ENV).ok();
        let config = Self::resolve(&secrets, env_value.as_deref());
        tracing::debug!(base_url = %config.base_url, "resolved backend config");
        config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// False when the URL is blank or still the placeholder default.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && self.base_url != DEFAULT_BACKEND_URL
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
