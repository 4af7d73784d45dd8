use std::fmt;
use std::time::Duration;

use catch_core::config::BackendConfig;
use serde::Serialize;

/// Result of a single `GET /health` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BackendStatus {
    Connected,
    Error { status: u16 },
    Offline { reason: String },
}

impl BackendStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, BackendStatus::Connected)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Connected => f.write_str("Connected"),
            BackendStatus::Error { status } => write!(f, "Error (status {status})"),
            BackendStatus::Offline { .. } => f.write_str("Offline"),
        }
    }
}

/// Liveness probe seam; the wake-up step only needs this.
pub trait HealthProbe {
    fn probe(&self, timeout: Duration) -> BackendStatus;
}

/// Blocking HTTP client for the RAG backend.
///
/// Holds one `ureq::Agent` so connections are pooled across calls made through the same
/// client (and its clones).
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    agent: ureq::Agent,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("catch/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { config, agent }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub(crate) fn agent(&self) -> &ureq::Agent {
        &self.agent
    }
}

impl HealthProbe for BackendClient {
    fn probe(&self, timeout: Duration) -> BackendStatus {
        if self.base_url().is_empty() {
            return BackendStatus::Offline {
                reason: "backend URL is empty".to_string(),
            };
        }

        let url = self.config.endpoint("health");
        let status = match self.agent.get(&url).timeout(timeout).call() {
            Ok(r) if r.status() == 200 => BackendStatus::Connected,
            Ok(r) => BackendStatus::Error { status: r.status() },
            Err(ureq::Error::Status(code, _)) => BackendStatus::Error { status: code },
            Err(ureq::Error::Transport(t)) => BackendStatus::Offline {
                reason: t.to_string(),
            },
        };
        tracing::debug!(%url, %status, "health probe");
        status
    }
}
