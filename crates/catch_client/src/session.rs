use std::time::Duration;

use catch_core::config::BackendConfig;
use catch_core::domain::{QueryRequest, QueryResult};

use crate::backend::{BackendClient, BackendStatus, HealthProbe};
use crate::dispatch::Dispatcher;
use crate::wake::{ensure_awake, WakeOutcome};

/// Per-run bootstrap: one status probe, at most one wake-up wait, then any number of
/// dispatches sharing a single connection pool.
pub struct Session {
    client: BackendClient,
    dispatcher: Dispatcher,
    status: BackendStatus,
    wake: Option<WakeOutcome>,
}

impl Session {
    /// Build the client and record the backend status. Does not wait for a cold start.
    pub fn connect(config: BackendConfig) -> Self {
        let client = BackendClient::new(config);
        let status = client.probe(client.config().timeouts.status_probe);
        tracing::info!(base_url = %client.base_url(), %status, "backend status");
        let dispatcher = Dispatcher::with_client(client.clone());
        Self {
            client,
            dispatcher,
            status,
            wake: None,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn status(&self) -> &BackendStatus {
        &self.status
    }

    /// Run the wake-up step the first time only; later calls return the first outcome
    /// without probing or waiting again.
    pub fn wake_once<F>(&mut self, wait: F) -> WakeOutcome
    where
        F: FnOnce(Duration),
    {
        if let Some(outcome) = self.wake {
            return outcome;
        }
        let outcome = ensure_awake(&self.client, &self.client.config().timeouts, wait);
        self.wake = Some(outcome);
        outcome
    }

    pub fn dispatch(&self, request: &QueryRequest) -> QueryResult {
        self.dispatcher.dispatch(request)
    }
}
