use std::io;

use catch_core::domain::QueryRequest;
use catch_core::error::AppError;

use super::{AskBackend, AskResponse, BACKEND_HTTP_ERROR, BACKEND_UNEXPECTED, BACKEND_UNREACHABLE};
use crate::backend::BackendClient;

#[derive(Debug, Clone)]
pub struct HttpAsk {
    client: BackendClient,
}

impl HttpAsk {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn unreachable(&self, details: String) -> AppError {
        AppError::new(
            BACKEND_UNREACHABLE,
            format!("Failed to reach backend at {}", self.client.base_url()),
        )
        .with_details(details)
        .with_retryable(true)
    }

    /// Read the success body. A stalled or cut-off connection is a transport failure; only a
    /// body that arrived in full but does not decode is unexpected.
    fn read_body(&self, resp: ureq::Response) -> Result<AskResponse, AppError> {
        let text = resp.into_string().map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => self.unreachable(e.to_string()),
            _ => AppError::new(BACKEND_UNEXPECTED, "Failed to read backend response")
                .with_details(e.to_string()),
        })?;
        serde_json::from_str(&text).map_err(|e| {
            AppError::new(BACKEND_UNEXPECTED, "Failed to decode backend response")
                .with_details(e.to_string())
        })
    }
}

impl AskBackend for HttpAsk {
    fn ask(&self, request: &QueryRequest) -> Result<AskResponse, AppError> {
        let url = self.client.config().endpoint("ask");
        let timeout = self.client.config().timeouts.ask;
        tracing::info!(
            %url,
            top_k = request.top_k,
            alpha = request.alpha,
            filtered = request.filters.is_some(),
            embed_model = %request.embed_model,
            llm_model = %request.llm_model,
            "sending query"
        );

        let resp = self
            .client
            .agent()
            .post(&url)
            .timeout(timeout)
            .send_json(request);

        match resp {
            Ok(r) => {
                let status = r.status();
                let body = self.read_body(r)?;
                tracing::info!(
                    status,
                    chunks = body.chunks.as_ref().map_or(0, Vec::len),
                    "backend answered"
                );
                Ok(body)
            }
            Err(ureq::Error::Status(code, r)) => {
                let message = format!("{code} {} for url: {url}", r.status_text());
                let body = r.into_string().unwrap_or_default();
                let details = if body.trim().is_empty() {
                    message.clone()
                } else {
                    body
                };
                Err(AppError::new(BACKEND_HTTP_ERROR, message).with_details(details))
            }
            Err(ureq::Error::Transport(t)) => Err(self.unreachable(t.to_string())),
        }
    }
}
