use catch_core::config::BackendConfig;
use catch_core::domain::{QueryRequest, QueryResult};
use catch_core::error::AppError;

use crate::ask::{AskBackend, HttpAsk, BACKEND_HTTP_ERROR, BACKEND_UNREACHABLE};
use crate::backend::BackendClient;

pub const NOT_CONFIGURED_ANSWER: &str =
    "⚠️ Backend URL not configured. Please set RAG_API_BASE environment variable.";
pub const NO_ANSWER: &str = "No answer returned";

/// Turns a validated [`QueryRequest`] into a displayable [`QueryResult`].
///
/// Never fails: configuration, HTTP, transport and unexpected errors all come back as a
/// result whose answer describes the problem and whose chunk list is empty. Each call makes
/// at most one backend request and keeps no state between calls.
pub struct Dispatcher {
    config: BackendConfig,
    backend: Box<dyn AskBackend>,
}

impl Dispatcher {
    pub fn new(config: BackendConfig) -> Self {
        let client = BackendClient::new(config.clone());
        Self::with_client(client)
    }

    /// Share an existing client (and its connection pool).
    pub fn with_client(client: BackendClient) -> Self {
        let config = client.config().clone();
        Self::with_backend(config, Box::new(HttpAsk::new(client)))
    }

    pub fn with_backend(config: BackendConfig, backend: Box<dyn AskBackend>) -> Self {
        Self { config, backend }
    }

    pub fn dispatch(&self, request: &QueryRequest) -> QueryResult {
        if !self.config.is_configured() {
            tracing::warn!(base_url = %self.config.base_url(), "backend URL not configured; skipping request");
            return QueryResult::message(NOT_CONFIGURED_ANSWER);
        }

        match self.backend.ask(request) {
            Ok(body) => QueryResult {
                answer: body.answer.unwrap_or_else(|| NO_ANSWER.to_string()),
                chunks: body.chunks.unwrap_or_default(),
            },
            Err(e) => {
                tracing::warn!(code = %e.code, error = %e, "query failed");
                QueryResult::message(failure_answer(&e, self.config.base_url()))
            }
        }
    }
}

/// Human-readable answer for a failed ask. The error class only shows up in this text.
pub fn failure_answer(err: &AppError, base_url: &str) -> String {
    let detail = err.details.as_deref().unwrap_or(&err.message);
    match err.code.as_str() {
        BACKEND_HTTP_ERROR => {
            format!("⚠️ Backend HTTP error: {}\n\nDetails: {detail}", err.message)
        }
        BACKEND_UNREACHABLE => format!("⚠️ Cannot reach backend at {base_url}: {detail}"),
        _ => format!("⚠️ Unexpected error: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use catch_core::config::DEFAULT_BACKEND_URL;
    use catch_core::domain::{Chunk, QuerySelection};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ask::{AskResponse, BACKEND_UNEXPECTED};

    struct MockBackend {
        out: Result<AskResponse, AppError>,
        calls: Cell<usize>,
    }

    impl MockBackend {
        fn new(out: Result<AskResponse, AppError>) -> Self {
            Self {
                out,
                calls: Cell::new(0),
            }
        }
    }

    impl AskBackend for Rc<MockBackend> {
        fn ask(&self, _request: &QueryRequest) -> Result<AskResponse, AppError> {
            self.calls.set(self.calls.get() + 1);
            self.out.clone()
        }
    }

    fn shared(backend: MockBackend) -> Rc<MockBackend> {
        Rc::new(backend)
    }

    fn request() -> QueryRequest {
        QueryRequest::new("what mentions uploads?", &QuerySelection::default()).unwrap()
    }

    #[test]
    fn unconfigured_url_never_calls_backend() {
        for url in ["", DEFAULT_BACKEND_URL] {
            let backend = shared(MockBackend::new(Ok(AskResponse::default())));
            let d = Dispatcher::with_backend(BackendConfig::new(url), Box::new(Rc::clone(&backend)));
            let res = d.dispatch(&request());
            assert_eq!(res.answer, NOT_CONFIGURED_ANSWER);
            assert!(res.chunks.is_empty());
            assert_eq!(backend.calls.get(), 0);
        }
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let backend = shared(MockBackend::new(Ok(AskResponse::default())));
        let d = Dispatcher::with_backend(BackendConfig::new("http://rag.test"), Box::new(Rc::clone(&backend)));
        let res = d.dispatch(&request());
        assert_eq!(res, QueryResult::message(NO_ANSWER));
        assert_eq!(backend.calls.get(), 1);
    }

    #[test]
    fn success_passes_chunks_through() {
        let chunk = Chunk {
            id: Some("c1".to_string()),
            score: Some(0.87),
            ..Chunk::default()
        };
        let backend = shared(MockBackend::new(Ok(AskResponse {
            answer: Some("42".to_string()),
            chunks: Some(vec![chunk.clone()]),
        })));
        let d = Dispatcher::with_backend(BackendConfig::new("http://rag.test"), Box::new(Rc::clone(&backend)));
        let res = d.dispatch(&request());
        assert_eq!(res.answer, "42");
        assert_eq!(res.chunks, vec![chunk]);
    }

    #[test]
    fn failures_become_messages() {
        let http = AppError::new(
            BACKEND_HTTP_ERROR,
            "500 Internal Server Error for url: http://rag.test/ask",
        )
        .with_details("boom");
        assert_eq!(
            failure_answer(&http, "http://rag.test"),
            "⚠️ Backend HTTP error: 500 Internal Server Error for url: http://rag.test/ask\n\nDetails: boom"
        );

        let transport = AppError::new(BACKEND_UNREACHABLE, "x").with_details("Connection refused");
        assert_eq!(
            failure_answer(&transport, "http://rag.test"),
            "⚠️ Cannot reach backend at http://rag.test: Connection refused"
        );

        let other = AppError::new(BACKEND_UNEXPECTED, "Failed to decode backend response");
        assert_eq!(
            failure_answer(&other, "http://rag.test"),
            "⚠️ Unexpected error: Failed to decode backend response"
        );

        let backend = shared(MockBackend::new(Err(transport)));
        let d = Dispatcher::with_backend(BackendConfig::new("http://rag.test"), Box::new(Rc::clone(&backend)));
        let res = d.dispatch(&request());
        assert!(res.answer.contains("http://rag.test"));
        assert!(res.chunks.is_empty());
    }
}
