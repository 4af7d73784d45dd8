use catch_core::domain::{lenient_chunks, Chunk, QueryRequest};
use catch_core::error::AppError;
use serde::Deserialize;

pub mod http_ask;

pub use http_ask::HttpAsk;

pub const BACKEND_HTTP_ERROR: &str = "BACKEND_HTTP_ERROR";
pub const BACKEND_UNREACHABLE: &str = "BACKEND_UNREACHABLE";
pub const BACKEND_UNEXPECTED: &str = "BACKEND_UNEXPECTED";

/// Raw `POST /ask` success body. Missing or null fields stay `None`; the dispatcher applies
/// the display defaults. Unknown fields are ignored, and a malformed chunk entry becomes an
/// empty chunk instead of failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_chunks")]
    pub chunks: Option<Vec<Chunk>>,
}

/// One question, one answer. Failure codes:
/// - `BACKEND_HTTP_ERROR`: non-success status; message names status and URL, details hold the body.
/// - `BACKEND_UNREACHABLE`: DNS, refused connection, timeout.
/// - `BACKEND_UNEXPECTED`: anything else, e.g. an undecodable body.
pub trait AskBackend {
    fn ask(&self, request: &QueryRequest) -> Result<AskResponse, AppError>;
}
