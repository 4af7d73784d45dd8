use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

pub mod filter;

pub use filter::{build_filter_predicate, FilterField, FilterPredicate};

pub const ALPHA_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const TOP_K_RANGE: RangeInclusive<u32> = 1..=20;
pub const DEFAULT_ALPHA: f64 = 0.45;
pub const DEFAULT_TOP_K: u32 = 5;

pub const QUERY_EMPTY: &str = "QUERY_EMPTY";

/// Embedding models the backend accepts for retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbedModel {
    #[default]
    #[serde(rename = "intfloat/e5-large-v2")]
    E5LargeV2,
    #[serde(rename = "all-MiniLM-L6-v2")]
    MiniLmL6V2,
}

impl EmbedModel {
    pub const ALL: [EmbedModel; 2] = [EmbedModel::E5LargeV2, EmbedModel::MiniLmL6V2];

    pub fn as_str(self) -> &'static str {
        match self {
            EmbedModel::E5LargeV2 => "intfloat/e5-large-v2",
            EmbedModel::MiniLmL6V2 => "all-MiniLM-L6-v2",
        }
    }
}

impl fmt::Display for EmbedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedModel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmbedModel::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| {
                AppError::new("QUERY_UNKNOWN_EMBED_MODEL", "Unknown embedding model")
                    .with_details(format!("model={s}; expected one of {}", join_names(&EmbedModel::ALL)))
            })
    }
}

/// Language models the backend accepts for answer generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LlmModel {
    #[default]
    #[serde(rename = "meta-llama/Meta-Llama-3-8B-Instruct")]
    Llama3_8bInstruct,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl LlmModel {
    pub const ALL: [LlmModel; 2] = [LlmModel::Llama3_8bInstruct, LlmModel::Gpt4oMini];

    pub fn as_str(self) -> &'static str {
        match self {
            LlmModel::Llama3_8bInstruct => "meta-llama/Meta-Llama-3-8B-Instruct",
            LlmModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for LlmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmModel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LlmModel::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| {
                AppError::new("QUERY_UNKNOWN_LLM_MODEL", "Unknown LLM model")
                    .with_details(format!("model={s}; expected one of {}", join_names(&LlmModel::ALL)))
            })
    }
}

fn join_names<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sidebar-style selections that apply to the next submitted query.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySelection {
    pub embed_model: EmbedModel,
    pub llm_model: LlmModel,
    pub author: Option<String>,
    pub status: Option<String>,
    pub alpha: f64,
    pub top_k: u32,
}

impl Default for QuerySelection {
    fn default() -> Self {
        Self {
            embed_model: EmbedModel::default(),
            llm_model: LlmModel::default(),
            author: None,
            status: None,
            alpha: DEFAULT_ALPHA,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl QuerySelection {
    pub fn validate(&self) -> Result<(), AppError> {
        // `contains` is false for NaN, so NaN is rejected here as well.
        if !ALPHA_RANGE.contains(&self.alpha) {
            return Err(AppError::new(
                "QUERY_ALPHA_OUT_OF_RANGE",
                "alpha must be between 0.0 and 1.0",
            )
            .with_details(format!("alpha={}", self.alpha)));
        }
        if !TOP_K_RANGE.contains(&self.top_k) {
            return Err(AppError::new(
                "QUERY_TOP_K_OUT_OF_RANGE",
                "top_k must be between 1 and 20",
            )
            .with_details(format!("top_k={}", self.top_k)));
        }
        Ok(())
    }
}

/// Body of `POST /ask`. Built fresh for every submission and never persisted.
///
/// `filters` serializes as JSON `null` when no filter is selected; it is never an empty object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub top_k: u32,
    pub alpha: f64,
    pub filters: Option<FilterPredicate>,
    pub embed_model: EmbedModel,
    pub llm_model: LlmModel,
}

impl QueryRequest {
    /// Build a request from raw query text and the current selections.
    ///
    /// The query is trimmed; blank input is rejected so that no request is ever sent for it.
    pub fn new(query: &str, selection: &QuerySelection) -> Result<Self, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::new(QUERY_EMPTY, "Please enter a query."));
        }
        selection.validate()?;

        Ok(Self {
            query: query.to_string(),
            top_k: selection.top_k,
            alpha: selection.alpha,
            filters: build_filter_predicate(
                selection.author.as_deref(),
                selection.status.as_deref(),
            ),
            embed_model: selection.embed_model,
            llm_model: selection.llm_model,
        })
    }
}

/// Uniform result shape handed to the presentation layer. Both fields are always populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub chunks: Vec<Chunk>,
}

impl QueryResult {
    /// A result that carries only a message (configuration or failure diagnostics).
    pub fn message(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            chunks: Vec::new(),
        }
    }
}

/// A retrieved text fragment plus metadata, displayed verbatim.
///
/// Every field is optional: the backend's chunk shape is not validated, and display code
/// substitutes placeholders for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub combined_text: Option<String>,
}

impl Chunk {
    /// Decode one chunk entry. Entries that are not objects become an empty chunk.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Chunk::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Decode a `chunks` field without rejecting the surrounding response.
///
/// A missing, null or non-array field yields `None`; each array entry goes through
/// [`Chunk::from_value`] so a malformed entry never costs the answer.
pub fn lenient_chunks<'de, D>(deserializer: D) -> Result<Option<Vec<Chunk>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => Some(items.into_iter().map(Chunk::from_value).collect()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
