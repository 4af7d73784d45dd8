//! Terminal rendering of results, status and option lists.

use std::io::{self, Write};

use catch_client::wake::WAKE_WARNING;
use catch_client::BackendStatus;
use catch_core::domain::{Chunk, EmbedModel, LlmModel, QueryResult};
use catch_core::error::AppError;
use catch_core::lookups::FilterOptions;

pub const EMPTY_QUERY_WARNING: &str = "⚠️ Please enter a query.";
pub const NO_CHUNKS: &str = "ℹ️ No chunks retrieved.";
pub const SNIPPET_CHARS: usize = 500;

const NA: &str = "N/A";

fn io_err(e: io::Error) -> AppError {
    AppError::new("OUTPUT_WRITE_FAILED", "Failed to write output").with_details(e.to_string())
}

/// First `max_chars` characters of the chunk text, always followed by `...`.
pub fn snippet(text: Option<&str>, max_chars: usize) -> String {
    let text = text.unwrap_or("");
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

pub fn render_chunk(out: &mut impl Write, chunk: &Chunk) -> Result<(), AppError> {
    let field = |v: &Option<String>| v.as_deref().unwrap_or(NA).to_string();
    writeln!(out, "Chunk ID: {}", field(&chunk.id)).map_err(io_err)?;
    writeln!(out, "Topic: {}", field(&chunk.topic)).map_err(io_err)?;
    writeln!(out, "Author: {}", field(&chunk.author)).map_err(io_err)?;
    writeln!(out, "Status: {}", field(&chunk.status)).map_err(io_err)?;
    writeln!(out, "Score: {:.2}", chunk.score.unwrap_or(0.0)).map_err(io_err)?;
    writeln!(
        out,
        "Snippet: {}",
        snippet(chunk.combined_text.as_deref(), SNIPPET_CHARS)
    )
    .map_err(io_err)?;
    Ok(())
}

pub fn render_result(out: &mut impl Write, result: &QueryResult) -> Result<(), AppError> {
    writeln!(out, "### 🔎 Answer").map_err(io_err)?;
    writeln!(out, "{}", result.answer).map_err(io_err)?;
    writeln!(out).map_err(io_err)?;
    writeln!(out, "### 📚 Retrieved Chunks").map_err(io_err)?;

    if result.chunks.is_empty() {
        writeln!(out, "{NO_CHUNKS}").map_err(io_err)?;
        return Ok(());
    }
    for chunk in &result.chunks {
        writeln!(out, "{}", "-".repeat(40)).map_err(io_err)?;
        render_chunk(out, chunk)?;
    }
    Ok(())
}

pub fn render_json(out: &mut impl Write, result: &QueryResult) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(result).map_err(|e| {
        AppError::new("OUTPUT_ENCODE_FAILED", "Failed to encode result as JSON")
            .with_details(e.to_string())
    })?;
    writeln!(out, "{text}").map_err(io_err)
}

pub fn render_status(
    out: &mut impl Write,
    base_url: &str,
    status: &BackendStatus,
) -> Result<(), AppError> {
    writeln!(out, "🔗 Backend Status").map_err(io_err)?;
    match status {
        BackendStatus::Connected => {
            writeln!(out, "✅ Connected").map_err(io_err)?;
            writeln!(out, "Backend: {base_url}").map_err(io_err)?;
        }
        BackendStatus::Error { status } => {
            writeln!(out, "❌ Error (HTTP {status})").map_err(io_err)?;
        }
        BackendStatus::Offline { reason } => {
            writeln!(out, "❌ Offline").map_err(io_err)?;
            writeln!(out, "⏳ Backend may be starting... ({reason})").map_err(io_err)?;
        }
    }
    Ok(())
}

pub fn render_wake_warning(out: &mut impl Write) -> Result<(), AppError> {
    writeln!(out, "{WAKE_WARNING}").map_err(io_err)
}

pub fn render_filters(out: &mut impl Write, options: &FilterOptions) -> Result<(), AppError> {
    writeln!(out, "Author:").map_err(io_err)?;
    for a in &options.authors {
        writeln!(out, "  {a}").map_err(io_err)?;
    }
    writeln!(out, "Status:").map_err(io_err)?;
    for s in &options.statuses {
        writeln!(out, "  {s}").map_err(io_err)?;
    }
    Ok(())
}

pub fn render_models(out: &mut impl Write) -> Result<(), AppError> {
    writeln!(out, "🧩 Embedding model").map_err(io_err)?;
    for m in EmbedModel::ALL {
        writeln!(out, "  {m}").map_err(io_err)?;
    }
    writeln!(out, "🤖 LLM model").map_err(io_err)?;
    for m in LlmModel::ALL {
        writeln!(out, "  {m}").map_err(io_err)?;
    }
    Ok(())
}
