use std::path::PathBuf;

use catch_core::config::DEFAULT_SECRETS_FILE;
use catch_core::domain::{EmbedModel, LlmModel, ALPHA_RANGE, DEFAULT_ALPHA, DEFAULT_TOP_K};
use clap::{Args, Parser, Subcommand};

/// Ask questions about your user stories through the Catch RAG backend.
#[derive(Parser, Debug)]
#[command(
    name = "catch",
    version,
    about = "Catch – Unified Story Retriever. Multiple management tools in. One RAG pipeline out."
)]
pub struct Cli {
    /// TOML file holding RAG_API_BASE and optional [timeouts]
    #[arg(long, global = true, default_value = DEFAULT_SECRETS_FILE)]
    pub secrets: PathBuf,

    /// Directory containing authors.csv and status.csv
    #[arg(long, global = true, default_value = "assets")]
    pub assets: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one query and print the answer with its retrieved chunks
    Ask(AskArgs),
    /// Read one query per line from stdin until EOF
    Interactive(SelectionArgs),
    /// Check whether the backend is reachable
    Health,
    /// List the author and status filter values
    Filters,
    /// List the embedding and LLM models the backend accepts
    Models,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// e.g. "What user stories mention drag-and-drop uploads?"
    pub query: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Controls that apply to every query of the invocation.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    #[arg(long, default_value_t = EmbedModel::default())]
    pub embed_model: EmbedModel,

    #[arg(long, default_value_t = LlmModel::default())]
    pub llm_model: LlmModel,

    /// Filter by author ("None" for no filter)
    #[arg(long)]
    pub author: Option<String>,

    /// Filter by status ("None" for no filter)
    #[arg(long)]
    pub status: Option<String>,

    /// Hybrid weight forwarded to the backend
    #[arg(long, default_value_t = DEFAULT_ALPHA, value_parser = parse_alpha)]
    pub alpha: f64,

    /// Number of chunks to retrieve
    #[arg(long, default_value_t = DEFAULT_TOP_K, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub top_k: u32,

    /// Print the raw result as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

fn parse_alpha(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if ALPHA_RANGE.contains(&v) {
        Ok(v)
    } else {
        Err(format!("alpha must be between {} and {}", ALPHA_RANGE.start(), ALPHA_RANGE.end()))
    }
}
