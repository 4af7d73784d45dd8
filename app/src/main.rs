use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catch_lib::cli::Cli;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    // Optional: a missing .env is fine, RAG_API_BASE may come from the shell or secrets file.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: ignoring unreadable .env: {e}");
        }
    }
    init_tracing();

    let cli = Cli::parse();
    tracing::debug!(?cli, "starting");

    match catch_lib::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = %e.code, details = ?e.details, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
