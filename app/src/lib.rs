use std::io::{self, BufRead, Write};
use std::path::Path;

use catch_client::Session;
use catch_core::config::BackendConfig;
use catch_core::domain::{QueryRequest, QuerySelection, QUERY_EMPTY};
use catch_core::error::AppError;
use catch_core::lookups::FilterOptions;

pub mod cli;
pub mod render;

use cli::{Cli, Command, SelectionArgs};

/// Resolve the sidebar-style selections against the loaded lookup tables.
pub fn selection_from_args(
    args: &SelectionArgs,
    options: &FilterOptions,
) -> Result<QuerySelection, AppError> {
    let selection = QuerySelection {
        embed_model: args.embed_model,
        llm_model: args.llm_model,
        author: options.resolve_author(args.author.as_deref())?,
        status: options.resolve_status(args.status.as_deref())?,
        alpha: args.alpha,
        top_k: args.top_k,
    };
    selection.validate()?;
    Ok(selection)
}

/// Status probe plus the one-time cold-start wait. Diagnostics go to stderr.
fn start_session(config: BackendConfig) -> Result<Session, AppError> {
    let mut session = Session::connect(config);
    let mut stderr = io::stderr().lock();
    render::render_status(&mut stderr, session.base_url(), session.status())?;
    let mut warned = Ok(());
    session.wake_once(|delay| {
        warned = render::render_wake_warning(&mut stderr);
        std::thread::sleep(delay);
    });
    warned?;
    Ok(session)
}

/// Submit one query: blank input is warned about and never sent.
fn submit(
    session: &Session,
    query: &str,
    selection: &QuerySelection,
    json: bool,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let request = match QueryRequest::new(query, selection) {
        Ok(r) => r,
        Err(e) if e.code == QUERY_EMPTY => {
            eprintln!("{}", render::EMPTY_QUERY_WARNING);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let result = session.dispatch(&request);
    if json {
        render::render_json(out, &result)?;
    } else {
        render::render_result(out, &result)?;
    }
    Ok(())
}

fn ask(secrets: &Path, query: &str, selection: &QuerySelection, json: bool) -> Result<(), AppError> {
    if query.trim().is_empty() {
        eprintln!("{}", render::EMPTY_QUERY_WARNING);
        return Ok(());
    }
    let session = start_session(BackendConfig::load(secrets))?;
    submit(&session, query, selection, json, &mut io::stdout().lock())
}

fn interactive(secrets: &Path, selection: &QuerySelection, json: bool) -> Result<(), AppError> {
    let session = start_session(BackendConfig::load(secrets))?;
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    eprintln!("Your query (one per line, Ctrl-D to quit)");
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| {
            AppError::new("INPUT_READ_FAILED", "Failed to read query from stdin")
                .with_details(e.to_string())
        })?;
        submit(&session, &line, selection, json, &mut out)?;
        out.flush().map_err(|e| {
            AppError::new("OUTPUT_WRITE_FAILED", "Failed to write output").with_details(e.to_string())
        })?;
    }
    Ok(())
}

fn health(secrets: &Path) -> Result<(), AppError> {
    let session = Session::connect(BackendConfig::load(secrets));
    render::render_status(&mut io::stdout().lock(), session.base_url(), session.status())
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Ask(args) => {
            let options = FilterOptions::load(&cli.assets);
            let selection = selection_from_args(&args.selection, &options)?;
            ask(&cli.secrets, &args.query, &selection, args.selection.json)
        }
        Command::Interactive(args) => {
            let options = FilterOptions::load(&cli.assets);
            let selection = selection_from_args(&args, &options)?;
            interactive(&cli.secrets, &selection, args.json)
        }
        Command::Health => health(&cli.secrets),
        Command::Filters => {
            let options = FilterOptions::load(&cli.assets);
            render::render_filters(&mut io::stdout().lock(), &options)
        }
        Command::Models => render::render_models(&mut io::stdout().lock()),
    }
}
