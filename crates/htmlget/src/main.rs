use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use htmlget_fetch::{AgentPool, DocumentLoader, FetchError};
use tracing::debug;

use crate::cli::App;
use crate::config::Config;

mod cli;
mod config;
mod logging;

fn main() -> ExitCode {
    let app = App::parse();
    match run(&app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(app: &App) -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to read configuration")?;
    logging::init(&config.log_filter)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let document = runtime.block_on(async {
        let pool = AgentPool::shared(config.pool())?;
        DocumentLoader::with_pool(pool).get_document(&app.url).await
    })?;
    debug!(encoding = %document.encoding, had_errors = document.had_errors, "document loaded");

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", document.text).context("failed to write document")?;
    Ok(())
}

/// Failures go to stderr: the structured dump when it is a fetch error,
/// then the message chain.
fn report(err: &anyhow::Error) {
    if let Some(fetch) = err.downcast_ref::<FetchError>() {
        eprintln!("{fetch:#?}");
    }
    eprintln!("error: {err:#}");
}
