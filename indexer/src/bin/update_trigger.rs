//! `update-trigger` entrypoint.
//!
//! Serves `/update`, which reruns the index command and the packaging
//! command. Runs until interrupted.

use clap::Parser;
use release_catalog_indexer::cli::TriggerCli;
use release_catalog_indexer::error::Result;
use release_catalog_indexer::logging::init_logging;
use release_catalog_indexer::trigger::{SystemCommandExecutor, TriggerState, serve};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    init_logging();
    let cli = TriggerCli::parse();
    if let Err(err) = run(&cli).await {
        let mut stderr = std::io::stderr();
        if writeln!(stderr, "Unable to serve update trigger: {err}").is_err() {
            // Best-effort reporting; ignore write failures.
        }
        std::process::exit(1);
    }
}

async fn run(cli: &TriggerCli) -> Result<()> {
    let state = TriggerState::from_command_lines(
        Arc::new(SystemCommandExecutor),
        &cli.index_command,
        &cli.package_command,
    )?;
    serve(cli.listen, state).await
}
