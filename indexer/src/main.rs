//! `update-index` entrypoint.
//!
//! Builds the catalog from the release tree, then writes the index page and
//! the JSON snapshot. Any failure is printed as `Unable to update index:
//! <cause>` and the process exits with status 1.

use clap::Parser;
use release_catalog::config::CatalogConfig;
use release_catalog_indexer::cli::IndexCli;
use release_catalog_indexer::error::Result;
use release_catalog_indexer::http_store::HttpReleaseStore;
use release_catalog_indexer::logging::init_logging;
use release_catalog_indexer::render::{HtmlRenderer, current_year};
use release_catalog_indexer::update::run_update;
use std::io::Write;

fn main() {
    init_logging();
    let cli = IndexCli::parse();
    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run(&cli), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &IndexCli) -> Result<()> {
    let config = cli.apply_overrides(CatalogConfig::load(cli.config.as_deref())?);
    config.validate()?;

    let renderer = match &cli.index_template {
        Some(path) => HtmlRenderer::from_file(path, config.download_host.as_str())?,
        None => HtmlRenderer::with_default_template(config.download_host.as_str()),
    };
    let store = HttpReleaseStore::new(config.release_url.as_str());

    run_update(
        &store,
        &config,
        &renderer,
        &cli.output_paths(),
        current_year(),
    )?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("Unable to update index: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
