//! The `update-index` flow: build the catalog, render, and persist.
//!
//! Both outputs are produced in memory before either file is touched, so a
//! failed render or serialisation leaves the previous outputs in place.

use crate::error::Result;
use crate::render::DocumentRenderer;
use crate::snapshot::{snapshot_json, write_output};
use camino::Utf8PathBuf;
use log::info;
use release_catalog::config::CatalogConfig;
use release_catalog::export::{CatalogSnapshot, RenderContext};
use release_catalog::pipeline::{CatalogBuild, build_catalog};
use release_catalog::store::ObjectStore;

/// Default location of the rendered index page.
pub const DEFAULT_INDEX_OUTPUT: &str = "./dist/index.html";

/// Default location of the JSON snapshot.
pub const DEFAULT_BINARY_DETAILS: &str = "./dist/release_binaries.json";

/// Destination files for one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Rendered index page.
    pub index: Utf8PathBuf,
    /// JSON snapshot of the catalog.
    pub binary_details: Utf8PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            index: Utf8PathBuf::from(DEFAULT_INDEX_OUTPUT),
            binary_details: Utf8PathBuf::from(DEFAULT_BINARY_DETAILS),
        }
    }
}

/// Build the catalog from `store` and write both outputs.
///
/// # Errors
///
/// Returns the first failure among the catalog build, rendering,
/// serialisation, and file writes.
pub fn run_update(
    store: &dyn ObjectStore,
    config: &CatalogConfig,
    renderer: &dyn DocumentRenderer,
    outputs: &OutputPaths,
    year: u32,
) -> Result<CatalogBuild> {
    let build = build_catalog(store, config)?;

    let document = renderer.render(&RenderContext::new(&build.catalog, &build.versions, year))?;
    let snapshot = snapshot_json(&CatalogSnapshot::new(&build.catalog, &build.versions))?;

    write_output(&outputs.binary_details, &snapshot)?;
    info!("Wrote catalog snapshot to {}", outputs.binary_details);
    write_output(&outputs.index, &document)?;
    info!("Wrote index page to {}", outputs.index);

    Ok(build)
}
