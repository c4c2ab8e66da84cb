//! Handoff shapes for the document renderer and the snapshot writer.
//!
//! The field labels (`Binaries`, `AllOSes`, `AllBins`, `AllVersions`,
//! `AllArch`) are the contract with the downstream template and JSON
//! consumers.

use crate::catalog::{Artifact, Catalog, CatalogBuilder};
use crate::version::ParseError;
use serde::{Deserialize, Serialize};

/// Everything the document renderer needs for one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderContext {
    /// Artifacts in canonical order.
    pub binaries: Vec<Artifact>,
    /// Distinct operating systems.
    #[serde(rename = "AllOSes")]
    pub all_oses: Vec<String>,
    /// Distinct base binary names; document-only.
    pub all_bins: Vec<String>,
    /// Selected version tags, newest first.
    pub all_versions: Vec<String>,
    /// Distinct architectures.
    pub all_arch: Vec<String>,
    /// Year stamped into the document footer.
    pub year: u32,
}

impl RenderContext {
    /// Build the render handoff from a sorted catalog.
    #[must_use]
    pub fn new(catalog: &Catalog, versions: &[String], year: u32) -> Self {
        Self {
            binaries: catalog.artifacts().to_vec(),
            all_oses: catalog.distinct_operating_systems(),
            all_bins: catalog.distinct_base_names(),
            all_versions: versions.to_vec(),
            all_arch: catalog.distinct_architectures(),
            year,
        }
    }
}

/// The machine-readable catalog snapshot.
///
/// Unlike [`RenderContext`] it omits `AllBins` and the generation year, so
/// two builds over an unchanged bucket serialise identically.
///
/// # Examples
///
/// ```
/// use release_catalog::catalog::{Artifact, CatalogBuilder};
/// use release_catalog::export::CatalogSnapshot;
///
/// let mut builder = CatalogBuilder::new();
/// builder.add(Artifact::new("v1.30.0", "linux", "amd64", "kubectl"));
/// let catalog = builder.finish().expect("valid versions");
///
/// let snapshot = CatalogSnapshot::new(&catalog, &["v1.30.0".to_owned()]);
/// assert_eq!(snapshot.all_oses, ["linux"]);
/// assert_eq!(snapshot.into_catalog().expect("valid versions"), catalog);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogSnapshot {
    /// Artifacts in canonical order.
    pub binaries: Vec<Artifact>,
    /// Distinct operating systems.
    #[serde(rename = "AllOSes")]
    pub all_oses: Vec<String>,
    /// Selected version tags, newest first.
    pub all_versions: Vec<String>,
    /// Distinct architectures.
    pub all_arch: Vec<String>,
}

impl CatalogSnapshot {
    /// Build a snapshot from a sorted catalog.
    #[must_use]
    pub fn new(catalog: &Catalog, versions: &[String]) -> Self {
        Self {
            binaries: catalog.artifacts().to_vec(),
            all_oses: catalog.distinct_operating_systems(),
            all_versions: versions.to_vec(),
            all_arch: catalog.distinct_architectures(),
        }
    }

    /// Rebuild a [`Catalog`] from the snapshot's binaries.
    ///
    /// The binaries are re-sorted, so a snapshot written from a catalog
    /// reconstructs the same order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a stored version tag is malformed.
    pub fn into_catalog(self) -> Result<Catalog, ParseError> {
        let mut builder = CatalogBuilder::new();
        builder.extend(self.binaries);
        builder.finish()
    }
}
