//! Artifact records and the catalog that aggregates them.
//!
//! [`CatalogBuilder`] accumulates artifacts across every selected version and
//! [`CatalogBuilder::finish`] hands them to the sorter, yielding a [`Catalog`].
//! The distinct OS, architecture, and base-name views are projections
//! recomputed from the artifact list on each call; neither type stores them.

use crate::sort::sort_artifacts;
use crate::version::{ParseError, SemanticVersion, parse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One published binary for a single version, OS, and architecture.
///
/// The serialised field labels match the snapshot format consumed
/// downstream (`Version`, `OperatingSystem`, `Architecture`, `Name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Artifact {
    /// Release tag the binary belongs to (for example `v1.30.0`).
    pub version: String,
    /// Operating system segment of the published path.
    pub operating_system: String,
    /// Architecture segment of the published path.
    pub architecture: String,
    /// File name, including any OS-specific extension.
    pub name: String,
}

impl Artifact {
    /// Create an artifact from its four identifying facets.
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        operating_system: impl Into<String>,
        architecture: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            operating_system: operating_system.into(),
            architecture: architecture.into(),
            name: name.into(),
        }
    }

    /// Parse the artifact's release tag.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the tag is not `vMAJOR.MINOR.PATCH`.
    pub fn semantic_version(&self) -> Result<SemanticVersion, ParseError> {
        parse(&self.version)
    }

    /// Return the name with every extension segment removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_catalog::catalog::Artifact;
    ///
    /// let artifact = Artifact::new("v1.30.0", "windows", "amd64", "kubectl.exe");
    /// assert_eq!(artifact.base_name(), "kubectl");
    /// ```
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }

    /// Return the download location of the binary on `download_host`.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_catalog::catalog::Artifact;
    ///
    /// let artifact = Artifact::new("v1.30.0", "linux", "amd64", "kubectl");
    /// assert_eq!(
    ///     artifact.link("dl.k8s.io"),
    ///     "dl.k8s.io/v1.30.0/bin/linux/amd64/kubectl"
    /// );
    /// ```
    #[must_use]
    pub fn link(&self, download_host: &str) -> String {
        format!(
            "{}/{}/bin/{}/{}/{}",
            download_host.trim_end_matches('/'),
            self.version,
            self.operating_system,
            self.architecture,
            self.name,
        )
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name, self.version, self.operating_system, self.architecture
        )
    }
}

/// Collect the distinct values of one facet, alphabetically ordered.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Derived index views shared by the builder and the finished catalog.
trait ArtifactViews {
    fn artifacts(&self) -> &[Artifact];

    fn operating_systems(&self) -> Vec<String> {
        distinct(self.artifacts().iter().map(|a| a.operating_system.as_str()))
    }

    fn architectures(&self) -> Vec<String> {
        distinct(self.artifacts().iter().map(|a| a.architecture.as_str()))
    }

    fn base_names(&self) -> Vec<String> {
        distinct(self.artifacts().iter().map(Artifact::base_name))
    }
}

/// Accumulates artifacts for one catalog build.
///
/// Artifacts are only ever appended; the builder exposes no removal API.
///
/// # Examples
///
/// ```
/// use release_catalog::catalog::{Artifact, CatalogBuilder};
///
/// let mut builder = CatalogBuilder::new();
/// builder.add(Artifact::new("v1.29.5", "linux", "arm64", "kubectl"));
/// builder.add(Artifact::new("v1.30.0", "linux", "amd64", "kubectl"));
///
/// let catalog = builder.finish().expect("all versions parse");
/// assert_eq!(catalog.artifacts()[0].version, "v1.30.0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    artifacts: Vec<Artifact>,
}

impl CatalogBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one artifact.
    pub fn add(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Number of artifacts accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether no artifact has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Distinct operating systems, alphabetically.
    #[must_use]
    pub fn distinct_operating_systems(&self) -> Vec<String> {
        self.operating_systems()
    }

    /// Distinct architectures, alphabetically.
    #[must_use]
    pub fn distinct_architectures(&self) -> Vec<String> {
        self.architectures()
    }

    /// Distinct base binary names, alphabetically.
    #[must_use]
    pub fn distinct_base_names(&self) -> Vec<String> {
        self.base_names()
    }

    /// Sort the accumulated artifacts into a finished [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of the first artifact whose version cannot
    /// be parsed; no catalog is produced in that case.
    pub fn finish(self) -> Result<Catalog, ParseError> {
        let artifacts = sort_artifacts(self.artifacts)?;
        Ok(Catalog { artifacts })
    }
}

impl Extend<Artifact> for CatalogBuilder {
    fn extend<I: IntoIterator<Item = Artifact>>(&mut self, iter: I) {
        self.artifacts.extend(iter);
    }
}

impl ArtifactViews for CatalogBuilder {
    fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }
}

/// A catalog of artifacts in canonical order.
///
/// Only [`CatalogBuilder::finish`] constructs one, so the artifact list is
/// always sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    artifacts: Vec<Artifact>,
}

impl Catalog {
    /// The artifacts, newest version first.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Consume the catalog and return its artifacts.
    #[must_use]
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }

    /// Number of artifacts in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the catalog holds no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Distinct operating systems, alphabetically.
    #[must_use]
    pub fn distinct_operating_systems(&self) -> Vec<String> {
        self.operating_systems()
    }

    /// Distinct architectures, alphabetically.
    #[must_use]
    pub fn distinct_architectures(&self) -> Vec<String> {
        self.architectures()
    }

    /// Distinct base binary names, alphabetically.
    #[must_use]
    pub fn distinct_base_names(&self) -> Vec<String> {
        self.base_names()
    }
}

impl ArtifactViews for Catalog {
    fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }
}
