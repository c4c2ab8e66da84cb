//! Classification of published object paths.
//!
//! A release bucket holds far more than binaries: checksums, signatures,
//! tarballs, and objects outside the `bin/` tree. [`classify`] keeps only
//! paths shaped `<version>/bin/<os>/<arch>/<name>` whose name passes
//! [`should_include`], and reports every other path as a [`SkipReason`].

use crate::catalog::Artifact;
use log::{debug, info};
use std::fmt;

/// Root prefix stripped from listing entries when present.
pub const DEFAULT_ROOT_PREFIX: &str = "release/";

/// Why a listing entry did not become an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The path is not `<version>/bin/<os>/<arch>/<name>`.
    UnexpectedLayout,
    /// The file is a sidecar (checksum, signature, archive) of a binary.
    Sidecar,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedLayout => f.write_str("unexpected layout"),
            Self::Sidecar => f.write_str("sidecar file"),
        }
    }
}

/// Outcome of classifying one listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The path names a binary to include in the catalog.
    Binary(Artifact),
    /// The path is expected noise and is left out.
    Skip(SkipReason),
}

impl Classification {
    /// Return the artifact when the path was classified as a binary.
    #[must_use]
    pub fn into_artifact(self) -> Option<Artifact> {
        match self {
            Self::Binary(artifact) => Some(artifact),
            Self::Skip(_) => None,
        }
    }
}

/// Decide whether a file name denotes a binary.
///
/// Windows executables (`.exe`) are always binaries. Any other name with a
/// `.` is a sidecar such as `kubectl.sha256` or `kubectl.tar.gz`.
///
/// # Examples
///
/// ```
/// use release_catalog::filter::should_include;
///
/// assert!(should_include("kubectl.exe"));
/// assert!(should_include("kubectl"));
/// assert!(!should_include("kubectl.sha256"));
/// assert!(!should_include("kubectl.tar.gz"));
/// ```
#[must_use]
pub fn should_include(name: &str) -> bool {
    name.ends_with(".exe") || !name.contains('.')
}

/// Classify a path relative to the default root prefix.
///
/// # Examples
///
/// ```
/// use release_catalog::filter::{Classification, SkipReason, classify};
///
/// let Classification::Binary(artifact) = classify("v1.30.0/bin/linux/amd64/kubectl") else {
///     panic!("expected a binary");
/// };
/// assert_eq!(artifact.operating_system, "linux");
///
/// assert_eq!(
///     classify("v1.30.0/SHA256SUMS"),
///     Classification::Skip(SkipReason::UnexpectedLayout)
/// );
/// ```
#[must_use]
pub fn classify(path: &str) -> Classification {
    classify_with_root(path, DEFAULT_ROOT_PREFIX)
}

/// Classify a path after stripping `root_prefix` from it, if present.
///
/// The version segment is taken as-is; a malformed tag surfaces later when
/// the catalog is sorted.
#[must_use]
pub fn classify_with_root(path: &str, root_prefix: &str) -> Classification {
    let relative = path.strip_prefix(root_prefix).unwrap_or(path);

    let Some([version, os, arch, name]) = binary_segments(relative) else {
        debug!("Skipping unknown bin path: {path}");
        return Classification::Skip(SkipReason::UnexpectedLayout);
    };

    if !should_include(name) {
        info!("Excluding binary for version {version}: {path}");
        return Classification::Skip(SkipReason::Sidecar);
    }

    Classification::Binary(Artifact::new(version, os, arch, name))
}

/// Split `<version>/bin/<os>/<arch>/<name>` into its four facets.
fn binary_segments(path: &str) -> Option<[&str; 4]> {
    let mut segments = path.split('/');
    let version = segments.next()?;
    if segments.next()? != "bin" {
        return None;
    }
    let os = segments.next()?;
    let arch = segments.next()?;
    let name = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let facets = [version, os, arch, name];
    facets.iter().all(|s| !s.is_empty()).then_some(facets)
}
