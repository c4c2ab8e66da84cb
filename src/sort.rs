//! Canonical ordering of catalog artifacts.
//!
//! The order is newest version first (major, minor, then patch, each
//! descending), then operating system, architecture, and name ascending.
//! Comparison is fallible: an artifact whose version does not parse fails
//! the whole sort instead of landing in an arbitrary position.

use crate::catalog::Artifact;
use crate::version::{ParseError, SemanticVersion};
use std::cmp::{Ordering, Reverse};

/// Compare two artifacts under the canonical six-key order.
///
/// # Errors
///
/// Returns [`ParseError`] if either artifact's version is malformed.
///
/// # Examples
///
/// ```
/// use release_catalog::catalog::Artifact;
/// use release_catalog::sort::compare;
/// use std::cmp::Ordering;
///
/// let newer = Artifact::new("v1.30.0", "windows", "amd64", "kubectl.exe");
/// let older = Artifact::new("v1.29.5", "darwin", "amd64", "kubectl");
/// assert_eq!(compare(&newer, &older), Ok(Ordering::Less));
/// ```
pub fn compare(a: &Artifact, b: &Artifact) -> Result<Ordering, ParseError> {
    Ok(SortKey::of(a)?.cmp(&SortKey::of(b)?))
}

/// Sort artifacts into canonical order.
///
/// Every version is parsed before any element moves, so a malformed tag
/// leaves no half-sorted output behind. Artifacts that tie on all six keys
/// keep their input order.
///
/// # Errors
///
/// Returns the [`ParseError`] for the first artifact, in input order, whose
/// version cannot be parsed.
pub fn sort_artifacts(artifacts: Vec<Artifact>) -> Result<Vec<Artifact>, ParseError> {
    let mut keyed = artifacts
        .into_iter()
        .map(|artifact| {
            let key = SortKey::of(&artifact)?.owned();
            Ok((key, artifact))
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    Ok(keyed.into_iter().map(|(_, artifact)| artifact).collect())
}

/// Tuple ordering does the work: reversed version, then the text facets.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey<T> {
    version: Reverse<SemanticVersion>,
    operating_system: T,
    architecture: T,
    name: T,
}

impl<'a> SortKey<&'a str> {
    fn of(artifact: &'a Artifact) -> Result<Self, ParseError> {
        Ok(Self {
            version: Reverse(artifact.semantic_version()?),
            operating_system: &artifact.operating_system,
            architecture: &artifact.architecture,
            name: &artifact.name,
        })
    }

    fn owned(&self) -> SortKey<String> {
        SortKey {
            version: self.version,
            operating_system: self.operating_system.to_owned(),
            architecture: self.architecture.to_owned(),
            name: self.name.to_owned(),
        }
    }
}
