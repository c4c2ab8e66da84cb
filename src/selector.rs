//! Selection of the most recent stable minor lines.
//!
//! The selector receives tags that stable pointers already resolved to and
//! picks one tag per `(major, minor)` line, newest line first. Patch numbers
//! play no part in the choice.

use crate::version::{SemanticVersion, parse};
use log::warn;
use thiserror::Error;

/// The only major version family the catalog supports by default.
pub const DEFAULT_SUPPORTED_MAJOR: u64 = 1;

/// Errors raised while choosing stable versions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Fewer distinct, parseable minor lines than requested.
    #[error("need {required} stable minor lines but only {available} are available")]
    InsufficientVersions {
        /// Number of lines requested.
        required: usize,
        /// Number of distinct lines found.
        available: usize,
    },

    /// The newest candidate belongs to a major line the catalog does not serve.
    #[error("assuming that latest stable major version is {supported}, but it's {found}")]
    UnsupportedMajorVersion {
        /// Major version of the newest candidate.
        found: u64,
        /// The major version the catalog supports.
        supported: u64,
    },
}

/// Select the `k` most recent stable minor lines, newest first.
///
/// Candidates that fail to parse are logged and excluded. When several
/// candidates share a minor line, the first one supplied wins.
///
/// # Errors
///
/// Returns [`SelectionError::UnsupportedMajorVersion`] when the newest
/// candidate's major differs from `supported_major`, and
/// [`SelectionError::InsufficientVersions`] when fewer than `k` distinct
/// lines are available.
///
/// # Examples
///
/// ```
/// use release_catalog::selector::select;
///
/// let pool = ["v1.30.0", "v1.29.5", "v1.28.9", "v1.27.2", "v1.26.1"];
/// let selected = select(&pool, 4, 1).expect("enough stable lines");
/// assert_eq!(selected, ["v1.30.0", "v1.29.5", "v1.28.9", "v1.27.2"]);
/// ```
pub fn select<S: AsRef<str>>(
    pointer_values: &[S],
    k: usize,
    supported_major: u64,
) -> Result<Vec<String>, SelectionError> {
    let mut candidates: Vec<(SemanticVersion, &str)> = pointer_values
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|tag| match parse(tag) {
            Ok(version) => Some((version, tag)),
            Err(err) => {
                warn!("Ignoring stable pointer value: {err}");
                None
            }
        })
        .collect();

    // Stable sort keeps input order within a minor line.
    candidates.sort_by(|(a, _), (b, _)| b.minor_line().cmp(&a.minor_line()));
    candidates.dedup_by_key(|(version, _)| version.minor_line());

    if let Some((head, _)) = candidates.first() {
        if head.major != supported_major {
            return Err(SelectionError::UnsupportedMajorVersion {
                found: head.major,
                supported: supported_major,
            });
        }
    }

    if candidates.len() < k {
        return Err(SelectionError::InsufficientVersions {
            required: k,
            available: candidates.len(),
        });
    }

    Ok(candidates
        .into_iter()
        .take(k)
        .map(|(_, tag)| tag.to_owned())
        .collect())
}
