//! Error types for a catalog build.
//!
//! A build is all-or-nothing: every variant here aborts it. Listing entries
//! that merely have an unexpected shape are not errors; see
//! [`crate::filter::SkipReason`].

use crate::selector::SelectionError;
use crate::store::StoreError;
use crate::version::ParseError;
use thiserror::Error;

/// The build stage that called out to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading a stable version pointer.
    ResolvePointer,
    /// Listing the binaries published for one version.
    ListBinaries,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolvePointer => f.write_str("resolve stable pointer"),
            Self::ListBinaries => f.write_str("list binaries"),
        }
    }
}

/// Errors that abort a catalog build.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A version tag could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Stable version selection failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The object store failed during a build stage.
    #[error("{stage} failed for {target}: {source}")]
    Collaborator {
        /// The stage that issued the call.
        stage: Stage,
        /// The pointer, prefix, or path involved.
        target: String,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },
}

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
