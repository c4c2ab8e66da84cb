//! Object listing abstraction for the release bucket.
//!
//! The catalog build only needs two operations from storage: list the paths
//! under a prefix and read one object. [`ObjectStore`] captures them so the
//! build can run against HTTP, a local snapshot, or a test double.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors arising from object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist.
    #[error("object not found: {location}")]
    NotFound {
        /// The path or URL that was requested.
        location: String,
    },

    /// The backend request failed.
    #[error("request failed for {location}: {reason}")]
    Http {
        /// The path or URL that was requested.
        location: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// Object content is not valid UTF-8 text.
    #[error("object {location} is not valid UTF-8")]
    Utf8 {
        /// The path that was read.
        location: String,
    },

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read access to published release objects.
///
/// Listings are treated as eventually consistent snapshots of path strings.
/// Implementations perform one request per call and do not retry.
#[cfg_attr(test, mockall::automock)]
pub trait ObjectStore {
    /// List the object paths under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be obtained.
    fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Read the full content of the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is missing or cannot be read.
    fn read_object(&self, path: &str) -> Result<Vec<u8>, StoreError>;
}

/// Read an object and decode it as trimmed UTF-8 text.
///
/// # Errors
///
/// Propagates the store error, or [`StoreError::Utf8`] for binary content.
pub fn read_text(store: &dyn ObjectStore, path: &str) -> Result<String, StoreError> {
    let bytes = store.read_object(path)?;
    let text = String::from_utf8(bytes).map_err(|_| StoreError::Utf8 {
        location: path.to_owned(),
    })?;
    Ok(text.trim().to_owned())
}

/// An object store held entirely in memory.
///
/// Paths are kept sorted, so listings are deterministic.
///
/// # Examples
///
/// ```
/// use release_catalog::store::{InMemoryStore, ObjectStore};
///
/// let store = InMemoryStore::new()
///     .with_object("stable.txt", "v1.30.0")
///     .with_object("v1.30.0/bin/linux/amd64/kubectl", "");
///
/// let listing = store.list_objects("v1.30.0/").expect("listing");
/// assert_eq!(listing, ["v1.30.0/bin/linux/amd64/kubectl"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning the store for chaining.
    #[must_use]
    pub fn with_object(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace an object.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.objects.insert(path.into(), content.into());
    }
}

impl ObjectStore for InMemoryStore {
    fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .objects
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn read_object(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                location: path.to_owned(),
            })
    }
}
