//! HTTP-backed object store for the public release tree.
//!
//! Pointers such as `stable.txt` are plain objects under the release URL.
//! The tree offers no directory listing, so a version's objects are taken
//! from its `SHA256SUMS` manifest, which names every published file.

use log::warn;
use release_catalog::store::{ObjectStore, StoreError};
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for each request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Manifest listing every file published for a version.
const CHECKSUM_MANIFEST: &str = "SHA256SUMS";

/// Object store reading from a release URL such as `https://dl.k8s.io/release`.
///
/// # Examples
///
/// ```
/// use release_catalog_indexer::http_store::HttpReleaseStore;
///
/// let store = HttpReleaseStore::new("https://dl.k8s.io/release/");
/// assert_eq!(store.object_url("stable.txt"), "https://dl.k8s.io/release/stable.txt");
/// ```
#[derive(Debug, Clone)]
pub struct HttpReleaseStore {
    release_url: String,
}

impl HttpReleaseStore {
    /// Create a store rooted at `release_url`.
    #[must_use]
    pub fn new(release_url: impl Into<String>) -> Self {
        let release_url: String = release_url.into();
        Self {
            release_url: release_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Construct the URL of an object path.
    #[must_use]
    pub fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.release_url, path.trim_start_matches('/'))
    }
}

impl ObjectStore for HttpReleaseStore {
    fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let version = prefix.trim_end_matches('/');
        let url = self.object_url(&format!("{version}/{CHECKSUM_MANIFEST}"));
        let manifest = download(&url)?;
        let text = String::from_utf8(manifest).map_err(|_| StoreError::Utf8 {
            location: url.clone(),
        })?;
        Ok(parse_checksum_listing(version, &text))
    }

    fn read_object(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        download(&self.object_url(path))
    }
}

/// Turn a `SHA256SUMS` manifest into object paths under `version`.
///
/// Each well-formed line is `<digest> <path>`. Only paths inside `bin/` are
/// kept; lines with any other field count are logged and skipped.
///
/// # Examples
///
/// ```
/// use release_catalog_indexer::http_store::parse_checksum_listing;
///
/// let manifest = "abc  bin/linux/amd64/kubectl\ndef  kubernetes.tar.gz\n";
/// assert_eq!(
///     parse_checksum_listing("v1.30.0", manifest),
///     ["v1.30.0/bin/linux/amd64/kubectl"]
/// );
/// ```
#[must_use]
pub fn parse_checksum_listing(version: &str, manifest: &str) -> Vec<String> {
    manifest
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [_, path] = fields.as_slice() else {
                warn!("Skipping unknown SHA256SUMS line for version {version}: {fields:?}");
                return None;
            };
            path.starts_with("bin/").then(|| format!("{version}/{path}"))
        })
        .collect()
}

/// Fetch a URL and return the body bytes.
fn download(url: &str) -> Result<Vec<u8>, StoreError> {
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_vec()
        .map_err(|e| StoreError::Http {
            location: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`StoreError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> StoreError {
    match err {
        ureq::Error::StatusCode(404) => StoreError::NotFound {
            location: url.to_owned(),
        },
        other => StoreError::Http {
            location: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
