//! End-to-end catalog build over an [`ObjectStore`].
//!
//! The build reads the latest stable pointer, follows the per-minor pointers
//! behind it, selects the newest minor lines, lists each selected version's
//! binaries, and sorts the result. It runs sequentially and stops at the
//! first error, so a catalog is only ever returned from a complete pass.

use crate::catalog::{Catalog, CatalogBuilder};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result, Stage};
use crate::filter::{Classification, classify_with_root};
use crate::selector::{SelectionError, select};
use crate::store::{ObjectStore, read_text};
use crate::version::parse;
use log::{debug, info};

/// Pointer naming the newest stable release overall.
pub const LATEST_POINTER: &str = "stable.txt";

/// Name of the pointer for the stable release of one minor line.
///
/// # Examples
///
/// ```
/// use release_catalog::pipeline::minor_pointer;
///
/// assert_eq!(minor_pointer(1, 29), "stable-1.29.txt");
/// ```
#[must_use]
pub fn minor_pointer(major: u64, minor: u64) -> String {
    format!("stable-{major}.{minor}.txt")
}

/// Output of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBuild {
    /// The sorted catalog.
    pub catalog: Catalog,
    /// The selected version tags, newest first.
    pub versions: Vec<String>,
}

/// Run a full catalog build.
///
/// # Errors
///
/// Returns [`CatalogError`] when a pointer cannot be read or parsed, when
/// selection fails, when a listing fails, or when a listed version cannot be
/// parsed during the sort.
///
/// # Examples
///
/// ```
/// use release_catalog::config::CatalogConfig;
/// use release_catalog::pipeline::build_catalog;
/// use release_catalog::store::InMemoryStore;
///
/// let store = InMemoryStore::new()
///     .with_object("stable.txt", "v1.30.0\n")
///     .with_object("stable-1.29.txt", "v1.29.5\n")
///     .with_object("v1.30.0/bin/linux/amd64/kubectl", "")
///     .with_object("v1.30.0/bin/linux/amd64/kubectl.sha256", "")
///     .with_object("v1.29.5/bin/darwin/arm64/kubectl", "");
/// let config = CatalogConfig {
///     versions: 2,
///     ..CatalogConfig::default()
/// };
///
/// let build = build_catalog(&store, &config).expect("complete build");
/// assert_eq!(build.versions, ["v1.30.0", "v1.29.5"]);
/// assert_eq!(build.catalog.len(), 2);
/// ```
pub fn build_catalog(store: &dyn ObjectStore, config: &CatalogConfig) -> Result<CatalogBuild> {
    let pointers = resolve_stable_pointers(store, config)?;
    let versions = select(&pointers, config.versions, config.supported_major)?;

    let mut builder = CatalogBuilder::new();
    for version in &versions {
        collect_binaries(store, config, version, &mut builder)?;
    }

    let catalog = builder.finish()?;
    info!(
        "Catalog holds {} binaries across {} versions",
        catalog.len(),
        versions.len()
    );

    Ok(CatalogBuild { catalog, versions })
}

/// Resolve the latest stable pointer and the pointers of the preceding
/// minor lines to release tags.
///
/// # Errors
///
/// Fails when a pointer cannot be read, when the latest tag does not parse
/// or is outside the supported major line, or when the latest minor is too
/// small to step back `versions - 1` lines.
pub fn resolve_stable_pointers(
    store: &dyn ObjectStore,
    config: &CatalogConfig,
) -> Result<Vec<String>> {
    let latest = read_pointer(store, LATEST_POINTER)?;
    info!("Got latest stable version: {latest}");

    let head = parse(&latest)?;
    if head.major != config.supported_major {
        return Err(SelectionError::UnsupportedMajorVersion {
            found: head.major,
            supported: config.supported_major,
        }
        .into());
    }

    let mut tags = vec![latest];
    for offset in 1..config.versions {
        let minor = u64::try_from(offset)
            .ok()
            .and_then(|step| head.minor.checked_sub(step))
            .ok_or(SelectionError::InsufficientVersions {
                required: config.versions,
                available: offset,
            })?;

        let pointer = minor_pointer(head.major, minor);
        info!("Getting previous stable from: {pointer}");
        let tag = read_pointer(store, &pointer)?;
        info!("Got version: {tag}");
        tags.push(tag);
    }

    Ok(tags)
}

fn read_pointer(store: &dyn ObjectStore, pointer: &str) -> Result<String> {
    read_text(store, pointer).map_err(|source| CatalogError::Collaborator {
        stage: Stage::ResolvePointer,
        target: pointer.to_owned(),
        source,
    })
}

/// List one version's objects and add every binary to `builder`.
fn collect_binaries(
    store: &dyn ObjectStore,
    config: &CatalogConfig,
    version: &str,
    builder: &mut CatalogBuilder,
) -> Result<()> {
    let prefix = format!("{version}/");
    let paths = store
        .list_objects(&prefix)
        .map_err(|source| CatalogError::Collaborator {
            stage: Stage::ListBinaries,
            target: prefix.clone(),
            source,
        })?;

    let before = builder.len();
    let mut skipped = 0_usize;
    for path in &paths {
        match classify_with_root(path, &config.root_prefix) {
            Classification::Binary(artifact) => builder.add(artifact),
            Classification::Skip(_) => skipped += 1,
        }
    }

    debug!(
        "Version {version}: {} binaries, {skipped} skipped entries",
        builder.len() - before
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, MockObjectStore, StoreError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_object("stable.txt", "v1.30.0\n")
            .with_object("stable-1.29.txt", "v1.29.5")
            .with_object("stable-1.28.txt", "v1.28.9")
            .with_object("v1.30.0/bin/linux/amd64/kubectl", "")
            .with_object("v1.30.0/bin/windows/amd64/kubectl.exe", "")
            .with_object("v1.30.0/bin/windows/amd64/kubectl.exe.sha256", "")
            .with_object("v1.30.0/SHA256SUMS", "")
            .with_object("v1.29.5/bin/linux/arm64/kubectl", "")
            .with_object("v1.28.9/bin/darwin/amd64/kubectl", "")
    }

    fn config(versions: usize) -> CatalogConfig {
        CatalogConfig {
            versions,
            ..CatalogConfig::default()
        }
    }

    #[rstest]
    fn resolves_pointers_newest_first(store: InMemoryStore) {
        let tags = resolve_stable_pointers(&store, &config(3)).expect("pointers resolve");
        assert_eq!(tags, ["v1.30.0", "v1.29.5", "v1.28.9"]);
    }

    #[rstest]
    fn builds_sorted_catalog(store: InMemoryStore) {
        let build = build_catalog(&store, &config(3)).expect("complete build");

        assert_eq!(build.versions, ["v1.30.0", "v1.29.5", "v1.28.9"]);
        let rendered: Vec<String> = build
            .catalog
            .artifacts()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rendered,
            [
                "kubectl v1.30.0 linux amd64",
                "kubectl.exe v1.30.0 windows amd64",
                "kubectl v1.29.5 linux arm64",
                "kubectl v1.28.9 darwin amd64",
            ]
        );
    }

    #[rstest]
    fn missing_minor_pointer_aborts(store: InMemoryStore) {
        let err = build_catalog(&store, &config(4)).expect_err("no stable-1.27.txt");
        assert!(matches!(
            err,
            CatalogError::Collaborator {
                stage: Stage::ResolvePointer,
                ref target,
                ..
            } if target == "stable-1.27.txt"
        ));
    }

    #[test]
    fn malformed_latest_pointer_aborts() {
        let store = InMemoryStore::new().with_object("stable.txt", "v1.30");
        let err = build_catalog(&store, &config(1)).expect_err("malformed");
        assert!(matches!(err, CatalogError::Parse(ref e) if e.raw == "v1.30"));
    }

    #[test]
    fn unsupported_major_aborts_before_following_pointers() {
        let store = InMemoryStore::new().with_object("stable.txt", "v2.0.3");
        let err = build_catalog(&store, &config(4)).expect_err("major 2");
        assert!(matches!(
            err,
            CatalogError::Selection(SelectionError::UnsupportedMajorVersion { found: 2, .. })
        ));
    }

    #[test]
    fn minor_underflow_is_insufficient() {
        let store = InMemoryStore::new()
            .with_object("stable.txt", "v1.1.0")
            .with_object("stable-1.0.txt", "v1.0.9");
        let err = build_catalog(&store, &config(3)).expect_err("no minor -1");
        assert!(matches!(
            err,
            CatalogError::Selection(SelectionError::InsufficientVersions {
                required: 3,
                available: 2,
            })
        ));
    }

    #[test]
    fn stale_minor_pointer_is_insufficient() {
        // stable-1.29.txt still points at the 1.30 line, leaving one distinct line.
        let store = InMemoryStore::new()
            .with_object("stable.txt", "v1.30.0")
            .with_object("stable-1.29.txt", "v1.30.0");
        let err = build_catalog(&store, &config(2)).expect_err("duplicate line");
        assert!(matches!(
            err,
            CatalogError::Selection(SelectionError::InsufficientVersions { available: 1, .. })
        ));
    }

    #[test]
    fn listing_failure_aborts_the_build() {
        let mut store = MockObjectStore::new();
        store
            .expect_read_object()
            .withf(|path| path == "stable.txt")
            .returning(|_| Ok(b"v1.30.0".to_vec()));
        store.expect_list_objects().returning(|prefix| {
            Err(StoreError::Http {
                location: prefix.to_owned(),
                reason: "connection reset".to_owned(),
            })
        });

        let err = build_catalog(&store, &config(1)).expect_err("listing fails");
        assert!(matches!(
            err,
            CatalogError::Collaborator {
                stage: Stage::ListBinaries,
                ..
            }
        ));
    }

    #[test]
    fn unparseable_listed_version_aborts_the_sort() {
        let mut store = MockObjectStore::new();
        store
            .expect_read_object()
            .returning(|_| Ok(b"v1.30.0".to_vec()));
        store.expect_list_objects().returning(|_| {
            Ok(vec![
                "v1.30.0/bin/linux/amd64/kubectl".to_owned(),
                "v1.30.0-dirty/bin/linux/amd64/kubectl".to_owned(),
            ])
        });

        let err = build_catalog(&store, &config(1)).expect_err("bad listed version");
        assert!(matches!(err, CatalogError::Parse(ref e) if e.raw == "v1.30.0-dirty"));
    }

    #[rstest]
    fn repeated_builds_are_identical(store: InMemoryStore) {
        let first = build_catalog(&store, &config(3)).expect("first build");
        let second = build_catalog(&store, &config(3)).expect("second build");
        assert_eq!(first, second);
    }
}
