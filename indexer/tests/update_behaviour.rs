//! Behaviour-driven tests for the `update-index` flow.
//!
//! Scenarios run the full update against an in-memory release tree and a
//! temporary output directory, then inspect the written files.

use camino::Utf8PathBuf;
use release_catalog::config::CatalogConfig;
use release_catalog::pipeline::CatalogBuild;
use release_catalog::store::InMemoryStore;
use release_catalog_indexer::error::IndexerError;
use release_catalog_indexer::render::HtmlRenderer;
use release_catalog_indexer::snapshot::read_snapshot;
use release_catalog_indexer::update::{OutputPaths, run_update};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

struct UpdateWorld {
    store: InMemoryStore,
    outputs: OutputPaths,
    outcome: Option<Result<CatalogBuild, IndexerError>>,
    _dir: TempDir,
}

impl UpdateWorld {
    fn build(&self) -> &CatalogBuild {
        match self.outcome.as_ref().expect("update attempted") {
            Ok(build) => build,
            Err(err) => panic!("expected a successful update, got: {err}"),
        }
    }

    fn index_page(&self) -> String {
        std::fs::read_to_string(&self.outputs.index).expect("index page written")
    }
}

#[fixture]
fn world() -> UpdateWorld {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp dir");
    UpdateWorld {
        store: InMemoryStore::new(),
        outputs: OutputPaths {
            index: root.join("dist/index.html"),
            binary_details: root.join("dist/release_binaries.json"),
        },
        outcome: None,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("the release tree points \"{pointer}\" at \"{tag}\"")]
fn given_pointer(world: &mut UpdateWorld, pointer: String, tag: String) {
    world.store.insert(pointer, format!("{tag}\n"));
}

#[given("the release tree publishes \"{path}\"")]
fn given_published(world: &mut UpdateWorld, path: String) {
    world.store.insert(path, Vec::new());
}

#[when("the index is updated for {count} versions")]
fn when_updated(world: &mut UpdateWorld, count: usize) {
    let config = CatalogConfig {
        versions: count,
        ..CatalogConfig::default()
    };
    let renderer = HtmlRenderer::with_default_template(config.download_host.as_str());
    world.outcome = Some(run_update(
        &world.store,
        &config,
        &renderer,
        &world.outputs,
        2026,
    ));
}

#[then("the update succeeds")]
fn then_succeeds(world: &mut UpdateWorld) {
    let _ = world.build();
}

#[then("the index page links \"{url}\"")]
fn then_links(world: &mut UpdateWorld, url: String) {
    assert!(world.index_page().contains(&format!("href=\"{url}\"")));
}

#[then("the index page has a row classed \"{classes}\"")]
fn then_row_classed(world: &mut UpdateWorld, classes: String) {
    assert!(world.index_page().contains(&format!("<tr class=\"{classes}\">")));
}

#[then("the snapshot lists {count} binaries")]
fn then_snapshot_count(world: &mut UpdateWorld, count: usize) {
    let snapshot = read_snapshot(&world.outputs.binary_details).expect("snapshot readable");
    assert_eq!(snapshot.binaries.len(), count);
}

#[then("the snapshot file restores the built catalog")]
fn then_snapshot_restores(world: &mut UpdateWorld) {
    let snapshot = read_snapshot(&world.outputs.binary_details).expect("snapshot readable");
    let restored = snapshot.into_catalog().expect("valid versions");
    assert_eq!(restored, world.build().catalog);
}

#[then("the update fails with a message containing \"{fragment}\"")]
fn then_fails(world: &mut UpdateWorld, fragment: String) {
    match world.outcome.as_ref().expect("update attempted") {
        Ok(_) => panic!("expected the update to fail"),
        Err(err) => assert!(
            err.to_string().contains(&fragment),
            "unexpected message: {err}"
        ),
    }
}

#[then("no output files exist")]
fn then_no_outputs(world: &mut UpdateWorld) {
    assert!(!world.outputs.index.exists());
    assert!(!world.outputs.binary_details.exists());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/update_index.feature",
    name = "An update writes the page and the snapshot"
)]
fn scenario_update_writes_outputs(world: UpdateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/update_index.feature",
    name = "The snapshot file restores the catalog"
)]
fn scenario_snapshot_restores(world: UpdateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/update_index.feature",
    name = "A failed build leaves no outputs behind"
)]
fn scenario_failed_build(world: UpdateWorld) {
    let _ = world;
}
