//! Version discovery and binary catalog construction for published releases.
//!
//! Given the stable version pointers and object listing of a release bucket,
//! this crate selects the newest stable minor lines, keeps the published
//! binaries under each, and orders them deterministically: newest version
//! first, then operating system, architecture, and name.
//!
//! # Modules
//!
//! - [`version`] - Strict `vMAJOR.MINOR.PATCH` parsing
//! - [`selector`] - Selection of the newest stable minor lines
//! - [`filter`] - Classification of listing paths into binaries and skips
//! - [`catalog`] - Artifact records, accumulation, and derived views
//! - [`sort`] - Fallible canonical ordering
//! - [`export`] - Render and snapshot handoff shapes
//! - [`store`] - Object store abstraction and in-memory implementation
//! - [`pipeline`] - End-to-end build over an object store
//! - [`config`] - TOML-backed build configuration
//! - [`error`] - Build error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod pipeline;
pub mod selector;
pub mod sort;
pub mod store;
pub mod version;

pub use catalog::{Artifact, Catalog, CatalogBuilder};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use pipeline::{CatalogBuild, build_catalog};
