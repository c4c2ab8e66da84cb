//! Index page and snapshot generation for the release binary catalog.
//!
//! This crate wires the catalog build to the public release tree over HTTP,
//! renders the index page, writes the JSON snapshot, and serves the endpoint
//! that triggers a rebuild. It backs the `update-index` and `update-trigger`
//! binaries.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Error types for updates and the trigger
//! - [`http_store`] - Object store over the public release tree
//! - [`logging`] - Subscriber setup for the binaries
//! - [`render`] - HTML rendering of the index page
//! - [`snapshot`] - JSON snapshot persistence
//! - [`trigger`] - Rebuild endpoint and command execution
//! - [`update`] - The build, render, and write flow

pub mod cli;
pub mod error;
pub mod http_store;
pub mod logging;
pub mod render;
pub mod snapshot;
pub mod trigger;
pub mod update;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
