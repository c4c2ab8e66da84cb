//! Error types for the index updater and the rebuild trigger.
//!
//! Every variant names the stage that failed so that the diagnostic printed
//! by `update-index`, and echoed by the trigger endpoint, points at the
//! cause without further context.

use camino::Utf8PathBuf;
use release_catalog::CatalogError;
use release_catalog::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while updating the index or serving the trigger.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog build failed.
    #[error("build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The document template could not be read.
    #[error("read template {path}: {source}")]
    TemplateRead {
        /// Path of the template file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be rendered.
    #[error("execute template: {reason}")]
    Render {
        /// Description of the rendering failure.
        reason: String,
    },

    /// The snapshot could not be serialised or parsed.
    #[error("marshal JSON: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// An output file could not be written.
    #[error("write {path}: {source}")]
    WriteFailed {
        /// Path of the output file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An input file could not be read.
    #[error("read {path}: {source}")]
    ReadFailed {
        /// Path of the input file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A trigger step command line could not be parsed.
    #[error("invalid {step} command \"{command}\": {reason}")]
    InvalidCommand {
        /// Label of the step.
        step: String,
        /// The rejected command line.
        command: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`IndexerError`].
pub type Result<T> = std::result::Result<T, IndexerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use release_catalog::selector::SelectionError;

    #[test]
    fn catalog_error_names_the_stage() {
        let err = IndexerError::from(CatalogError::from(
            SelectionError::InsufficientVersions {
                required: 4,
                available: 3,
            },
        ));
        let msg = err.to_string();
        assert!(msg.starts_with("build catalog:"));
        assert!(msg.contains("need 4"));
    }

    #[test]
    fn write_failed_includes_path() {
        let err = IndexerError::WriteFailed {
            path: Utf8PathBuf::from("dist/index.html"),
            source: std::io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("dist/index.html"));
        assert!(msg.contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invalid_command_includes_step_and_reason() {
        let err = IndexerError::InvalidCommand {
            step: "package".to_owned(),
            command: "npm run 'build".to_owned(),
            reason: "missing closing quote".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("package"));
        assert!(msg.contains("missing closing quote"));
    }
}
