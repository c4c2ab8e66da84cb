//! Catalog build configuration.
//!
//! Settings are read from an optional TOML file. Every field has a default
//! matching the Kubernetes production bucket, so an absent file or an empty
//! table yields a working configuration. Unknown keys are rejected to catch
//! typos early.

use crate::filter::DEFAULT_ROOT_PREFIX;
use crate::selector::DEFAULT_SUPPORTED_MAJOR;
use camino::Utf8Path;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is syntactically valid but unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Description of the rejected value.
        reason: String,
    },
}

/// Parameters of one catalog build.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Number of stable minor lines to include.
    pub versions: usize,
    /// The only major version the catalog accepts at its head.
    pub supported_major: u64,
    /// Base URL of the release tree holding pointers and per-version objects.
    pub release_url: String,
    /// Host (without scheme) used to build download links.
    pub download_host: String,
    /// Root prefix stripped from listing entries.
    pub root_prefix: String,
}

impl CatalogConfig {
    const fn default_versions() -> usize {
        4
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed TOML, unknown keys, or a
    /// `versions` value of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_catalog::config::CatalogConfig;
    ///
    /// let config = CatalogConfig::from_toml_str("versions = 3\n").expect("valid config");
    /// assert_eq!(config.versions, 3);
    /// assert_eq!(config.supported_major, 1);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when no path
    /// is given or the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |file| match std::fs::read_to_string(file) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Read {
                path: file.to_string(),
                source,
            }),
        })
    }

    /// Load configuration using the supplied reader.
    ///
    /// The reader returns the file contents, or `None` when the file is
    /// absent. This seam lets tests avoid the file system.
    ///
    /// # Errors
    ///
    /// Propagates reader errors and parse failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use release_catalog::config::CatalogConfig;
    ///
    /// let config = CatalogConfig::load_with(Some(Utf8Path::new("catalog.toml")), |_| {
    ///     Ok(Some("versions = 2\n".to_owned()))
    /// })
    /// .expect("valid config");
    /// assert_eq!(config.versions, 2);
    /// ```
    pub fn load_with<F>(path: Option<&Utf8Path>, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> Result<Option<String>, ConfigError>,
    {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match reader(path)? {
            Some(contents) => Self::from_toml_str(&contents),
            None => Ok(Self::default()),
        }
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `versions` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.versions == 0 {
            return Err(ConfigError::Invalid {
                reason: "versions must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            versions: Self::default_versions(),
            supported_major: DEFAULT_SUPPORTED_MAJOR,
            release_url: "https://dl.k8s.io/release".to_owned(),
            download_host: "dl.k8s.io".to_owned(),
            root_prefix: DEFAULT_ROOT_PREFIX.to_owned(),
        }
    }
}
