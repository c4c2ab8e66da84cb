//! CLI argument definitions for the `update-index` and `update-trigger`
//! binaries.

use crate::update::{DEFAULT_BINARY_DETAILS, DEFAULT_INDEX_OUTPUT, OutputPaths};
use camino::Utf8PathBuf;
use clap::Parser;
use release_catalog::config::CatalogConfig;
use std::net::SocketAddr;

/// Default listen address of the trigger service.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Default command that rebuilds the index.
pub const DEFAULT_INDEX_COMMAND: &str = "update-index";

/// Default command that packages the site after the index is rebuilt.
pub const DEFAULT_PACKAGE_COMMAND: &str = "npm run build-prod";

/// Rebuild the release binary index page and JSON snapshot.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "update-index")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Rebuild using the built-in page template:\n",
    "    $ update-index\n\n",
    "  Track six minor lines from a mirror:\n",
    "    $ update-index --versions 6 --release-url https://mirror.example/release\n\n",
    "Logging is controlled with RUST_LOG (default: info).",
))]
pub struct IndexCli {
    /// TOML configuration file; missing files fall back to defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Number of stable minor lines to include.
    #[arg(long, value_name = "N")]
    pub versions: Option<usize>,

    /// Base URL of the release tree.
    #[arg(long, value_name = "URL")]
    pub release_url: Option<String>,

    /// Page template file [default: built-in template].
    #[arg(long, value_name = "FILE")]
    pub index_template: Option<Utf8PathBuf>,

    /// Location of the rendered index page.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_INDEX_OUTPUT)]
    pub index_output: Utf8PathBuf,

    /// Location of the JSON snapshot.
    #[arg(
        long,
        alias = "binary_details",
        value_name = "FILE",
        default_value = DEFAULT_BINARY_DETAILS
    )]
    pub binary_details: Utf8PathBuf,
}

impl IndexCli {
    /// Apply command-line overrides on top of a loaded configuration.
    #[must_use]
    pub fn apply_overrides(&self, mut config: CatalogConfig) -> CatalogConfig {
        if let Some(versions) = self.versions {
            config.versions = versions;
        }
        if let Some(release_url) = &self.release_url {
            config.release_url.clone_from(release_url);
        }
        config
    }

    /// Destination files selected on the command line.
    #[must_use]
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            index: self.index_output.clone(),
            binary_details: self.binary_details.clone(),
        }
    }
}

/// Serve the endpoint that rebuilds and repackages the index on request.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "update-trigger")]
#[command(version, about)]
pub struct TriggerCli {
    /// Address to listen on.
    #[arg(long, value_name = "ADDR", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Command that rebuilds the index.
    #[arg(long, value_name = "CMD", default_value = DEFAULT_INDEX_COMMAND)]
    pub index_command: String,

    /// Command that packages the site afterwards.
    #[arg(long, value_name = "CMD", default_value = DEFAULT_PACKAGE_COMMAND)]
    pub package_command: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn index_cli_defaults_match_dist_layout() {
        let cli = IndexCli::try_parse_from(["update-index"]).expect("parse");
        assert_eq!(cli.index_output, DEFAULT_INDEX_OUTPUT);
        assert_eq!(cli.binary_details, DEFAULT_BINARY_DETAILS);
        assert!(cli.index_template.is_none());
        assert_eq!(cli.output_paths(), OutputPaths::default());
    }

    #[rstest]
    #[case::kebab("--binary-details")]
    #[case::snake("--binary_details")]
    fn binary_details_accepts_both_spellings(#[case] flag: &str) {
        let cli = IndexCli::try_parse_from(["update-index", flag, "out.json"]).expect("parse");
        assert_eq!(cli.binary_details, "out.json");
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let cli = IndexCli::try_parse_from([
            "update-index",
            "--versions",
            "6",
            "--release-url",
            "https://mirror.example/release",
        ])
        .expect("parse");

        let config = cli.apply_overrides(CatalogConfig::default());

        assert_eq!(config.versions, 6);
        assert_eq!(config.release_url, "https://mirror.example/release");
        assert_eq!(config.download_host, CatalogConfig::default().download_host);
    }

    #[test]
    fn no_overrides_keep_the_configuration() {
        let cli = IndexCli::try_parse_from(["update-index"]).expect("parse");
        let config = CatalogConfig {
            versions: 3,
            ..CatalogConfig::default()
        };
        assert_eq!(cli.apply_overrides(config.clone()), config);
    }

    #[test]
    fn trigger_cli_defaults() {
        let cli = TriggerCli::try_parse_from(["update-trigger"]).expect("parse");
        assert_eq!(cli.listen.port(), 8080);
        assert_eq!(cli.index_command, DEFAULT_INDEX_COMMAND);
        assert_eq!(cli.package_command, DEFAULT_PACKAGE_COMMAND);
    }

    #[test]
    fn trigger_cli_rejects_bad_listen_address() {
        assert!(TriggerCli::try_parse_from(["update-trigger", "--listen", "nowhere"]).is_err());
    }
}
