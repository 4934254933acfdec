//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML config file (`--config PATH`, or `config.toml` in the platform
//!    config directory)
//! 3. `DATADUPE_*` environment variables
//! 4. Command-line flags (see [`Config::merge_cli`])

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands};
use crate::duplicates::{FuzzyConfig, DEFAULT_THRESHOLD};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DATADUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Similarity threshold for threshold matching.
    pub threshold: i32,
    /// Worker threads for the fuzzy scan (0 = one per core).
    pub threads: usize,
    /// Show a progress bar during the fuzzy scan.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            threads: 0,
            progress: true,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults (plus environment overrides) if the file is
    /// missing or invalid.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_path(path),
            Err(e) => {
                log::debug!("No config directory available: {}", e);
                Self::load_layers(None).unwrap_or_default()
            }
        }
    }

    /// Load the configuration from a specific TOML file.
    ///
    /// A missing file is not an error; an unreadable one is logged and the
    /// defaults are used.
    #[must_use]
    pub fn load_from_path(path: PathBuf) -> Self {
        match Self::load_layers(Some(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Failed to load config from {}, using defaults: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn load_layers(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if path.exists() {
                log::debug!("Reading config file {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Invalid configuration")?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if cli.quiet || cli.json {
            self.progress = false;
        }
        if let Commands::Duplicates(args) = &cli.command {
            if let Some(threshold) = args.threshold {
                self.threshold = threshold;
            }
            if let Some(threads) = args.threads {
                self.threads = threads;
            }
        }
    }

    /// Fuzzy scan settings derived from this configuration.
    #[must_use]
    pub fn fuzzy_config(&self) -> FuzzyConfig {
        FuzzyConfig::default()
            .with_threshold(self.threshold)
            .with_threads(self.threads)
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "datadupe", "datadupe")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.threshold, 90);
        assert_eq!(config.threads, 0);
        assert!(config.progress);
    }

    #[test]
    fn test_merge_cli_threshold_and_threads() {
        let cli = Cli::try_parse_from([
            "datadupe",
            "duplicates",
            "a.csv",
            "--column",
            "name",
            "--method",
            "threshold",
            "--threshold",
            "75",
            "--threads",
            "2",
        ])
        .unwrap();
        let mut config = Config::default();
        config.merge_cli(&cli);
        assert_eq!(config.threshold, 75);
        assert_eq!(config.threads, 2);
        assert!(config.progress);
    }

    #[test]
    fn test_merge_cli_json_disables_progress() {
        let cli = Cli::try_parse_from(["datadupe", "--json", "increase", "a.csv", "-p", "5"])
            .unwrap();
        let mut config = Config::default();
        config.merge_cli(&cli);
        assert!(!config.progress);
        assert_eq!(config.threshold, 90);
    }

    #[test]
    fn test_fuzzy_config_from_config() {
        let config = Config {
            threshold: 60,
            threads: 4,
            progress: false,
        };
        let fuzzy = config.fuzzy_config();
        assert_eq!(fuzzy.threshold, 60);
        assert_eq!(fuzzy.threads, 4);
    }
}
