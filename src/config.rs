//! Configuration types for download operations and the app-level config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the download engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Number of concurrent file transfers.
    pub concurrent_files: usize,
    /// Whether to re-download files that already exist on disk.
    pub force_overwrite: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrent_files: 4,
            force_overwrite: false,
        }
    }
}

impl DownloadConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of concurrent file transfers (minimum 1).
    #[must_use]
    pub const fn with_concurrent_files(mut self, concurrent: usize) -> Self {
        self.concurrent_files = if concurrent == 0 { 1 } else { concurrent };
        self
    }

    /// Sets whether to re-download files that already exist.
    #[must_use]
    pub const fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }
}

/// App-level configuration, persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog account name.
    pub account: String,
    /// Catalog account password.
    pub password: String,
    /// Directory under which works are downloaded.
    pub download_dir: PathBuf,
    /// Number of concurrent file transfers per work.
    pub max_workers: usize,
    /// Subtitle filter for catalog listings: `Some(true)` for subtitled works
    /// only, `Some(false)` for unsubtitled only, `None` for everything.
    pub subtitle: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: String::new(),
            password: String::new(),
            download_dir: PathBuf::from("downloads"),
            max_workers: 4,
            subtitle: None,
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/onsei-dl/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("onsei-dl").join("config.toml"))
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Loads the configuration, writing a default file first if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, read, or parsed.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            log::warn!(
                "wrote default config to {}; fill in account credentials",
                path.display()
            );
            return Ok(config);
        }
        Self::load(path)
    }

    /// Writes the configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Returns true when both account and password are set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.account.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_download_config() {
        let config = DownloadConfig::default();
        assert_eq!(config.concurrent_files, 4);
        assert!(!config.force_overwrite);
    }

    #[test]
    fn download_config_builder_pattern() {
        let config = DownloadConfig::new()
            .with_concurrent_files(8)
            .with_force_overwrite(true);
        assert_eq!(config.concurrent_files, 8);
        assert!(config.force_overwrite);
    }

    #[test]
    fn concurrent_files_clamped_to_one() {
        let config = DownloadConfig::new().with_concurrent_files(0);
        assert_eq!(config.concurrent_files, 1);
    }

    #[test]
    fn config_toml_round_trip() {
        let config = Config {
            account: "user".to_string(),
            password: "pass".to_string(),
            download_dir: PathBuf::from("/tmp/works"),
            max_workers: 6,
            subtitle: Some(true),
        };
        let raw = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.account, "user");
        assert_eq!(parsed.download_dir, PathBuf::from("/tmp/works"));
        assert_eq!(parsed.max_workers, 6);
        assert_eq!(parsed.subtitle, Some(true));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let parsed: Config = toml::from_str(r#"account = "user""#).unwrap();
        assert_eq!(parsed.account, "user");
        assert_eq!(parsed.max_workers, 4);
        assert_eq!(parsed.download_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn load_or_create_writes_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(!config.has_credentials());

        // Second call loads the file it just wrote
        let again = Config::load_or_create(&path).unwrap();
        assert_eq!(again.max_workers, config.max_workers);
    }
}
