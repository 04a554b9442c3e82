//! Installer settings.
//!
//! Read from a JSON file; every field has a default so an absent file or a
//! partial one is fine. Command line flags are applied on top by `main`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{InstallerError, Result};

const DEFAULT_FTL_RELEASE_URL: &str = "https://github.com/pi-hole/FTL/releases/latest/download/";

/// What to do when no FTL binary matches the host architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownArchitecturePolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FtlSettings {
    /// Directory URL the artifact name is appended to
    pub release_url: String,
    pub install_path: PathBuf,
    pub expected_sha256: Option<String>,
}

impl Default for FtlSettings {
    fn default() -> Self {
        Self {
            release_url: DEFAULT_FTL_RELEASE_URL.to_string(),
            install_path: PathBuf::from("/usr/bin/pihole-FTL"),
            expected_sha256: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub minimum_centos_version: u32,
    pub php_target_major: u64,
    pub remi_repository: String,
    pub unknown_architecture: UnknownArchitecturePolicy,
    /// Answer yes to every prompt
    pub assume_yes: bool,
    pub update_package_cache: bool,
    pub setup_vars_path: PathBuf,
    pub ftl: FtlSettings,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            minimum_centos_version: 7,
            php_target_major: 7,
            remi_repository: "remi-php72".to_string(),
            unknown_architecture: UnknownArchitecturePolicy::Abort,
            assume_yes: false,
            update_package_cache: true,
            setup_vars_path: PathBuf::from("/etc/pihole/setupVars.conf"),
            ftl: FtlSettings::default(),
        }
    }
}

impl InstallerConfig {
    /// `<config dir>/pihole-preflight/config.json` for the current user
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("net", "pi-hole", "pihole-preflight")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from `path`, or from [`Self::default_path`] when none is given.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                return Err(InstallerError::config_error(
                    path.display().to_string(),
                    "Configuration file does not exist",
                ));
            }
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            InstallerError::io_error(
                "read configuration",
                Some(path.display().to_string()),
                e,
            )
        })?;
        let config = Self::from_json(&content)
            .map_err(|e| InstallerError::config_error(path.display().to_string(), e))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.minimum_centos_version == 0 {
            return Err("minimum_centos_version must be greater than zero".to_string());
        }
        if self.php_target_major == 0 {
            return Err("php_target_major must be greater than zero".to_string());
        }
        if self.remi_repository.trim().is_empty() {
            return Err("remi_repository cannot be empty".to_string());
        }

        let url = Url::parse(&self.ftl.release_url)
            .map_err(|e| format!("Invalid ftl.release_url '{}': {e}", self.ftl.release_url))?;
        if url.scheme() != "https" {
            return Err("ftl.release_url must use HTTPS".to_string());
        }

        if let Some(sum) = &self.ftl.expected_sha256 {
            if sum.len() != 64 || !sum.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("ftl.expected_sha256 must be 64 hex characters".to_string());
            }
        }

        Ok(())
    }

    /// Download URL for an FTL artifact
    pub fn ftl_download_url(&self, artifact: &str) -> Result<Url> {
        let mut base = self.ftl.release_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join(artifact))
            .map_err(|e| InstallerError::config_error("ftl.release_url", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = InstallerConfig::default();
        assert_eq!(config.minimum_centos_version, 7);
        assert_eq!(config.php_target_major, 7);
        assert_eq!(
            config.unknown_architecture,
            UnknownArchitecturePolicy::Abort
        );
        assert!(!config.assume_yes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            InstallerConfig::from_json(r#"{"unknown_architecture": "skip", "ftl": {"install_path": "/opt/ftl"}}"#)
                .unwrap();
        assert_eq!(config.unknown_architecture, UnknownArchitecturePolicy::Skip);
        assert_eq!(config.ftl.install_path, PathBuf::from("/opt/ftl"));
        assert_eq!(config.ftl.release_url, DEFAULT_FTL_RELEASE_URL);
        assert_eq!(config.minimum_centos_version, 7);
    }

    #[test]
    fn test_rejects_unknown_fields_and_bad_values() {
        assert!(InstallerConfig::from_json(r#"{"nonsense": true}"#).is_err());
        assert!(InstallerConfig::from_json(r#"{"minimum_centos_version": 0}"#).is_err());
        assert!(
            InstallerConfig::from_json(r#"{"ftl": {"release_url": "http://example.com/"}}"#)
                .is_err()
        );
        assert!(
            InstallerConfig::from_json(r#"{"ftl": {"expected_sha256": "abc"}}"#).is_err()
        );
    }

    #[test]
    fn test_ftl_download_url() {
        let config = InstallerConfig::default();
        assert_eq!(
            config
                .ftl_download_url("pihole-FTL-linux-x86_64")
                .unwrap()
                .as_str(),
            "https://github.com/pi-hole/FTL/releases/latest/download/pihole-FTL-linux-x86_64"
        );

        let mut config = InstallerConfig::default();
        config.ftl.release_url = "https://mirror.example.com/ftl".to_string();
        assert_eq!(
            config.ftl_download_url("pihole-FTL-aarch64-linux-gnu").unwrap().as_str(),
            "https://mirror.example.com/ftl/pihole-FTL-aarch64-linux-gnu"
        );
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = InstallerConfig::load(Some(&temp.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, InstallerError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"assume_yes": true, "update_package_cache": false}"#).unwrap();

        let config = InstallerConfig::load(Some(&path)).unwrap();
        assert!(config.assume_yes);
        assert!(!config.update_package_cache);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = InstallerConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
