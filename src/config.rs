//! User configuration loaded from `~/.songbook/config.yaml`

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_BASE_URL, DEFAULT_FIREBASE_AUTH_URL,
    DEFAULT_FIRESTORE_URL, DEFAULT_LOCATION_LOOKUP_URL, DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS,
};

/// Where the last known location comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationSourceKind {
    /// Coordinates taken verbatim from the config file
    Fixed,
    /// IP geolocation lookup
    #[default]
    Ip,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub auth_url: String,
    pub firestore_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        FirebaseConfig {
            api_key: String::new(),
            project_id: String::new(),
            auth_url: String::from(DEFAULT_FIREBASE_AUTH_URL),
            firestore_url: String::from(DEFAULT_FIRESTORE_URL),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub source: LocationSourceKind,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub lookup_url: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            source: LocationSourceKind::default(),
            latitude: None,
            longitude: None,
            lookup_url: String::from(DEFAULT_LOCATION_LOOKUP_URL),
        }
    }
}

/// Top-level configuration; every key is optional
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub firebase: FirebaseConfig,
    pub location: LocationConfig,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            firebase: FirebaseConfig::default(),
            location: LocationConfig::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// `~/.songbook`, or `./.songbook` when there is no home directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolved log file path
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join(DEFAULT_LOG_FILE))
    }

    pub fn api_base(&self) -> Result<Url> {
        parse_base_url(&self.api_base_url)
    }

    pub fn firebase_auth_base(&self) -> Result<Url> {
        parse_base_url(&self.firebase.auth_url)
    }

    pub fn firestore_base(&self) -> Result<Url> {
        parse_base_url(&self.firebase.firestore_url)
    }
}

/// Parse a base URL and make sure it ends with `/` so relative joins append
/// instead of replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).with_context(|| format!("invalid base URL '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.location.source, LocationSourceKind::Ip);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "firebase:\n  api_key: abc\n  project_id: demo\nlocation:\n  source: fixed\n  latitude: 10.5\n  longitude: -3.25\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.firebase.api_key, "abc");
        assert_eq!(config.firebase.project_id, "demo");
        assert_eq!(config.firebase.auth_url, DEFAULT_FIREBASE_AUTH_URL);
        assert_eq!(config.location.source, LocationSourceKind::Fixed);
        assert_eq!(config.location.latitude, Some(10.5));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "timeout_secs: [not, a, number]").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(url.join("albums").unwrap().as_str(), "http://localhost:8080/api/albums");
    }
}
