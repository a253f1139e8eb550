//! # Configuration Utilities
//!
//! Client configuration for reaching the steganography service.
//!
//! The only setting that really matters is the service base URL. It can come
//! from a TOML file, from the `HIDEOUT_API_URL` environment variable, or fall
//! back to the local development endpoint.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the base URL.
pub const API_URL_ENV: &str = "HIDEOUT_API_URL";

/// Client-side bound on every request (image processing can be slow).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ClientConfig = load_config("config/hideout.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Client configuration.
///
/// # Example TOML
///
/// ```toml
/// [api]
/// base_url = "http://localhost:8000"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where and how to reach the steganography service
    #[serde(default)]
    pub api: ApiSettings,
}

/// Connection settings for the steganography service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Service base URL (e.g., "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// The configured timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Replaces the base URL when `value` holds a non-blank URL.
    ///
    /// Blank values are ignored so that an exported-but-empty variable
    /// behaves the same as an unset one.
    pub fn override_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
    }
}

impl ClientConfig {
    /// Loads client configuration from a TOML file.
    ///
    /// Missing sections and keys fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config(path)
    }

    /// Builds the configuration from the environment alone.
    pub fn from_env() -> Self {
        Self::default().with_env_override()
    }

    /// Applies `HIDEOUT_API_URL` on top of this configuration.
    pub fn with_env_override(mut self) -> Self {
        self.api.override_base_url(std::env::var(API_URL_ENV).ok());
        self
    }

    /// Applies command-line values, which win over both file and environment.
    pub fn with_cli_overrides(
        mut self,
        api_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        self.api.override_base_url(api_url);
        if let Some(secs) = timeout_secs {
            self.api.timeout_secs = secs;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://stego.internal:9000\"\ntimeout_secs = 5").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://stego.internal:9000");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\ntimeout_secs = 10").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, 10);

        let empty = tempfile::NamedTempFile::new().unwrap();
        let config = ClientConfig::from_file(empty.path()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ClientConfig::from_file("does/not/exist.toml").is_err());
    }

    // Only test in the crate that touches HIDEOUT_API_URL.
    #[test]
    fn test_env_override_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://from-file:9000\"\ntimeout_secs = 5").unwrap();

        std::env::set_var(API_URL_ENV, "http://from-env:7000");

        assert_eq!(ClientConfig::from_env().api.base_url, "http://from-env:7000");

        // env beats file, timeout from file survives
        let config = ClientConfig::from_file(file.path()).unwrap().with_env_override();
        assert_eq!(config.api.base_url, "http://from-env:7000");
        assert_eq!(config.api.timeout_secs, 5);

        // flag beats env
        let config =
            config.with_cli_overrides(Some("http://from-flag:6000".to_string()), Some(12));
        assert_eq!(config.api.base_url, "http://from-flag:6000");
        assert_eq!(config.api.timeout_secs, 12);

        std::env::set_var(API_URL_ENV, "  ");
        assert_eq!(ClientConfig::from_env().api.base_url, DEFAULT_API_URL);

        std::env::remove_var(API_URL_ENV);
        assert_eq!(ClientConfig::from_env(), ClientConfig::default());
        let config = ClientConfig::from_file(file.path()).unwrap().with_env_override();
        assert_eq!(config.api.base_url, "http://from-file:9000");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut settings = ApiSettings::default();
        settings.override_base_url(Some("   ".to_string()));
        assert_eq!(settings.base_url, DEFAULT_API_URL);

        settings.override_base_url(None);
        assert_eq!(settings.base_url, DEFAULT_API_URL);

        settings.override_base_url(Some("http://10.0.0.2:8000".to_string()));
        assert_eq!(settings.base_url, "http://10.0.0.2:8000");
    }
}
