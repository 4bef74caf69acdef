//! Configuration management
//!
//! Loads panel address, credentials and client settings from a TOML file.

use crate::http::HttpOptions;
use crate::models::Credentials;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Panel address and login
    #[serde(default)]
    pub panel: PanelConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Polling settings for watch mode
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PanelConfig {
    /// Web interface URL; https is assumed when no scheme is given
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub userid: String,

    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Accept the panel's self-signed certificate
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    /// Poll interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_poll_interval() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Prefix `https://` when the URL has no scheme and drop trailing slashes
pub fn normalize_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() || url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

impl Config {
    /// Load configuration from `path`, or from the first default location
    /// that exists. Falls back to defaults when there is no file at all.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let config_paths = [
            PathBuf::from("spcweb.toml"),
            PathBuf::from("/etc/spcweb/config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".config/spcweb/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents).context("Failed to parse config file")?;
        config.panel.url = normalize_url(&config.panel.url);
        Ok(config)
    }

    /// Check the settings needed to talk to a panel
    pub fn validate(&self) -> Result<()> {
        if self.panel.url.is_empty() {
            bail!("panel.url is not set");
        }
        if self.panel.userid.is_empty() {
            bail!("panel.userid is not set");
        }
        if self.watch.poll_interval == 0 {
            bail!("watch.poll_interval must be at least 1 second");
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.panel.userid, &self.panel.password)
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            timeout: Duration::from_secs(self.http.timeout),
            connect_timeout: Duration::from_secs(self.http.connect_timeout),
            accept_invalid_certs: self.http.accept_invalid_certs,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.watch.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("192.168.1.100"), "https://192.168.1.100");
        assert_eq!(normalize_url("http://spc.local/"), "http://spc.local");
        assert_eq!(normalize_url(" https://spc.local:443 "), "https://spc.local:443");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn test_parse_full_config() {
        let cfg = Config::parse(
            r#"
            [panel]
            url = "10.0.0.5"
            userid = "engineer"
            password = "1111"

            [http]
            timeout = 20
            accept_invalid_certs = true

            [watch]
            poll_interval = 15

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.panel.url, "https://10.0.0.5");
        assert_eq!(cfg.credentials().userid, "engineer");
        assert_eq!(cfg.http.timeout, 20);
        assert_eq!(cfg.http.connect_timeout, 5);
        assert!(cfg.http_options().accept_invalid_certs);
        assert_eq!(cfg.poll_interval(), Duration::from_secs(15));
        assert_eq!(cfg.logging.level, "debug");
        cfg.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::parse("[panel]\nurl = \"http://spc\"\nuserid = \"u\"\n").unwrap();
        assert_eq!(cfg.http_options().timeout, Duration::from_secs(10));
        assert_eq!(cfg.watch.poll_interval, 30);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_missing_panel() {
        let cfg = Config::parse("").unwrap();
        assert!(cfg.validate().is_err());

        let cfg = Config::parse("[panel]\nurl = \"spc\"\n").unwrap();
        assert!(cfg.validate().is_err());

        let cfg = Config::parse("[panel]\nurl = \"spc\"\nuserid = \"u\"\n[watch]\npoll_interval = 0\n")
            .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[panel]\nurl = \"spc.example\"\nuserid = \"admin\"").unwrap();

        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.panel.url, "https://spc.example");
        assert_eq!(cfg.panel.userid, "admin");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/spcweb.toml"))).is_err());
    }
}
