/// Configuration management for iksctl
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::iam::IAM_TOKEN_URL;
use crate::iks::client::IKS_API_BASE;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Node-reload polling settings
    #[serde(default)]
    pub reload: ReloadConfig,
}

/// IAM and container-service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// IAM token endpoint
    #[serde(default = "default_iam_url")]
    pub iam_url: String,

    /// Container-service base URL, ending with '/'
    #[serde(default = "default_containers_url")]
    pub containers_url: String,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Timing of the sequential node-reload workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Wait after issuing a reload before the first readiness check
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Interval between readiness checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Give up on a worker after this long
    #[serde(default = "default_reload_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_iam_url() -> String {
    IAM_TOKEN_URL.to_string()
}

fn default_containers_url() -> String {
    IKS_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_initial_delay_secs() -> u64 {
    20
}

fn default_poll_interval_secs() -> u64 {
    120
}

fn default_reload_timeout_secs() -> u64 {
    3600
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            iam_url: default_iam_url(),
            containers_url: default_containers_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_reload_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::example()
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("cannot parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_url("endpoints.iam_url", &self.endpoints.iam_url)?;
        self.validate_url("endpoints.containers_url", &self.endpoints.containers_url)?;

        // Paths are appended to the base as-is
        if !self.endpoints.containers_url.ends_with('/') {
            return Err(Error::config("endpoints.containers_url must end with '/'"));
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be positive"));
        }
        if self.reload.poll_interval_secs == 0 {
            return Err(Error::config("reload.poll_interval_secs must be positive"));
        }
        if self.reload.timeout_secs == 0 {
            return Err(Error::config("reload.timeout_secs must be positive"));
        }

        Ok(())
    }

    fn validate_url(&self, field: &str, value: &str) -> Result<()> {
        url::Url::parse(value)
            .map(|_| ())
            .map_err(|e| Error::config(format!("{} is not a valid URL ({}): {}", field, e, value)))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Generate an example configuration file
    pub fn example() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            http: HttpConfig::default(),
            reload: ReloadConfig::default(),
        }
    }
}
