//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Server address settings
    #[serde(default)]
    pub target: TargetConfig,

    /// Wire format settings
    #[serde(default)]
    pub wire: WireConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Address of the store under test
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Host name or IP address
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// How a response is read off the connection
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// One bounded read; whatever arrives first is the response
    #[default]
    Single,
    /// Keep reading until a newline, EOF, or the byte limit
    Line,
}

/// Separator style for the JSON body
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Separators {
    /// `", "` between elements and `": "` after keys
    #[default]
    Spaced,
    /// No whitespace at all
    Compact,
}

/// Wire format settings
#[derive(Debug, Deserialize, Clone)]
pub struct WireConfig {
    /// Upper bound on captured response bytes
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    #[serde(default)]
    pub read_mode: ReadMode,

    #[serde(default)]
    pub separators: Separators,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_response_bytes: default_max_response_bytes(),
            read_mode: ReadMode::default(),
            separators: Separators::default(),
        }
    }
}

fn default_max_response_bytes() -> usize {
    4096
}

/// Timeout settings in seconds
///
/// Both are unset by default: a silent server stalls the run.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Timeouts {
    pub connect_secs: Option<u64>,
    pub read_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        if config.wire.max_response_bytes == 0 {
            return Err(Error::Config(
                "wire.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Host/port overrides layered on top of the config file
#[derive(Debug, Default, Clone)]
pub struct TargetOverride {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Resolved, immutable settings handed to the driver
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub max_response_bytes: usize,
    pub read_mode: ReadMode,
    pub separators: Separators,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

impl Settings {
    /// Resolve settings from a config, applying overrides in order
    ///
    /// Later overrides win, so pass the most specific source last.
    pub fn resolve(config: &Config, overrides: &[&TargetOverride]) -> Self {
        let mut host = config.target.host.clone();
        let mut port = config.target.port;
        for layer in overrides {
            if let Some(h) = &layer.host {
                host = h.clone();
            }
            if let Some(p) = layer.port {
                port = p;
            }
        }

        Self {
            host,
            port,
            max_response_bytes: config.wire.max_response_bytes,
            read_mode: config.wire.read_mode,
            separators: config.wire.separators,
            connect_timeout: config.timeouts.connect_secs.map(Duration::from_secs),
            read_timeout: config.timeouts.read_secs.map(Duration::from_secs),
        }
    }

    /// Settings pointing at an explicit host and port, defaults otherwise
    pub fn for_target(host: impl Into<String>, port: u16) -> Self {
        let overrides = TargetOverride {
            host: Some(host.into()),
            port: Some(port),
        };
        Self::resolve(&Config::default(), &[&overrides])
    }

    /// `host:port` string used for connecting and error messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&Config::default(), &[])
    }
}
