// Standard library
use std::path::PathBuf;

// 3rd party crates
use serde::Deserialize;

// Current module imports
use super::constants::{default_enabled, default_log_level, default_timeout};

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Defaults for the command line flags.
#[derive(Debug, Deserialize, Clone)]
pub struct Query {
    /// Per-source request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(default)]
    pub simple: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Geo {
    /// GeoLite2-City database file.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

/// Overrides for one of the built-in sources.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub v4_url: Option<String>,
    #[serde(default)]
    pub v6_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub query: Query,
    #[serde(default)]
    pub geo: Geo,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Settings that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedSettings(pub(super) Settings);

/// Loads the settings once per invocation.
#[derive(Debug)]
pub struct ConfigManager {
    pub settings: ValidatedSettings,
    pub config_path: PathBuf,
}
