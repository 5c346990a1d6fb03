// Standard library
use std::path::{Path, PathBuf};
use std::{env, fs};

// 3rd party crates
use config::{Config, ConfigError, Environment, File};
use tracing::{error, info};

// Project imports
use crate::sources::constants::IP_SERVICES;

// Current module imports
use super::constants::{
    default_log_level, default_timeout, CONFIG_PATH_ENV, DEFAULT_CONFIG, ENV_PREFIX, LOG_LEVELS,
};
use super::errors::ValidationError;
use super::types::{ConfigManager, Log, Query, Settings, ValidatedSettings};

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            first: false,
            ipv6: false,
            simple: false,
        }
    }
}

impl Settings {
    pub fn get_log_level(&self) -> String {
        self.log.level.to_lowercase()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // Validate log level
        if !LOG_LEVELS.contains(&self.get_log_level().as_str()) {
            return Err(ValidationError::InvalidLogLevel(self.log.level.clone()));
        }

        if self.query.timeout == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        // Every override must name a built-in source
        for source in &self.sources {
            if !IP_SERVICES.iter().any(|s| s.name == source.name) {
                return Err(ValidationError::UnknownSource(source.name.clone()));
            }
        }

        let has_enabled_source = IP_SERVICES.iter().any(|service| {
            self.sources
                .iter()
                .filter(|s| s.name == service.name)
                .all(|s| s.enabled)
        });
        if !has_enabled_source {
            return Err(ValidationError::NoSourcesEnabled);
        }

        Ok(())
    }
}

impl ConfigManager {
    /// Loads and validates the configuration.
    ///
    /// An explicit `path` must exist; otherwise the file named by
    /// `MYIP_CONFIG_PATH` or the default one is used, and the default file is
    /// created when missing.
    pub fn new(path: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path: PathBuf = match path {
            Some(path) => path,
            None => {
                let path = Self::get_config_path()?;
                Self::ensure_config_file_exists(&path)?;
                path
            }
        };

        let settings: Settings = Self::load_settings(&config_path)?;

        // Validate settings before proceeding
        let settings = ValidatedSettings::new(settings).map_err(|e| {
            error!("Configuration validation failed: {}", e);
            e
        })?;

        Ok(ConfigManager {
            settings,
            config_path,
        })
    }

    /// Determines the configuration file path.
    fn get_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            Ok(PathBuf::from(path))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("myip").join("config.toml"))
        } else {
            let msg: &str = "Could not determine the configuration directory";
            error!("{}", msg);
            Err(ConfigError::Message(msg.into()))
        }
    }

    /// Ensures that the configuration file exists, creating it if necessary.
    fn ensure_config_file_exists(config_path: &Path) -> Result<(), ConfigError> {
        if !config_path.exists() {
            if let Some(parent_dir) = config_path.parent() {
                fs::create_dir_all(parent_dir).map_err(|e| {
                    let msg: String = format!("Failed to create configuration directory: {}", e);
                    error!("{}", msg);
                    ConfigError::Message(msg)
                })?;
            }
            fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                let msg: String = format!("Failed to create default configuration file: {}", e);
                error!("{}", msg);
                ConfigError::Message(msg)
            })?;
            info!("Default configuration file created at: {:?}", config_path);
        }
        Ok(())
    }

    /// Loads the settings from the configuration file and environment variables.
    fn load_settings(config_path: &Path) -> Result<Settings, ConfigError> {
        let config_file: &str = config_path.to_str().ok_or_else(|| {
            let msg: &str = "Configuration file path contains invalid UTF-8 characters";
            error!("{}", msg);
            ConfigError::Message(msg.into())
        })?;

        let settings: Config = Config::builder()
            .add_source(File::with_name(config_file))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get_log_level(&self) -> String {
        self.settings.get_log_level()
    }
}

impl ValidatedSettings {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(ValidatedSettings(settings))
    }
}

// Implement Deref to allow transparent access to Settings fields
impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
