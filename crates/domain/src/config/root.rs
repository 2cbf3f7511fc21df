use serde::{Deserialize, Serialize};

use super::client::ClientConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::network::{validate_hostname_pattern, NetworkConfig};

/// Main configuration structure for ferrous-lookup
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Query exchange settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Connection policy applied by the dialer
    #[serde(default)]
    pub network: NetworkConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-lookup.toml in current directory
    /// 3. /etc/ferrous-lookup/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(timeout) = overrides.timeout_secs {
            self.client.timeout_secs = timeout;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self.network
            .block_hostnames
            .extend(overrides.block_hostnames);
        self.network.blacklist_ips.extend(overrides.blacklist_ips);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "client.timeout_secs cannot be 0".to_string(),
            ));
        }

        for pattern in &self.network.block_hostnames {
            validate_hostname_pattern(pattern).map_err(ConfigError::Validation)?;
        }

        for cidr in &self.network.blacklist_ips {
            cidr.parse::<ipnetwork::IpNetwork>().map_err(|e| {
                ConfigError::Validation(format!("Invalid blacklist range '{}': {}", cidr, e))
            })?;
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("ferrous-lookup.toml").exists() {
            Some("ferrous-lookup.toml".to_string())
        } else if std::path::Path::new("/etc/ferrous-lookup/config.toml").exists() {
            Some("/etc/ferrous-lookup/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub block_hostnames: Vec<String>,
    pub blacklist_ips: Vec<String>,
}
