//! Deployment Configuration
//!
//! Handles loading and saving deployment configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shroud_oracle::OracleRole;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShroudConfig {
    /// Require protocol settings
    #[serde(default)]
    pub oracle: OracleSettings,

    /// Ciphertext registry settings
    #[serde(default)]
    pub registry: RegistrySettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for ShroudConfig {
    fn default() -> Self {
        Self {
            oracle: OracleSettings::default(),
            registry: RegistrySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ShroudConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Oracle deployment configuration
    pub fn oracle() -> Self {
        Self {
            oracle: OracleSettings {
                mode: OracleRole::Oracle,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Node deployment configuration; nodes must know the oracle's
    /// public key to verify require records
    pub fn node(oracle_public_key: &str) -> Self {
        Self {
            oracle: OracleSettings {
                mode: OracleRole::Node,
                oracle_public_key: Some(oracle_public_key.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Require store path must not be empty".to_string()
            ));
        }

        match (self.oracle.mode, &self.oracle.oracle_public_key) {
            (OracleRole::Node, None) => {
                return Err(ConfigError::Invalid(
                    "Node mode requires oracle_public_key".to_string()
                ));
            }
            (_, Some(key)) => {
                let decoded = hex::decode(key).map_err(|e| {
                    ConfigError::Invalid(format!("Oracle public key is not hex: {}", e))
                })?;
                if decoded.len() != 32 {
                    return Err(ConfigError::Invalid(format!(
                        "Oracle public key must decode to 32 bytes, got {}",
                        decoded.len()
                    )));
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Require protocol settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Which side of the require protocol this deployment runs.
    /// Anything other than "oracle" or "node" fails at parse time.
    pub mode: OracleRole,

    /// Path of the require record database
    pub store_path: PathBuf,

    /// Extra store attempts after a failed read or write
    pub require_retry_count: u8,

    /// Hex-encoded ed25519 key require records are verified against.
    /// Required in node mode; ignored by the oracle, which signs with
    /// its own key.
    pub oracle_public_key: Option<String>,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            mode: OracleRole::Oracle,
            store_path: PathBuf::from("./shroud_data/require.redb"),
            require_retry_count: 3,
            oracle_public_key: None,
        }
    }
}

/// Ciphertext registry settings
///
/// The garbage collection fields are sweep hints for the embedding
/// host; the registry itself never drops entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// How many ciphertexts the host should collect per sweep
    pub ciphertexts_to_garbage_collect: u64,

    /// Seconds between collection sweeps
    pub ciphertexts_garbage_collect_interval_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            ciphertexts_to_garbage_collect: 10_000,
            ciphertexts_garbage_collect_interval_secs: 300,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
        }
    }
}

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "shroud", "shroud")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".shroud"))
}

/// Get default config file path
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn hex_key() -> String {
        hex::encode([0x11u8; 32])
    }

    #[test]
    fn test_default_config() {
        let config = ShroudConfig::default();
        assert_eq!(config.oracle.mode, OracleRole::Oracle);
        assert_eq!(config.oracle.require_retry_count, 3);
        assert_eq!(config.registry.ciphertexts_to_garbage_collect, 10_000);
    }

    #[test]
    fn test_node_config() {
        let config = ShroudConfig::node(&hex_key());
        assert_eq!(config.oracle.mode, OracleRole::Node);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = ShroudConfig::node(&hex_key());
        config.save(&path).unwrap();

        let loaded = ShroudConfig::load(&path).unwrap();
        assert_eq!(loaded.oracle.mode, OracleRole::Node);
        assert_eq!(loaded.oracle.oracle_public_key, Some(hex_key()));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ShroudConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_node_without_key_invalid() {
        let config = ShroudConfig {
            oracle: OracleSettings {
                mode: OracleRole::Node,
                oracle_public_key: None,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_key_invalid() {
        let config = ShroudConfig::node(&hex::encode([0x11u8; 16]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_hex_key_invalid() {
        let config = ShroudConfig::node("not hex at all");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_mode_fails_at_parse() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[oracle]\nmode = \"auditor\"\n").unwrap();

        let err = ShroudConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_store_path_invalid() {
        let config = ShroudConfig {
            oracle: OracleSettings {
                store_path: PathBuf::new(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
