//! Configuration: defaults, TOML file loading, environment overrides.
//!
//! Monetary limits are configured in cents so the file format stays
//! unambiguous; accessors hand out [`Amount`] values.

use crate::errors::ConfigError;
use crate::money::Amount;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CasinoConfig {
    pub ledger: LedgerConfig,
    pub table: TableConfig,
    pub storage: StorageConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Balance granted at registration, in cents.
    pub opening_balance_cents: i64,
    /// Bounded retry budget for optimistic commit conflicts.
    pub max_commit_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            opening_balance_cents: 100_000, // 1000.00
            max_commit_attempts: 4,
        }
    }
}

impl LedgerConfig {
    pub fn opening_balance(&self) -> Amount {
        Amount::from_cents(self.opening_balance_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub min_bet_cents: i64,
    pub max_bet_cents: i64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_bet_cents: 100,        // 1.00
            max_bet_cents: 1_000_000,  // 10000.00
        }
    }
}

impl TableConfig {
    pub fn min_bet(&self) -> Amount {
        Amount::from_cents(self.min_bet_cents)
    }

    pub fn max_bet(&self) -> Amount {
        Amount::from_cents(self.max_bet_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./casino_data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub default_query_limit: usize,
    pub max_query_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_query_limit: 50,
            max_query_limit: 500,
        }
    }
}

/// Configuration loader with environment variable support.
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables.
    pub fn load(&self) -> Result<CasinoConfig, ConfigError> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            CasinoConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        validate(&config)?;
        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> Result<CasinoConfig, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("failed to read {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::Load(format!("failed to parse TOML: {}", e)))
    }

    fn apply_env_overrides(&self, config: &mut CasinoConfig) -> Result<(), ConfigError> {
        if let Ok(dir) = env::var("CROUPIER_DATA_DIR") {
            config.storage.data_dir = dir;
        }
        if let Ok(cents) = env::var("CROUPIER_OPENING_BALANCE_CENTS") {
            config.ledger.opening_balance_cents =
                cents.parse().map_err(|_| ConfigError::Invalid {
                    field: "CROUPIER_OPENING_BALANCE_CENTS",
                    reason: format!("not an integer cent count: {}", cents),
                })?;
        }
        if let Ok(attempts) = env::var("CROUPIER_MAX_COMMIT_ATTEMPTS") {
            config.ledger.max_commit_attempts =
                attempts.parse().map_err(|_| ConfigError::Invalid {
                    field: "CROUPIER_MAX_COMMIT_ATTEMPTS",
                    reason: format!("not a count: {}", attempts),
                })?;
        }
        if let Ok(cents) = env::var("CROUPIER_MIN_BET_CENTS") {
            config.table.min_bet_cents = cents.parse().map_err(|_| ConfigError::Invalid {
                field: "CROUPIER_MIN_BET_CENTS",
                reason: format!("not an integer cent count: {}", cents),
            })?;
        }
        if let Ok(cents) = env::var("CROUPIER_MAX_BET_CENTS") {
            config.table.max_bet_cents = cents.parse().map_err(|_| ConfigError::Invalid {
                field: "CROUPIER_MAX_BET_CENTS",
                reason: format!("not an integer cent count: {}", cents),
            })?;
        }
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, config: &CasinoConfig, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::Load(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::Load(format!("failed to write {}: {}", path, e)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(config: &CasinoConfig) -> Result<(), ConfigError> {
    if config.ledger.opening_balance_cents < 0 {
        return Err(ConfigError::Invalid {
            field: "ledger.opening_balance_cents",
            reason: "opening balance cannot be negative".to_string(),
        });
    }
    if config.ledger.max_commit_attempts == 0 {
        return Err(ConfigError::Invalid {
            field: "ledger.max_commit_attempts",
            reason: "at least one commit attempt is required".to_string(),
        });
    }
    if config.table.min_bet_cents <= 0 {
        return Err(ConfigError::Invalid {
            field: "table.min_bet_cents",
            reason: "table minimum must be positive".to_string(),
        });
    }
    if config.table.max_bet_cents < config.table.min_bet_cents {
        return Err(ConfigError::Invalid {
            field: "table.max_bet_cents",
            reason: "table maximum cannot be below the minimum".to_string(),
        });
    }
    if config.storage.data_dir.is_empty() {
        return Err(ConfigError::Invalid {
            field: "storage.data_dir",
            reason: "data directory cannot be empty".to_string(),
        });
    }
    if config.history.default_query_limit == 0
        || config.history.default_query_limit > config.history.max_query_limit
    {
        return Err(ConfigError::Invalid {
            field: "history.default_query_limit",
            reason: "default limit must be positive and within the maximum".to_string(),
        });
    }
    Ok(())
}
