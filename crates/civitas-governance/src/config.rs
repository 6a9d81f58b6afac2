//! Governance configuration.
//!
//! Fixed at construction time; the core never mutates it afterwards.
//! Loaded from TOML:
//!
//! ```toml
//! quorum = "500000000000000000000001"
//! treasury = "0x0000000000000000000000000000000000000da0"
//! policy = "majority_for"
//! check_treasury_on_create = true
//! ```

use std::path::Path;

use civitas_types::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::FinalizationPolicy;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Governance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Combined vote weight that must be strictly exceeded to finalize
    pub quorum: U256,
    /// Custody address holding treasury funds on the funds ledger
    pub treasury: Address,
    /// Outcome rule applied after quorum
    pub policy: FinalizationPolicy,
    /// Reject proposals whose amount already exceeds the treasury balance
    pub check_treasury_on_create: bool,
}

impl GovernanceConfig {
    /// Treasury custody account used when none is configured.
    pub const DEFAULT_TREASURY: Address = Address::from_low_u64(0xda0);

    /// Create a configuration with the given quorum and defaults elsewhere.
    pub fn with_quorum(quorum: U256) -> Self {
        Self {
            quorum,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GovernanceConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Render configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_toml_string()?)?;
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.treasury.is_zero() {
            return Err(ConfigError::Invalid(
                "treasury address cannot be the zero address".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            quorum: U256::ZERO,
            treasury: Self::DEFAULT_TREASURY,
            policy: FinalizationPolicy::default(),
            check_treasury_on_create: true,
        }
    }
}
