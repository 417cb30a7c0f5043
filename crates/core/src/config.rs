//! Configuration management for the loyalty system.

use serde::{Deserialize, Serialize};
#[cfg(feature = "toml")]
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub tiers: TierConfig,
    pub issuer: IssuerConfig,
}

/// Tier thresholds and accrual multipliers.
///
/// Multipliers are whole percentages (`120` means 1.2x) so accrual can be
/// floored exactly in integer arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub silver_threshold: u64,
    pub gold_threshold: u64,
    pub silver_multiplier_percent: u32,
    pub gold_multiplier_percent: u32,
}

/// Member-number issuance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Identifiers are drawn from `0..id_space`
    pub id_space: u32,
    /// Random draws before the issuer gives up
    pub max_attempts: u32,
    /// Fixed RNG seed; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            silver_threshold: 25_000,
            gold_threshold: 75_000,
            silver_multiplier_percent: 120,
            gold_multiplier_percent: 150,
        }
    }
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            id_space: 1_000_000,
            max_attempts: 64,
            seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            tiers: TierConfig::default(),
            issuer: IssuerConfig::default(),
        }
    }

    /// Reject settings that would break tier ordering or issuer liveness.
    pub fn validate(&self) -> Result<()> {
        let tiers = &self.tiers;
        if tiers.silver_threshold == 0 {
            return Err(CoreError::Config(
                "silver_threshold must be greater than zero".to_string(),
            ));
        }
        if tiers.gold_threshold <= tiers.silver_threshold {
            return Err(CoreError::Config(format!(
                "gold_threshold {} must exceed silver_threshold {}",
                tiers.gold_threshold, tiers.silver_threshold
            )));
        }
        if tiers.silver_multiplier_percent < 100 {
            return Err(CoreError::Config(format!(
                "silver_multiplier_percent {} is below 100",
                tiers.silver_multiplier_percent
            )));
        }
        if tiers.gold_multiplier_percent < tiers.silver_multiplier_percent {
            return Err(CoreError::Config(format!(
                "gold_multiplier_percent {} is below silver_multiplier_percent {}",
                tiers.gold_multiplier_percent, tiers.silver_multiplier_percent
            )));
        }
        if self.issuer.id_space == 0 {
            return Err(CoreError::Config("id_space must be non-empty".to_string()));
        }
        if self.issuer.max_attempts == 0 {
            return Err(CoreError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
