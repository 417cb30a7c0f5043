//! Membership tiers and the catalog of their thresholds and multipliers.
//!
//! # Tier Order
//!
//! ```text
//! Basic  (1.0x, no threshold)
//!     ↓ qualifying points >= silver_threshold
//! Silver (1.2x)
//!     ↓ qualifying points >= gold_threshold
//! Gold   (1.5x, terminal)
//! ```
//!
//! Basic may move straight to Gold when it already meets the Gold threshold.

use loyalty_core::TierConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Membership level of a bonus member.
///
/// The derived ordering follows promotion order: `Basic < Silver < Gold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MembershipLevel {
    /// Entry level, no accrual bonus
    Basic,
    /// Mid level
    Silver,
    /// Highest level; never upgraded further
    Gold,
}

impl MembershipLevel {
    /// Get the display label for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipLevel::Basic => "Basic",
            MembershipLevel::Silver => "Silver",
            MembershipLevel::Gold => "Gold",
        }
    }

    /// Check if no promotion exists beyond this level
    pub fn is_terminal(&self) -> bool {
        matches!(self, MembershipLevel::Gold)
    }
}

impl fmt::Display for MembershipLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipLevel {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(MembershipLevel::Basic),
            "silver" => Ok(MembershipLevel::Silver),
            "gold" => Ok(MembershipLevel::Gold),
            other => Err(RegistryError::InvalidArgument(format!(
                "unknown membership level: {}",
                other
            ))),
        }
    }
}

/// Thresholds and accrual multipliers for every tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCatalog {
    silver_threshold: u64,
    gold_threshold: u64,
    silver_multiplier_percent: u32,
    gold_multiplier_percent: u32,
}

impl TierCatalog {
    /// Build a catalog from validated tier settings.
    pub fn from_config(config: &TierConfig) -> Self {
        Self {
            silver_threshold: config.silver_threshold,
            gold_threshold: config.gold_threshold,
            silver_multiplier_percent: config.silver_multiplier_percent,
            gold_multiplier_percent: config.gold_multiplier_percent,
        }
    }

    /// Minimum qualifying points for entry into `level`. Basic has none.
    pub fn threshold(&self, level: MembershipLevel) -> Option<u64> {
        match level {
            MembershipLevel::Basic => None,
            MembershipLevel::Silver => Some(self.silver_threshold),
            MembershipLevel::Gold => Some(self.gold_threshold),
        }
    }

    /// Accrual multiplier of `level` as a whole percentage.
    pub fn multiplier_percent(&self, level: MembershipLevel) -> u32 {
        match level {
            MembershipLevel::Basic => 100,
            MembershipLevel::Silver => self.silver_multiplier_percent,
            MembershipLevel::Gold => self.gold_multiplier_percent,
        }
    }

    /// Points credited for `amount` earned at `level`: `floor(amount * multiplier)`.
    pub fn accrual(&self, level: MembershipLevel, amount: u64) -> u64 {
        scale_points(amount, self.multiplier_percent(level))
    }

    /// Highest level whose threshold `points` meets. Gold is checked first.
    pub fn qualifying_level(&self, points: u64) -> MembershipLevel {
        if points >= self.gold_threshold {
            MembershipLevel::Gold
        } else if points >= self.silver_threshold {
            MembershipLevel::Silver
        } else {
            MembershipLevel::Basic
        }
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self::from_config(&TierConfig::default())
    }
}

/// `floor(amount * percent / 100)` in exact integer arithmetic, saturating.
pub(crate) fn scale_points(amount: u64, percent: u32) -> u64 {
    let scaled = u128::from(amount) * u128::from(percent) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
