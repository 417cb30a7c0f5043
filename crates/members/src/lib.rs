//! Bonus-member registry with tiered point accrual and promotion.
//!
//! Members enroll at Basic level and earn points through the registry.
//! Each tier applies its own multiplier to newly earned points, and a
//! promotion sweep moves members up to Silver or Gold once their qualifying
//! points meet the tier thresholds.
//!
//! # Core Concepts
//!
//! - **Member**: identity, enrollment date, personal details, balance and tier
//! - **Tier Catalog**: thresholds and multipliers for Basic, Silver and Gold
//! - **Identifier Issuer**: bounded random draw of unused member numbers
//! - **Member Registry**: the locked, keyed store of members
//! - **Promotion Engine**: the sweep that upgrades qualifying members
//!
//! # Invariants
//!
//! - Member numbers are unique within a registry
//! - Balances never decrease; negative amounts are rejected
//! - Tiers only move up, and an upgrade keeps number, details, date and balance

pub mod error;
pub mod issuer;
pub mod member;
pub mod personals;
pub mod promotion;
pub mod registry;
pub mod tier;

pub use error::{RegistryError, RegistryResult};
pub use issuer::IdIssuer;
pub use member::{Member, MemberId};
pub use personals::{PersonalDetails, Personals};
pub use promotion::{check_and_upgrade_all, Promotion, PromotionEngine};
pub use registry::MemberRegistry;
pub use tier::{MembershipLevel, TierCatalog};

// Re-export core types for convenience
pub use loyalty_core::Config;
