//! Core functionality for the bonus-member loyalty system.
//!
//! This crate provides the configuration, logging and error plumbing shared
//! by the member registry and its drivers.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, IssuerConfig, TierConfig};
pub use error::{CoreError as Error, Result};
