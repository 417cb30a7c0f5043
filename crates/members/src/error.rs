//! Error types for member registry operations.

use thiserror::Error;

use crate::member::MemberId;

/// Errors that can occur in registry, issuance and promotion operations.
///
/// None of these are fatal: the registry stays usable after any failed call.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Operation referenced an unknown member number
    #[error("Member not found: {member_id}")]
    NotFound { member_id: MemberId },

    /// Negative amount or missing input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Issuer could not find a free member number within its retry budget
    #[error("No free member number after {attempts} attempts (id space {id_space})")]
    CapacityExhausted { attempts: u32, id_space: u32 },

    /// Identity mismatch or tier regression on replace
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Credential check rejected the supplied secret
    #[error("Invalid credentials for member {member_id}")]
    InvalidCredentials { member_id: MemberId },

    /// Configuration errors
    #[error("Core error: {0}")]
    Core(#[from] loyalty_core::Error),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
