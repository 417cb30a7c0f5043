//! Member-number issuance.
//!
//! Numbers are drawn at random from `0..id_space` and checked against the
//! numbers already in use. The draw loop is bounded: after `max_attempts`
//! collisions the issuer reports `CapacityExhausted` instead of spinning.

use loyalty_core::IssuerConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::member::MemberId;

/// Random member-number generator owning its own RNG.
#[derive(Debug)]
pub struct IdIssuer {
    rng: StdRng,
    id_space: u32,
    max_attempts: u32,
}

impl IdIssuer {
    /// Create an issuer over `0..id_space` with a caller-supplied RNG.
    pub fn new(rng: StdRng, id_space: u32, max_attempts: u32) -> RegistryResult<Self> {
        if id_space == 0 || max_attempts == 0 {
            return Err(RegistryError::InvalidArgument(
                "issuer needs a non-empty id space and at least one attempt".to_string(),
            ));
        }
        Ok(Self {
            rng,
            id_space,
            max_attempts,
        })
    }

    /// Deterministic issuer for reproducible numbering.
    pub fn seeded(seed: u64, id_space: u32, max_attempts: u32) -> RegistryResult<Self> {
        Self::new(StdRng::seed_from_u64(seed), id_space, max_attempts)
    }

    /// Build from configuration, falling back to OS entropy without a seed.
    pub fn from_config(config: &IssuerConfig) -> RegistryResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng, config.id_space, config.max_attempts)
    }

    pub fn id_space(&self) -> u32 {
        self.id_space
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw a member number not present in `existing`.
    pub fn next<V>(&mut self, existing: &HashMap<MemberId, V>) -> RegistryResult<MemberId> {
        if existing.len() as u64 >= u64::from(self.id_space) {
            warn!(id_space = self.id_space, "Member number space is full");
            return Err(RegistryError::CapacityExhausted {
                attempts: 0,
                id_space: self.id_space,
            });
        }

        for attempt in 1..=self.max_attempts {
            let candidate = MemberId::new(self.rng.gen_range(0..self.id_space));
            if !existing.contains_key(&candidate) {
                return Ok(candidate);
            }
            debug!(member_id = %candidate, attempt, "Member number collision, redrawing");
        }

        warn!(
            attempts = self.max_attempts,
            in_use = existing.len(),
            id_space = self.id_space,
            "No free member number within retry budget"
        );
        Err(RegistryError::CapacityExhausted {
            attempts: self.max_attempts,
            id_space: self.id_space,
        })
    }
}

impl Default for IdIssuer {
    fn default() -> Self {
        let config = IssuerConfig::default();
        Self {
            rng: StdRng::from_entropy(),
            id_space: config.id_space,
            max_attempts: config.max_attempts,
        }
    }
}
