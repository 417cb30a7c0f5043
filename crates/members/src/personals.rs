//! Personal details attached to a member.
//!
//! The registry treats personal details as opaque: it stores what the caller
//! supplies and only ever asks whether a secret is valid.

use serde::{Deserialize, Serialize};

/// Capability every personal-details record must offer the registry.
pub trait PersonalDetails: Clone + Send + Sync {
    /// Check whether `secret` is this member's credential.
    fn credential_matches(&self, secret: &str) -> bool;
}

/// Name and contact record with a hashed password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personals {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    /// Hex-encoded BLAKE3 digest of the password
    password_hash: String,
}

impl Personals {
    /// Create a record, hashing `password` immediately.
    pub fn new(
        first_name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            surname: surname.into(),
            email: email.into(),
            password_hash: hash_password(password),
        }
    }
}

impl PersonalDetails for Personals {
    fn credential_matches(&self, secret: &str) -> bool {
        hash_password(secret) == self.password_hash
    }
}

fn hash_password(password: &str) -> String {
    hex::encode(blake3::hash(password.as_bytes()).as_bytes())
}
