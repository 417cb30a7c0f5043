//! Bonus member record.
//!
//! A member carries its tier as a tag plus the multiplier that tier had in
//! the catalog when the record was built. Promotion never mutates a member:
//! it builds an upgraded copy that the registry swaps in under the same key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RegistryError, RegistryResult};
use crate::personals::PersonalDetails;
use crate::tier::{scale_points, MembershipLevel, TierCatalog};

/// Unique member number within one registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemberId(u32);

impl MemberId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MemberId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A bonus member at a given membership level.
#[derive(Debug, Clone, Serialize)]
pub struct Member<P> {
    id: MemberId,
    personals: P,
    enrolled_date: NaiveDate,
    points: u64,
    level: MembershipLevel,
    multiplier_percent: u32,
}

impl<P: PersonalDetails> Member<P> {
    /// New Basic member with an empty balance.
    pub(crate) fn enroll(
        id: MemberId,
        personals: P,
        enrolled_date: NaiveDate,
        catalog: &TierCatalog,
    ) -> Self {
        Self {
            id,
            personals,
            enrolled_date,
            points: 0,
            level: MembershipLevel::Basic,
            multiplier_percent: catalog.multiplier_percent(MembershipLevel::Basic),
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn personals(&self) -> &P {
        &self.personals
    }

    pub fn enrolled_date(&self) -> NaiveDate {
        self.enrolled_date
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn membership_level(&self) -> MembershipLevel {
        self.level
    }

    /// Accrual multiplier as a whole percentage (`120` = 1.2x).
    pub fn multiplier_percent(&self) -> u32 {
        self.multiplier_percent
    }

    /// Ask the personal details whether `secret` is valid.
    pub fn credential_matches(&self, secret: &str) -> bool {
        self.personals.credential_matches(secret)
    }

    /// Points counted towards tier thresholds as of `as_of`.
    ///
    /// Currently the whole balance; the date is reserved for windowed rules.
    pub fn qualifying_points(&self, _as_of: NaiveDate) -> u64 {
        self.points
    }

    /// Credit `amount` earned points, applying this member's multiplier.
    ///
    /// Returns the number of points actually credited. Negative amounts are
    /// rejected and leave the balance untouched.
    pub(crate) fn accrue_points(&mut self, amount: i64) -> RegistryResult<u64> {
        let amount = u64::try_from(amount).map_err(|_| {
            RegistryError::InvalidArgument(format!("negative point amount: {}", amount))
        })?;

        let credited = scale_points(amount, self.multiplier_percent);
        self.points = self.points.saturating_add(credited);
        Ok(credited)
    }

    /// Build the record for this member at a higher `level`.
    ///
    /// Identity, personal details, enrollment date and the current balance
    /// carry over unchanged; the new multiplier only affects later accruals.
    pub fn upgraded_to(
        &self,
        level: MembershipLevel,
        catalog: &TierCatalog,
    ) -> RegistryResult<Self> {
        if level <= self.level {
            return Err(RegistryError::InvariantViolation(format!(
                "member {} cannot move from {} to {}",
                self.id, self.level, level
            )));
        }

        Ok(Self {
            id: self.id,
            personals: self.personals.clone(),
            enrolled_date: self.enrolled_date,
            points: self.points,
            level,
            multiplier_percent: catalog.multiplier_percent(level),
        })
    }
}
