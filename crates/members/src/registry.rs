//! Member registry keyed by member number.
//!
//! All state sits behind a single mutex. Every mutation (create, point
//! registration, replace and the promotion sweep) takes the lock for its whole
//! read-modify-write sequence, so a sweep can never overwrite a concurrent
//! point registration.

use chrono::NaiveDate;
use loyalty_core::Config;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::issuer::IdIssuer;
use crate::member::{Member, MemberId};
use crate::personals::PersonalDetails;
use crate::tier::TierCatalog;

struct RegistryState<P> {
    members: HashMap<MemberId, Member<P>>,
    issuer: IdIssuer,
}

/// Archive of bonus members.
pub struct MemberRegistry<P> {
    catalog: TierCatalog,
    state: Mutex<RegistryState<P>>,
}

impl<P: PersonalDetails> MemberRegistry<P> {
    /// Create an empty registry.
    pub fn new(catalog: TierCatalog, issuer: IdIssuer) -> Self {
        Self {
            catalog,
            state: Mutex::new(RegistryState {
                members: HashMap::new(),
                issuer,
            }),
        }
    }

    /// Create an empty registry from validated configuration.
    pub fn from_config(config: &Config) -> RegistryResult<Self> {
        config.validate()?;
        let catalog = TierCatalog::from_config(&config.tiers);
        let issuer = IdIssuer::from_config(&config.issuer)?;
        Ok(Self::new(catalog, issuer))
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    /// Enroll a new Basic member with zero points and return its number.
    ///
    /// Both the personal details and the enrollment date are required.
    pub fn create(
        &self,
        personals: Option<P>,
        enrolled_date: Option<NaiveDate>,
    ) -> RegistryResult<MemberId> {
        let personals = personals.ok_or_else(|| {
            warn!("Rejected enrollment without personal details");
            RegistryError::InvalidArgument("personal details are required".to_string())
        })?;
        let enrolled_date = enrolled_date.ok_or_else(|| {
            warn!("Rejected enrollment without enrollment date");
            RegistryError::InvalidArgument("enrollment date is required".to_string())
        })?;

        let mut state = self.lock();
        let RegistryState { members, issuer } = &mut *state;
        let id = issuer.next(members)?;

        members.insert(
            id,
            Member::enroll(id, personals, enrolled_date, &self.catalog),
        );
        info!(member_id = %id, enrolled = %enrolled_date, "Enrolled new Basic member");
        Ok(id)
    }

    /// Snapshot of the member with number `id`.
    pub fn find(&self, id: MemberId) -> RegistryResult<Member<P>> {
        self.lock()
            .members
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound { member_id: id })
    }

    /// Login-style balance lookup: the secret must pass the member's credential check.
    pub fn find_points(&self, id: MemberId, secret: &str) -> RegistryResult<u64> {
        let state = self.lock();
        let member = state
            .members
            .get(&id)
            .ok_or(RegistryError::NotFound { member_id: id })?;

        if !member.credential_matches(secret) {
            warn!(member_id = %id, "Credential check failed for balance lookup");
            return Err(RegistryError::InvalidCredentials { member_id: id });
        }
        Ok(member.points())
    }

    /// Register `amount` earned points, applying the member's tier multiplier.
    ///
    /// Returns the number of points credited.
    pub fn register_points(&self, id: MemberId, amount: i64) -> RegistryResult<u64> {
        let mut state = self.lock();
        let member = state.members.get_mut(&id).ok_or_else(|| {
            warn!(member_id = %id, amount, "Point registration for unknown member");
            RegistryError::NotFound { member_id: id }
        })?;

        let credited = member.accrue_points(amount)?;
        debug!(
            member_id = %id,
            amount,
            credited,
            balance = member.points(),
            level = %member.membership_level(),
            "Registered points"
        );
        Ok(credited)
    }

    /// Swap in an upgraded record for an existing member.
    ///
    /// Only for upgrades: the new record must keep the member number,
    /// enrollment date and exact balance, and must move to a higher tier.
    /// New members go through [`MemberRegistry::create`].
    pub fn replace(&self, old_id: MemberId, new_member: Member<P>) -> RegistryResult<()> {
        let mut state = self.lock();
        let current = state
            .members
            .get(&old_id)
            .ok_or(RegistryError::NotFound { member_id: old_id })?;

        check_replacement(current, &new_member)?;
        state.members.insert(old_id, new_member);
        Ok(())
    }

    /// Run `upgrade` against every member while holding the lock, then swap in
    /// each record it returns. Collects the side values it yields.
    ///
    /// Every replacement is built and checked before any is swapped in, so an
    /// error leaves the registry untouched.
    pub(crate) fn replace_each<T, F>(&self, mut upgrade: F) -> RegistryResult<Vec<T>>
    where
        F: FnMut(&Member<P>) -> RegistryResult<Option<(Member<P>, T)>>,
    {
        let mut state = self.lock();

        let mut staged = Vec::new();
        for (id, current) in state.members.iter() {
            if let Some((replacement, outcome)) = upgrade(current)? {
                check_replacement(current, &replacement)?;
                staged.push((*id, replacement, outcome));
            }
        }

        let mut applied = Vec::with_capacity(staged.len());
        for (id, replacement, outcome) in staged {
            state.members.insert(id, replacement);
            applied.push(outcome);
        }
        Ok(applied)
    }

    pub fn size(&self) -> usize {
        self.lock().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.lock().members.contains_key(&id)
    }

    /// Snapshot of every member, in no particular order.
    pub fn iterate_all(&self) -> Vec<Member<P>> {
        self.lock().members.values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState<P>> {
        // Mutations validate before writing, so a poisoned map is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: PersonalDetails> Default for MemberRegistry<P> {
    fn default() -> Self {
        Self::new(TierCatalog::default(), IdIssuer::default())
    }
}

fn check_replacement<P: PersonalDetails>(
    current: &Member<P>,
    replacement: &Member<P>,
) -> RegistryResult<()> {
    if replacement.id() != current.id() {
        return Err(RegistryError::InvariantViolation(format!(
            "replacement for member {} carries number {}",
            current.id(),
            replacement.id()
        )));
    }
    if replacement.enrolled_date() != current.enrolled_date() {
        return Err(RegistryError::InvariantViolation(format!(
            "replacement for member {} changes the enrollment date",
            current.id()
        )));
    }
    if replacement.membership_level() <= current.membership_level() {
        return Err(RegistryError::InvariantViolation(format!(
            "member {} cannot move from {} to {}",
            current.id(),
            current.membership_level(),
            replacement.membership_level()
        )));
    }
    if replacement.points() != current.points() {
        return Err(RegistryError::InvariantViolation(format!(
            "replacement for member {} would change its balance from {} to {}",
            current.id(),
            current.points(),
            replacement.points()
        )));
    }
    Ok(())
}
