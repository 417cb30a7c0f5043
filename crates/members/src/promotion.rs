//! Promotion sweep.
//!
//! Re-evaluates every member against the tier thresholds and swaps in an
//! upgraded record for each member that qualifies for a higher tier.
//!
//! # Per-member state machine
//!
//! ```text
//! Basic ──► Silver ──► Gold
//!   └──────────────────►┘
//! ```
//!
//! Gold is terminal and no transition lowers the tier. Gold eligibility is
//! checked before Silver, so a member that meets both thresholds is recorded
//! as Gold directly and never passes through Silver.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RegistryResult;
use crate::member::MemberId;
use crate::personals::PersonalDetails;
use crate::registry::MemberRegistry;
use crate::tier::MembershipLevel;

/// Record of one applied promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub member_id: MemberId,
    pub from: MembershipLevel,
    pub to: MembershipLevel,
    /// Balance carried into the new tier
    pub points: u64,
    pub as_of: NaiveDate,
}

/// Drives promotion sweeps over a registry.
pub struct PromotionEngine<'a, P> {
    registry: &'a MemberRegistry<P>,
}

impl<'a, P: PersonalDetails> PromotionEngine<'a, P> {
    pub fn new(registry: &'a MemberRegistry<P>) -> Self {
        Self { registry }
    }

    /// Promote every member whose qualifying points as of `as_of` meet a
    /// higher tier's threshold.
    ///
    /// The whole pass runs under the registry lock. An absent date makes the
    /// call a no-op. Returns the promotions that were applied.
    pub fn check_and_upgrade_all(
        &self,
        as_of: Option<NaiveDate>,
    ) -> RegistryResult<Vec<Promotion>> {
        let Some(as_of) = as_of else {
            debug!("Promotion sweep skipped: no as-of date");
            return Ok(Vec::new());
        };

        let catalog = self.registry.catalog();
        let promotions = self.registry.replace_each(|member| {
            let from = member.membership_level();
            if from.is_terminal() {
                return Ok(None);
            }

            let target = catalog.qualifying_level(member.qualifying_points(as_of));
            if target <= from {
                return Ok(None);
            }

            let upgraded = member.upgraded_to(target, catalog)?;
            let promotion = Promotion {
                member_id: member.id(),
                from,
                to: target,
                points: upgraded.points(),
                as_of,
            };
            Ok(Some((upgraded, promotion)))
        })?;

        for promotion in &promotions {
            info!(
                member_id = %promotion.member_id,
                from = %promotion.from,
                to = %promotion.to,
                points = promotion.points,
                "Member promoted"
            );
        }
        debug!(promoted = promotions.len(), as_of = %as_of, "Promotion sweep complete");

        Ok(promotions)
    }
}

/// Run one promotion sweep over `registry`.
pub fn check_and_upgrade_all<P: PersonalDetails>(
    registry: &MemberRegistry<P>,
    as_of: Option<NaiveDate>,
) -> RegistryResult<Vec<Promotion>> {
    PromotionEngine::new(registry).check_and_upgrade_all(as_of)
}
