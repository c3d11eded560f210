//! Combines direct stake with discounted lock grants.

use crate::error::PowerError;
use govpower_schedule::DiscountSchedule;
use govpower_staking::StakingLedger;
use govpower_types::{Address, LockGrant, LockRegistry, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The two sources of an account's voting power, and their sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerBreakdown {
    /// Staked balance, counted in full.
    pub direct: u128,
    /// Lock grants after discounting.
    pub locked: u128,
    pub total: u128,
}

/// Stateless reader over the staking ledger and the lock registry.
///
/// Holds no balances of its own; every query reads the ledger it is given.
pub struct VotingPowerAggregator {
    schedule: DiscountSchedule,
    registry: Arc<dyn LockRegistry>,
}

impl VotingPowerAggregator {
    pub fn new(schedule: DiscountSchedule, registry: Arc<dyn LockRegistry>) -> Self {
        Self { schedule, registry }
    }

    pub fn schedule(&self) -> &DiscountSchedule {
        &self.schedule
    }

    /// Active grants for `account`, straight from the registry.
    pub fn grants_of(&self, account: &Address) -> Result<Vec<LockGrant>, PowerError> {
        self.registry.active_locks_of(account).map_err(|e| {
            tracing::warn!(account = %account, error = %e, "lock registry read failed");
            PowerError::UpstreamUnavailable(e.to_string())
        })
    }

    /// Σ `amount × weight / 100` over the account's active grants.
    ///
    /// Each term is bounded by its grant; only the sum can overflow.
    pub fn locked_power(&self, account: &Address, now: Timestamp) -> Result<u128, PowerError> {
        self.grants_of(account)?
            .iter()
            .try_fold(0u128, |acc, grant| {
                acc.checked_add(self.schedule.weighted_amount(grant, now))
            })
            .ok_or(PowerError::Overflow)
    }

    pub fn breakdown(
        &self,
        staking: &StakingLedger,
        account: &Address,
        now: Timestamp,
    ) -> Result<PowerBreakdown, PowerError> {
        let direct = staking.total_staked_by(account);
        let locked = self.locked_power(account, now)?;
        let total = direct.checked_add(locked).ok_or(PowerError::Overflow)?;
        tracing::debug!(account = %account, direct, locked, total, now = %now, "voting power");
        Ok(PowerBreakdown {
            direct,
            locked,
            total,
        })
    }

    pub fn voting_power(
        &self,
        staking: &StakingLedger,
        account: &Address,
        now: Timestamp,
    ) -> Result<u128, PowerError> {
        Ok(self.breakdown(staking, account, now)?.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govpower_nullables::{NullLockRegistry, NullTokenLedger};

    const L: u64 = 1000;

    fn alice() -> Address {
        Address::new("alice")
    }

    fn setup() -> (Arc<NullLockRegistry>, VotingPowerAggregator, StakingLedger) {
        let registry = Arc::new(NullLockRegistry::new());
        let schedule = DiscountSchedule::new(vec![75, 50, 25], L).unwrap();
        let aggregator = VotingPowerAggregator::new(schedule, registry.clone());
        let token = Arc::new(NullTokenLedger::new());
        token.mint(&alice(), 100);
        token.approve(&alice(), &Address::new("vault"), 100);
        let staking = StakingLedger::new(token, Address::new("vault"));
        (registry, aggregator, staking)
    }

    #[test]
    fn no_stake_no_locks_is_zero() {
        let (_, aggregator, staking) = setup();
        let b = aggregator
            .breakdown(&staking, &alice(), Timestamp::new(0))
            .unwrap();
        assert_eq!(b, PowerBreakdown::default());
    }

    #[test]
    fn grants_are_discounted_individually_and_summed() {
        let (registry, aggregator, mut staking) = setup();
        staking.stake(&alice(), 7, Timestamp::new(0)).unwrap();
        registry.add_lock(&alice(), LockGrant::new(1000, Timestamp::new(0), 0));
        registry.add_lock(&alice(), LockGrant::new(1000, Timestamp::new(L), 0));

        // first grant in epoch 1 (50%), second in epoch 0 (75%)
        let b = aggregator
            .breakdown(&staking, &alice(), Timestamp::new(L))
            .unwrap();
        assert_eq!(b.direct, 7);
        assert_eq!(b.locked, 500 + 750);
        assert_eq!(b.total, 1257);
    }

    #[test]
    fn registry_failure_is_upstream_unavailable() {
        let (registry, aggregator, staking) = setup();
        registry.set_unavailable(true);
        let err = aggregator
            .voting_power(&staking, &alice(), Timestamp::new(0))
            .unwrap_err();
        assert!(matches!(err, PowerError::UpstreamUnavailable(_)));
    }

    #[test]
    fn matured_huge_grant_counts_in_full() {
        let (registry, aggregator, staking) = setup();
        registry.add_lock(&alice(), LockGrant::new(u128::MAX / 2, Timestamp::new(0), 0));
        let power = aggregator
            .voting_power(&staking, &alice(), Timestamp::new(10 * L))
            .unwrap();
        assert_eq!(power, u128::MAX / 2);
    }

    #[test]
    fn overflowing_grants_report_overflow() {
        let (registry, aggregator, staking) = setup();
        // each grant fits, their sum does not
        registry.add_lock(&alice(), LockGrant::new(u128::MAX / 2 + 1, Timestamp::new(0), 0));
        registry.add_lock(&alice(), LockGrant::new(u128::MAX / 2 + 1, Timestamp::new(0), 0));
        let err = aggregator
            .voting_power(&staking, &alice(), Timestamp::new(10 * L))
            .unwrap_err();
        assert!(matches!(err, PowerError::Overflow));
    }
}
