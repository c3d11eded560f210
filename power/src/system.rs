//! The voting power system: construction plus the externally exposed surface.

use crate::aggregator::{PowerBreakdown, VotingPowerAggregator};
use crate::config::VotingPowerConfig;
use crate::error::PowerError;
use govpower_schedule::DiscountSchedule;
use govpower_staking::{EventLog, LedgerSnapshot, Listener, StakingLedger};
use govpower_types::{Address, LockRegistry, Timestamp, TokenLedger};
use govpower_utils::format_duration;
use std::sync::Arc;

/// Governance voting power ledger.
///
/// Mutations take `&mut self` and run to completion or not at all; queries
/// take `&self`. Wrap in [`crate::SharedVotingPower`] for concurrent readers.
pub struct VotingPower {
    token: Address,
    staking: StakingLedger,
    aggregator: VotingPowerAggregator,
}

impl VotingPower {
    /// Decode the discount table and wire up the collaborators.
    ///
    /// Fails with [`PowerError::InvalidConfiguration`] if the epoch length is
    /// zero or the table is malformed.
    pub fn new(
        config: &VotingPowerConfig,
        token_ledger: Arc<dyn TokenLedger>,
        locks: Arc<dyn LockRegistry>,
    ) -> Result<Self, PowerError> {
        let schedule = Self::decode_schedule(config)?;
        let staking = StakingLedger::new(token_ledger, config.custodian.clone());
        Ok(Self::assemble(config, schedule, staking, locks))
    }

    /// Rebuild from a staking snapshot, re-validating its totals.
    pub fn restore(
        config: &VotingPowerConfig,
        snapshot: LedgerSnapshot,
        token_ledger: Arc<dyn TokenLedger>,
        locks: Arc<dyn LockRegistry>,
    ) -> Result<Self, PowerError> {
        let schedule = Self::decode_schedule(config)?;
        if snapshot.custodian != config.custodian {
            return Err(PowerError::InvalidConfiguration(format!(
                "snapshot custodian {} does not match configured {}",
                snapshot.custodian, config.custodian
            )));
        }
        let staking = StakingLedger::restore(snapshot, token_ledger)?;
        Ok(Self::assemble(config, schedule, staking, locks))
    }

    fn decode_schedule(config: &VotingPowerConfig) -> Result<DiscountSchedule, PowerError> {
        let schedule = DiscountSchedule::from_hex(&config.discount_table, config.epoch_length)
            .map_err(|e| {
                tracing::error!(error = %e, "rejected voting power configuration");
                PowerError::from(e)
            })?;
        if !schedule.is_monotonic() {
            tracing::warn!(
                table = %schedule.to_hex(),
                "discount table increases between epochs; older locks may weigh less than newer ones"
            );
        }
        Ok(schedule)
    }

    fn assemble(
        config: &VotingPowerConfig,
        schedule: DiscountSchedule,
        staking: StakingLedger,
        locks: Arc<dyn LockRegistry>,
    ) -> Self {
        tracing::info!(
            token = %config.token,
            custodian = %config.custodian,
            table = %schedule.to_hex(),
            epochs = schedule.len(),
            epoch_length = %format_duration(schedule.epoch_length()),
            "voting power ready"
        );
        Self {
            token: config.token.clone(),
            staking,
            aggregator: VotingPowerAggregator::new(schedule, locks),
        }
    }

    // ── Mutations ──────────────────────────────────────────────────────

    /// `caller` stakes `amount` for itself.
    pub fn stake(
        &mut self,
        caller: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), PowerError> {
        Ok(self.staking.stake(caller, amount, now)?)
    }

    /// `caller` withdraws `amount` of its own stake.
    pub fn unstake(
        &mut self,
        caller: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), PowerError> {
        Ok(self.staking.unstake(caller, amount, now)?)
    }

    /// `caller` (a proxy) stakes `amount` on behalf of `account`.
    pub fn stake_for(
        &mut self,
        caller: &Address,
        account: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), PowerError> {
        Ok(self.staking.stake_for(caller, account, amount, now)?)
    }

    /// `caller` (a proxy) withdraws `amount` it deposited for `account`, paying `recipient`.
    pub fn unstake_for(
        &mut self,
        caller: &Address,
        account: &Address,
        amount: u128,
        recipient: &Address,
        now: Timestamp,
    ) -> Result<(), PowerError> {
        Ok(self
            .staking
            .unstake_for(caller, account, amount, recipient, now)?)
    }

    /// Register an observer of future `Staked` / `Unstaked` events.
    pub fn subscribe(&mut self, listener: Listener) {
        self.staking.events_mut().subscribe(listener);
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn voting_power(&self, account: &Address, now: Timestamp) -> Result<u128, PowerError> {
        self.aggregator.voting_power(&self.staking, account, now)
    }

    pub fn power_breakdown(
        &self,
        account: &Address,
        now: Timestamp,
    ) -> Result<PowerBreakdown, PowerError> {
        self.aggregator.breakdown(&self.staking, account, now)
    }

    pub fn total_staked_by(&self, account: &Address) -> u128 {
        self.staking.total_staked_by(account)
    }

    pub fn total_staked_for(&self, account: &Address) -> u128 {
        self.staking.total_staked_for(account)
    }

    pub fn total_staked(&self) -> u128 {
        self.staking.total_staked()
    }

    /// What `proxy` deposited for `account` and may still withdraw.
    pub fn staked_by_proxy(&self, account: &Address, proxy: &Address) -> u128 {
        self.staking.staked_by_proxy(account, proxy)
    }

    /// Seconds of the account's last stake/unstake; 0 if it never staked.
    pub fn timestamp(&self, account: &Address) -> u64 {
        self.staking
            .last_activity(account)
            .map_or(0, |t| t.as_secs())
    }

    /// Address of the collaborating token ledger.
    pub fn token(&self) -> &Address {
        &self.token
    }

    pub fn custodian(&self) -> &Address {
        self.staking.custodian()
    }

    pub fn schedule(&self) -> &DiscountSchedule {
        self.aggregator.schedule()
    }

    pub fn events(&self) -> &EventLog {
        self.staking.events()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.staking.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govpower_nullables::{NullLockRegistry, NullTokenLedger};

    fn config() -> VotingPowerConfig {
        VotingPowerConfig::for_token(Address::new("0xToken"))
    }

    fn build(cfg: &VotingPowerConfig) -> Result<VotingPower, PowerError> {
        VotingPower::new(
            cfg,
            Arc::new(NullTokenLedger::new()),
            Arc::new(NullLockRegistry::new()),
        )
    }

    #[test]
    fn zero_epoch_length_fails_construction() {
        let cfg = config().with_discount_table("0x4B3219", 0);
        assert!(matches!(
            build(&cfg),
            Err(PowerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn malformed_table_fails_construction() {
        let cfg = config().with_discount_table("0x4B32F0", 1000);
        assert!(matches!(
            build(&cfg),
            Err(PowerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn reports_configured_token_and_schedule() {
        let vp = build(&config()).unwrap();
        assert_eq!(vp.token(), &Address::new("0xToken"));
        assert_eq!(vp.custodian(), &Address::new("voting-power"));
        assert_eq!(vp.schedule().percentages(), &[75, 50, 25]);
        assert_eq!(vp.schedule().epoch_length(), 1000);
    }

    #[test]
    fn timestamp_defaults_to_zero() {
        let vp = build(&config()).unwrap();
        assert_eq!(vp.timestamp(&Address::new("nobody")), 0);
    }

    #[test]
    fn non_monotonic_table_is_accepted() {
        let cfg = config().with_discount_table("0x1932", 10);
        let vp = build(&cfg).unwrap();
        assert!(!vp.schedule().is_monotonic());
    }

    #[test]
    fn restore_rejects_foreign_custodian() {
        let token = Arc::new(NullTokenLedger::new());
        let vp = VotingPower::new(&config(), token.clone(), Arc::new(NullLockRegistry::new()))
            .unwrap();
        let mut other = config();
        other.custodian = Address::new("elsewhere");
        let err = VotingPower::restore(
            &other,
            vp.snapshot(),
            token,
            Arc::new(NullLockRegistry::new()),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PowerError::InvalidConfiguration(_)));
    }
}
