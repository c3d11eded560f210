//! The staking ledger: sole owner of staked balances and the global total.

use crate::account::AccountStake;
use crate::error::StakingError;
use crate::event::{EventLog, StakingEvent};
use govpower_types::{Address, Timestamp, TokenLedger};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-account stake bookkeeping with proxy-scoped withdrawal rights.
///
/// Every mutation is all-or-nothing: new balances are computed first, then the
/// token ledger is called, and state is committed only if that call succeeds.
/// `total_staked == Σ staked_balance` holds after every call, failed or not.
pub struct StakingLedger {
    token: Arc<dyn TokenLedger>,
    /// Address holding staked collateral inside the token ledger.
    custodian: Address,
    pub(crate) accounts: BTreeMap<Address, AccountStake>,
    pub(crate) total_staked: u128,
    pub(crate) events: EventLog,
}

impl StakingLedger {
    pub fn new(token: Arc<dyn TokenLedger>, custodian: Address) -> Self {
        Self {
            token,
            custodian,
            accounts: BTreeMap::new(),
            total_staked: 0,
            events: EventLog::new(),
        }
    }

    pub fn custodian(&self) -> &Address {
        &self.custodian
    }

    /// Stake `amount` for `account`, paid by `account` itself.
    pub fn stake(
        &mut self,
        account: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        self.stake_for(account, account, amount, now)
    }

    /// Stake `amount` for `account`, paid by `proxy`.
    ///
    /// The deposit is booked against `(account, proxy)`; only `proxy` can
    /// withdraw it again.
    pub fn stake_for(
        &mut self,
        proxy: &Address,
        account: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            tracing::warn!(staker = %account, proxy = %proxy, "rejected zero stake");
            return Err(StakingError::ZeroAmount);
        }

        let current = self.accounts.get(account);
        let balance = current
            .map_or(0, AccountStake::staked_balance)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let record = current
            .map_or(0, |a| a.deposited_by(proxy))
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        self.token
            .transfer_from(proxy, &self.custodian, amount)
            .map_err(|e| {
                tracing::warn!(staker = %account, proxy = %proxy, amount, error = %e, "stake pull failed");
                StakingError::TransferFailed(e.to_string())
            })?;

        let entry = self.accounts.entry(account.clone()).or_default();
        entry.staked_balance = balance;
        entry.by_proxy.insert(proxy.clone(), record);
        entry.last_activity = Some(now);
        self.total_staked = total;
        self.events.append(StakingEvent::Staked {
            staker: account.clone(),
            proxy: proxy.clone(),
            amount,
            at: now,
        });

        tracing::info!(staker = %account, proxy = %proxy, amount, total_staked = total, "staked");
        Ok(())
    }

    /// Withdraw `amount` of `account`'s own deposit back to `account`.
    pub fn unstake(
        &mut self,
        account: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        self.unstake_for(account, account, amount, account, now)
    }

    /// Withdraw `amount` that `proxy` deposited for `account`, paying `recipient`.
    ///
    /// Checked against the proxy's own record, never the account aggregate:
    /// a proxy cannot touch stake another proxy deposited.
    pub fn unstake_for(
        &mut self,
        proxy: &Address,
        account: &Address,
        amount: u128,
        recipient: &Address,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            tracing::warn!(staker = %account, proxy = %proxy, "rejected zero unstake");
            return Err(StakingError::ZeroAmount);
        }

        let current = self.accounts.get(account);
        let available = current.map_or(0, |a| a.deposited_by(proxy));
        if amount > available {
            tracing::warn!(
                staker = %account,
                proxy = %proxy,
                requested = amount,
                available,
                "unstake exceeds proxy deposit"
            );
            return Err(StakingError::InsufficientStake {
                requested: amount,
                available,
            });
        }
        let record = available - amount;
        let balance = current
            .map_or(0, AccountStake::staked_balance)
            .checked_sub(amount)
            .ok_or(StakingError::Overflow)?;
        let total = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::Overflow)?;

        self.token
            .transfer(&self.custodian, recipient, amount)
            .map_err(|e| {
                tracing::warn!(staker = %account, proxy = %proxy, amount, error = %e, "unstake push failed");
                StakingError::TransferFailed(e.to_string())
            })?;

        let entry = self.accounts.entry(account.clone()).or_default();
        entry.staked_balance = balance;
        entry.by_proxy.insert(proxy.clone(), record);
        entry.last_activity = Some(now);
        self.total_staked = total;
        self.events.append(StakingEvent::Unstaked {
            staker: account.clone(),
            proxy: proxy.clone(),
            amount,
            recipient: recipient.clone(),
            at: now,
        });

        tracing::info!(
            staker = %account,
            proxy = %proxy,
            recipient = %recipient,
            amount,
            total_staked = total,
            "unstaked"
        );
        Ok(())
    }

    pub fn total_staked_by(&self, account: &Address) -> u128 {
        self.accounts
            .get(account)
            .map_or(0, AccountStake::staked_balance)
    }

    /// Same aggregate as [`Self::total_staked_by`]; named for proxy callers.
    pub fn total_staked_for(&self, account: &Address) -> u128 {
        self.total_staked_by(account)
    }

    pub fn total_staked(&self) -> u128 {
        self.total_staked
    }

    /// What `proxy` deposited for `account` and may still withdraw.
    pub fn staked_by_proxy(&self, account: &Address, proxy: &Address) -> u128 {
        self.accounts
            .get(account)
            .map_or(0, |a| a.deposited_by(proxy))
    }

    pub fn last_activity(&self, account: &Address) -> Option<Timestamp> {
        self.accounts.get(account).and_then(|a| a.last_activity)
    }

    pub fn account(&self, account: &Address) -> Option<&AccountStake> {
        self.accounts.get(account)
    }

    /// Every account that has ever staked.
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &AccountStake)> {
        self.accounts.iter()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    /// Verify `total == Σ balances` and `balance == Σ records` for every account.
    pub fn check_invariants(&self) -> Result<(), StakingError> {
        let mut sum = 0u128;
        for (address, stake) in &self.accounts {
            let records = stake.records_sum().ok_or(StakingError::Overflow)?;
            if records != stake.staked_balance {
                return Err(StakingError::CorruptSnapshot(format!(
                    "{address}: balance {} but proxy records sum to {records}",
                    stake.staked_balance
                )));
            }
            sum = sum
                .checked_add(stake.staked_balance)
                .ok_or(StakingError::Overflow)?;
        }
        if sum != self.total_staked {
            return Err(StakingError::CorruptSnapshot(format!(
                "total staked {} but balances sum to {sum}",
                self.total_staked
            )));
        }
        Ok(())
    }
}
