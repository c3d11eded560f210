//! Per-account staking state.

use govpower_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Staked balance of one account, split by the proxy that deposited it.
///
/// Invariant: `staked_balance == Σ by_proxy`. Only [`crate::StakingLedger`]
/// mutates this.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStake {
    pub(crate) staked_balance: u128,
    /// proxy → amount that proxy deposited and may still withdraw.
    /// The account itself appears here for self-staking.
    pub(crate) by_proxy: BTreeMap<Address, u128>,
    pub(crate) last_activity: Option<Timestamp>,
}

impl AccountStake {
    pub fn staked_balance(&self) -> u128 {
        self.staked_balance
    }

    /// Amount `proxy` deposited for this account and has not withdrawn.
    pub fn deposited_by(&self, proxy: &Address) -> u128 {
        self.by_proxy.get(proxy).copied().unwrap_or(0)
    }

    /// All stake records, including ones drained back to zero.
    pub fn records(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.by_proxy.iter().map(|(p, a)| (p, *a))
    }

    pub fn last_activity(&self) -> Option<Timestamp> {
        self.last_activity
    }

    pub(crate) fn records_sum(&self) -> Option<u128> {
        self.by_proxy
            .values()
            .try_fold(0u128, |acc, a| acc.checked_add(*a))
    }
}
