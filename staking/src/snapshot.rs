//! Persisting and restoring the staking ledger.

use crate::account::AccountStake;
use crate::error::StakingError;
use crate::event::{EventLog, StakingEvent};
use crate::ledger::StakingLedger;
use govpower_types::{Address, TokenLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Point-in-time copy of everything the staking ledger owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub custodian: Address,
    pub total_staked: u128,
    pub accounts: BTreeMap<Address, AccountStake>,
    pub events: Vec<StakingEvent>,
}

impl LedgerSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, StakingError> {
        bincode::serialize(self).map_err(|e| StakingError::CorruptSnapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StakingError> {
        bincode::deserialize(bytes).map_err(|e| StakingError::CorruptSnapshot(e.to_string()))
    }
}

impl StakingLedger {
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            custodian: self.custodian().clone(),
            total_staked: self.total_staked,
            accounts: self.accounts.clone(),
            events: self.events.as_slice().to_vec(),
        }
    }

    /// Rebuild a ledger from a snapshot, rejecting one whose totals disagree.
    ///
    /// Event listeners are not part of the snapshot and must be re-subscribed.
    pub fn restore(
        snapshot: LedgerSnapshot,
        token: Arc<dyn TokenLedger>,
    ) -> Result<Self, StakingError> {
        let mut ledger = StakingLedger::new(token, snapshot.custodian);
        ledger.accounts = snapshot.accounts;
        ledger.total_staked = snapshot.total_staked;
        ledger.events = EventLog::from_entries(snapshot.events);
        ledger.check_invariants()?;
        tracing::debug!(
            accounts = ledger.accounts.len(),
            total_staked = ledger.total_staked,
            events = ledger.events.len(),
            "staking ledger restored"
        );
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govpower_nullables::NullTokenLedger;
    use govpower_types::Timestamp;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    fn populated() -> (Arc<NullTokenLedger>, StakingLedger) {
        let token = Arc::new(NullTokenLedger::new());
        for h in ["alice", "proxy"] {
            token.mint(&addr(h), 5_000);
            token.approve(&addr(h), &addr("vault"), 5_000);
        }
        let mut ledger = StakingLedger::new(token.clone(), addr("vault"));
        ledger.stake(&addr("alice"), 100, Timestamp::new(1)).unwrap();
        ledger
            .stake_for(&addr("proxy"), &addr("alice"), 250, Timestamp::new(2))
            .unwrap();
        ledger
            .unstake_for(&addr("proxy"), &addr("alice"), 50, &addr("bob"), Timestamp::new(3))
            .unwrap();
        (token, ledger)
    }

    #[test]
    fn restore_from_bytes_preserves_state() {
        let (token, ledger) = populated();
        let bytes = ledger.snapshot().to_bytes().unwrap();
        let restored =
            StakingLedger::restore(LedgerSnapshot::from_bytes(&bytes).unwrap(), token).unwrap();
        assert_eq!(restored.total_staked(), 300);
        assert_eq!(restored.staked_by_proxy(&addr("alice"), &addr("proxy")), 200);
        assert_eq!(restored.last_activity(&addr("alice")), Some(Timestamp::new(3)));
        assert_eq!(restored.events().as_slice(), ledger.events().as_slice());
        assert_eq!(restored.custodian(), &addr("vault"));
    }

    #[test]
    fn restore_rejects_inconsistent_total() {
        let (token, ledger) = populated();
        let mut snapshot = ledger.snapshot();
        snapshot.total_staked += 1;
        assert!(matches!(
            StakingLedger::restore(snapshot, token),
            Err(StakingError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn restore_rejects_records_that_disagree_with_balance() {
        let (token, ledger) = populated();
        let mut snapshot = ledger.snapshot();
        if let Some(stake) = snapshot.accounts.get_mut(&addr("alice")) {
            stake.by_proxy.insert(addr("ghost"), 1);
        }
        assert!(StakingLedger::restore(snapshot, token).is_err());
    }

    #[test]
    fn garbage_bytes_are_corrupt() {
        assert!(matches!(
            LedgerSnapshot::from_bytes(&[1, 2, 3]),
            Err(StakingError::CorruptSnapshot(_))
        ));
    }
}
