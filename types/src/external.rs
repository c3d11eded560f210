//! Interfaces of the external collaborators consumed by the core.
//!
//! Both are owned by the token ledger. Implementations live outside this
//! workspace; `govpower-nullables` provides in-memory ones for tests.

use crate::{Address, LockGrant};
use thiserror::Error;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    /// The collaborator refused the request (e.g. insufficient allowance).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The collaborator could not be reached or read.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// The fungible token ledger holding staked collateral.
///
/// The core trusts the reported outcome and never inspects token state.
pub trait TokenLedger: Send + Sync {
    /// Pull `amount` from `payer` into `custodian` (requires prior approval).
    fn transfer_from(
        &self,
        payer: &Address,
        custodian: &Address,
        amount: u128,
    ) -> Result<(), ExternalError>;

    /// Push `amount` held by `custodian` to `recipient`.
    fn transfer(
        &self,
        custodian: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), ExternalError>;

    fn balance_of(&self, account: &Address) -> Result<u128, ExternalError>;
}

/// Read-only view of the token ledger's time-locked grants.
pub trait LockRegistry: Send + Sync {
    /// All grants currently active for `account`; may be empty.
    fn active_locks_of(&self, account: &Address) -> Result<Vec<LockGrant>, ExternalError>;
}
