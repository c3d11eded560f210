//! Staking-specific errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("insufficient stake: requested {requested}, proxy deposited {available}")]
    InsufficientStake { requested: u128, available: u128 },

    #[error("token transfer failed: {0}")]
    TransferFailed(String),

    #[error("arithmetic overflow in staking ledger")]
    Overflow,

    #[error("corrupt ledger snapshot: {0}")]
    CorruptSnapshot(String),
}
