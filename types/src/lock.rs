//! Time-locked token grants, as reported by the token ledger's lock registry.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// A quantity of tokens locked under the vesting discount schedule.
///
/// Owned by the token ledger; the voting power core only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockGrant {
    /// Locked quantity (raw units).
    pub amount: u128,
    /// When the lock was created. Discounting starts immediately.
    pub created_at: Timestamp,
    /// Length of one discount step in seconds.
    /// Zero means "use the voting power system's configured epoch length".
    #[serde(default)]
    pub epoch_length: u64,
}

impl LockGrant {
    pub fn new(amount: u128, created_at: Timestamp, epoch_length: u64) -> Self {
        Self {
            amount,
            created_at,
            epoch_length,
        }
    }
}
