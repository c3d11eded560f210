//! Timestamp type used throughout the ledger.
//!
//! Timestamps are Unix epoch seconds (UTC), as reported by the host ledger
//! environment for the block that carries an operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// This timestamp shifted forward by `secs`, saturating at `u64::MAX`.
    pub fn plus(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_when_now_precedes() {
        let t = Timestamp::new(1000);
        assert_eq!(t.elapsed_since(Timestamp::new(1500)), 500);
        assert_eq!(t.elapsed_since(Timestamp::new(10)), 0);
    }

    #[test]
    fn plus_saturates() {
        assert_eq!(Timestamp::new(u64::MAX).plus(1), Timestamp::new(u64::MAX));
        assert_eq!(Timestamp::new(5).plus(10).as_secs(), 15);
    }
}
