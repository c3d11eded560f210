//! Staking ledger for the govpower voting-power system.
//!
//! Owns every per-account staked balance and the global total. Stake can be
//! deposited by the account itself or by a proxy acting on its behalf; each
//! deposit is booked against the `(account, proxy)` pair, and only that same
//! proxy can later withdraw it.
//!
//! This crate handles:
//! - Stake / unstake, direct and via proxy
//! - Collateral custody through the external `TokenLedger`
//! - Last-activity timestamps
//! - The append-only `Staked` / `Unstaked` audit log
//! - Snapshots for persistence

pub mod account;
pub mod error;
pub mod event;
pub mod ledger;
pub mod snapshot;

pub use account::AccountStake;
pub use error::StakingError;
pub use event::{EventLog, Listener, StakingEvent};
pub use ledger::StakingLedger;
pub use snapshot::LedgerSnapshot;
