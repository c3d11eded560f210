//! Voting power for governance.
//!
//! `votingPower(a) = staked(a) + Σ amount(g) × weight(g, now) / 100` over the
//! account's active lock grants `g`, where `weight` comes from the discount
//! schedule fixed at construction.
//!
//! [`VotingPower`] is the entry point: it owns the staking ledger, reads lock
//! grants from the external registry, and exposes the stake / unstake / query
//! surface governance logic consumes.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod shared;
pub mod system;

pub use aggregator::{PowerBreakdown, VotingPowerAggregator};
pub use config::VotingPowerConfig;
pub use error::PowerError;
pub use shared::SharedVotingPower;
pub use system::VotingPower;
