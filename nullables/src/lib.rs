//! Nullable infrastructure for deterministic testing.
//!
//! The voting power core talks to the outside world through two traits
//! (`TokenLedger`, `LockRegistry`) and an explicit `now`. This crate provides
//! in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (including forced failures)
//! - Never touch the filesystem or network
//!
//! Usage: hand these to the ledger in tests instead of a real token ledger.

pub mod clock;
pub mod locks;
pub mod token;

pub use clock::NullClock;
pub use locks::NullLockRegistry;
pub use token::NullTokenLedger;
