//! Fundamental types for the govpower voting-power ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, timestamps, lock grants, and the traits describing the two
//! external collaborators the core consumes (the token ledger and its lock registry).

pub mod address;
pub mod external;
pub mod lock;
pub mod time;

pub use address::Address;
pub use external::{ExternalError, LockRegistry, TokenLedger};
pub use lock::LockGrant;
pub use time::Timestamp;
