//! Shared utilities for the govpower ledger.

pub mod logging;
pub mod time;

pub use logging::{init_logging, try_init_logging, LogFormat};
pub use time::format_duration;
