//! Schedule construction errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
