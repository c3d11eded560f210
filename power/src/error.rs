use govpower_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowerError {
    #[error("staking error: {0}")]
    Staking(#[from] govpower_staking::StakingError),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("lock registry unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("arithmetic overflow in voting power")]
    Overflow,

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("voting power state lock poisoned")]
    LockPoisoned,
}

impl From<ScheduleError> for PowerError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::InvalidConfiguration(msg) => Self::InvalidConfiguration(msg),
        }
    }
}
