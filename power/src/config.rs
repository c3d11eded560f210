//! Construction parameters with TOML file support.

use govpower_types::Address;
use govpower_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::PowerError;

/// Everything needed to construct a [`crate::VotingPower`].
///
/// Can be loaded from a TOML file via [`VotingPowerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Fixed for the lifetime of the
/// instance; changing the schedule means constructing a new one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPowerConfig {
    /// Address of the collaborating token ledger.
    pub token: Address,

    /// Address that holds staked collateral inside the token ledger.
    #[serde(default = "default_custodian")]
    pub custodian: Address,

    /// Packed discount table, one hex byte per epoch (e.g. `"0x4B3219"`).
    #[serde(default = "default_discount_table")]
    pub discount_table: String,

    /// Length of one discount epoch in seconds. Must be non-zero.
    #[serde(default = "default_epoch_length")]
    pub epoch_length: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_custodian() -> Address {
    Address::new("voting-power")
}

fn default_discount_table() -> String {
    "0x4B3219".to_string()
}

fn default_epoch_length() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VotingPowerConfig {
    /// Config for `token` with every other field defaulted.
    pub fn for_token(token: Address) -> Self {
        Self {
            token,
            custodian: default_custodian(),
            discount_table: default_discount_table(),
            epoch_length: default_epoch_length(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }

    pub fn with_discount_table(mut self, table: impl Into<String>, epoch_length: u64) -> Self {
        self.discount_table = table.into();
        self.epoch_length = epoch_length;
        self
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PowerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, PowerError> {
        toml::from_str(s).map_err(|e| PowerError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, PowerError> {
        toml::to_string_pretty(self).map_err(|e| PowerError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    ///
    /// Returns `false` if a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        govpower_utils::try_init_logging(self.log_format, &self.log_level).is_ok()
    }
}
