//! The discount table and its epoch arithmetic.

use crate::error::ScheduleError;
use govpower_types::{LockGrant, Timestamp};
use serde::{Deserialize, Serialize};

/// Weight (percent) of a fully matured grant.
pub const FULL_WEIGHT: u8 = 100;

/// Number of whole epochs between `created_at` and `now`.
///
/// Saturates to 0 if `now` precedes `created_at`. `epoch_length` must be
/// non-zero; callers get that guarantee from [`DiscountSchedule`].
pub fn epoch_index(created_at: Timestamp, now: Timestamp, epoch_length: u64) -> u64 {
    created_at.elapsed_since(now) / epoch_length
}

/// Ordered percentages applied to a lock grant per elapsed epoch.
///
/// Deserialization goes through [`DiscountSchedule::new`], so a decoded
/// schedule is as valid as a constructed one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct DiscountSchedule {
    percentages: Vec<u8>,
    epoch_length: u64,
}

/// Unvalidated wire form of [`DiscountSchedule`].
#[derive(Deserialize)]
struct RawSchedule {
    percentages: Vec<u8>,
    epoch_length: u64,
}

impl TryFrom<RawSchedule> for DiscountSchedule {
    type Error = ScheduleError;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        Self::new(raw.percentages, raw.epoch_length)
    }
}

impl DiscountSchedule {
    /// Build a schedule from explicit percentages.
    pub fn new(percentages: Vec<u8>, epoch_length: u64) -> Result<Self, ScheduleError> {
        if epoch_length == 0 {
            return Err(ScheduleError::InvalidConfiguration(
                "epoch length must be non-zero".into(),
            ));
        }
        if let Some((i, p)) = percentages
            .iter()
            .enumerate()
            .find(|(_, p)| **p > FULL_WEIGHT)
        {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "discount entry {i} is {p}%, must be within 0..=100"
            )));
        }
        Ok(Self {
            percentages,
            epoch_length,
        })
    }

    /// Decode a packed table: one byte per epoch, in order.
    pub fn from_packed(bytes: &[u8], epoch_length: u64) -> Result<Self, ScheduleError> {
        Self::new(bytes.to_vec(), epoch_length)
    }

    /// Decode a hex-encoded packed table, e.g. `"0x4B3219"` → `[75, 50, 25]`.
    pub fn from_hex(table: &str, epoch_length: u64) -> Result<Self, ScheduleError> {
        let digits = table
            .strip_prefix("0x")
            .or_else(|| table.strip_prefix("0X"))
            .unwrap_or(table);
        let bytes = hex::decode(digits).map_err(|e| {
            ScheduleError::InvalidConfiguration(format!("discount table {table:?}: {e}"))
        })?;
        Self::from_packed(&bytes, epoch_length)
    }

    /// Re-encode the table in the packed hex form accepted by [`Self::from_hex`].
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode_upper(&self.percentages))
    }

    pub fn percentages(&self) -> &[u8] {
        &self.percentages
    }

    pub fn epoch_length(&self) -> u64 {
        self.epoch_length
    }

    pub fn len(&self) -> usize {
        self.percentages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    /// True if entries never increase from one epoch to the next.
    pub fn is_monotonic(&self) -> bool {
        self.percentages.windows(2).all(|w| w[1] <= w[0])
    }

    /// Weight at a given elapsed-epoch index; past the end the grant is matured.
    pub fn weight_at(&self, index: u64) -> u8 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.percentages.get(i).copied())
            .unwrap_or(FULL_WEIGHT)
    }

    /// The epoch length that applies to `grant`: its own if set, else ours.
    pub fn epoch_length_for(&self, grant: &LockGrant) -> u64 {
        if grant.epoch_length == 0 {
            self.epoch_length
        } else {
            grant.epoch_length
        }
    }

    /// Discount weight (percent) of `grant` at `now`.
    pub fn weight_of(&self, grant: &LockGrant, now: Timestamp) -> u8 {
        let index = epoch_index(grant.created_at, now, self.epoch_length_for(grant));
        self.weight_at(index)
    }

    /// `grant.amount × weight / 100`, truncating.
    ///
    /// Split on the divisor so no intermediate exceeds `amount`; the result
    /// is never larger than `grant.amount`.
    pub fn weighted_amount(&self, grant: &LockGrant, now: Timestamp) -> u128 {
        let weight = u128::from(self.weight_of(grant, now));
        let full = u128::from(FULL_WEIGHT);
        grant.amount / full * weight + grant.amount % full * weight / full
    }
}
