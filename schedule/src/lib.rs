//! Discount schedule engine.
//!
//! A locked grant counts towards voting power at a discount that depends only
//! on how many whole epochs have elapsed since the lock was created:
//! `weight = schedule[floor((now − created_at) / epoch_length)]`, or 100%
//! once the index runs past the end of the schedule.
//!
//! The schedule is decoded and validated once, at construction, and is
//! immutable afterwards.

pub mod error;
pub mod schedule;

pub use error::ScheduleError;
pub use schedule::{epoch_index, DiscountSchedule, FULL_WEIGHT};
