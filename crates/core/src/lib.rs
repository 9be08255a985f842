//! Outage schedule model: feed documents, status codes, half-hour slots and
//! merged power intervals.

pub mod config;
pub mod error;
pub mod feed;
pub mod intervals;
pub mod slots;
pub mod status;

pub use config::Config;
pub use error::CoreError;
pub use feed::{DayLabel, FeedDay, FeedDocument, Fingerprint};
pub use intervals::{merge_slots, slot_clock, DaySchedule, Interval};
pub use slots::{encode_day, DaySlots, HourCodes, SLOTS_PER_DAY};
pub use status::{interpret, HalfHours, StatusCode, UncertaintyPolicy, MISSING_HOUR_STATUS};
