//! Localized text reports for outage schedules.
//!
//! This crate provides:
//! - the three-form numeral agreement used for durations
//! - locale tables (weekday names, labels, glyphs, day layout)
//! - Minijinja rendering of one day's schedule
//! - multi-group assembly and transport-sized chunking

pub mod assemble;
pub mod chunk;
pub mod error;
pub mod locale;
pub mod plural;
pub mod render;

pub use assemble::{ReportBuilder, DAY_SEPARATOR, GROUP_SEPARATOR};
pub use chunk::split_for_delivery;
pub use error::ReportError;
pub use locale::{Locale, UKRAINIAN};
pub use plural::{format_quantity, plural_form, PluralForm};
pub use render::{DayContext, Report, ReportRenderer};
