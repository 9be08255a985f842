//! Expansion of a day's hourly codes into half-hour slots.

use std::collections::HashMap;

use crate::status::{interpret, StatusCode, UncertaintyPolicy, MISSING_HOUR_STATUS};

/// Number of 30-minute slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

/// Hourly codes of one (date, group), keyed by the feed's hour label.
///
/// Label `"1"` is 00:00–01:00, label `"24"` is 23:00–24:00.
pub type HourCodes = HashMap<String, StatusCode>;

/// Power state of every half hour of one day. Slot `i` covers
/// `[i*30min, (i+1)*30min)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlots([bool; SLOTS_PER_DAY]);

impl DaySlots {
    /// A day with power in every slot.
    pub fn all_on() -> Self {
        Self([true; SLOTS_PER_DAY])
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn is_powered(&self, slot: usize) -> Option<bool> {
        self.0.get(slot).copied()
    }
}

impl From<[bool; SLOTS_PER_DAY]> for DaySlots {
    fn from(slots: [bool; SLOTS_PER_DAY]) -> Self {
        Self(slots)
    }
}

/// Encode one day's hourly codes into 48 half-hour slots.
///
/// Hours missing from `hours` take [`MISSING_HOUR_STATUS`]. Labels that are
/// not an integer in `1..=24` are ignored.
pub fn encode_day(hours: &HourCodes, policy: UncertaintyPolicy) -> DaySlots {
    let mut day = [false; SLOTS_PER_DAY];

    for hour in 1..=24usize {
        let code = hour_code(hours, hour).unwrap_or(MISSING_HOUR_STATUS);
        let halves = interpret(code, policy);
        let first_slot = 2 * (hour - 1);
        day[first_slot] = halves.first;
        day[first_slot + 1] = halves.second;
    }

    DaySlots(day)
}

/// Look up an hour by numeric value so `"05"` and `"5"` both match.
fn hour_code(hours: &HourCodes, hour: usize) -> Option<StatusCode> {
    if let Some(code) = hours.get(&hour.to_string()) {
        return Some(*code);
    }
    hours
        .iter()
        .find(|(label, _)| label.trim().parse::<usize>().ok() == Some(hour))
        .map(|(_, code)| *code)
}
