//! Run-length encoding of half-hour slots into power intervals.

use serde::Serialize;

use crate::slots::{encode_day, DaySlots, HourCodes};
use crate::status::UncertaintyPolicy;

/// Hours covered by one slot.
pub const SLOT_HOURS: f64 = 0.5;

/// A maximal run of slots with the same power state.
///
/// `end_slot` is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub start_slot: usize,
    pub end_slot: usize,
    pub powered: bool,
    pub duration_hours: f64,
}

impl Interval {
    pub fn new(start_slot: usize, end_slot: usize, powered: bool) -> Self {
        Self {
            start_slot,
            end_slot,
            powered,
            duration_hours: (end_slot - start_slot) as f64 * SLOT_HOURS,
        }
    }

    /// `HH:MM` at the start of the interval.
    pub fn start_time(&self) -> String {
        slot_clock(self.start_slot)
    }

    /// `HH:MM` at the end of the interval; the end of the day is `24:00`.
    pub fn end_time(&self) -> String {
        slot_clock(self.end_slot)
    }
}

/// Clock time at the start of `slot`. Slot 48 is the end of the day and
/// renders as `24:00`.
pub fn slot_clock(slot: usize) -> String {
    let minutes = slot * 30;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Merge consecutive slots with the same state. An empty slice gives no
/// intervals.
pub fn merge_slots(slots: &[bool]) -> Vec<Interval> {
    let Some(&first) = slots.first() else {
        return Vec::new();
    };

    let mut intervals = Vec::new();
    let mut current = first;
    let mut start = 0;

    for (i, &powered) in slots.iter().enumerate().skip(1) {
        if powered != current {
            intervals.push(Interval::new(start, i, current));
            current = powered;
            start = i;
        }
    }
    intervals.push(Interval::new(start, slots.len(), current));

    intervals
}

/// Ordered intervals of one (date, group).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DaySchedule {
    pub intervals: Vec<Interval>,
}

impl DaySchedule {
    pub fn from_slots(slots: &DaySlots) -> Self {
        Self {
            intervals: merge_slots(slots.as_slice()),
        }
    }

    /// Encode and merge a day's hourly codes in one step.
    pub fn from_hours(hours: &HourCodes, policy: UncertaintyPolicy) -> Self {
        Self::from_slots(&encode_day(hours, policy))
    }

    pub fn total_on_hours(&self) -> f64 {
        self.total_hours(true)
    }

    pub fn total_off_hours(&self) -> f64 {
        self.total_hours(false)
    }

    fn total_hours(&self, powered: bool) -> f64 {
        self.intervals
            .iter()
            .filter(|i| i.powered == powered)
            .map(|i| i.duration_hours)
            .sum()
    }
}
