//! Multi-group, multi-day report assembly.
//!
//! Groups appear in configured order. Within a group, today precedes
//! tomorrow. Days are joined with [`DAY_SEPARATOR`], groups with
//! [`GROUP_SEPARATOR`], so the chunker can split on group boundaries.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use svitlo_core::{DaySchedule, FeedDay, FeedDocument, UncertaintyPolicy};
use tracing::{debug, warn};

use crate::error::ReportError;
use crate::render::{DayContext, ReportRenderer};

pub const DAY_SEPARATOR: &str = "\n---\n";
pub const GROUP_SEPARATOR: &str = "\n===\n";

/// Builds the full multi-group report text from a feed document.
#[derive(Debug)]
pub struct ReportBuilder {
    renderer: ReportRenderer,
    groups: Vec<String>,
    timezone: Tz,
    policy: UncertaintyPolicy,
}

impl ReportBuilder {
    pub fn new(renderer: ReportRenderer, groups: Vec<String>, timezone: Tz) -> Self {
        Self {
            renderer,
            groups,
            timezone,
            policy: UncertaintyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UncertaintyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render every configured group for today and tomorrow.
    ///
    /// Groups or days missing from the feed are skipped. The result is empty
    /// when nothing at all could be rendered.
    pub fn build(&self, feed: &FeedDocument) -> Result<String, ReportError> {
        let days: Vec<(NaiveDate, FeedDay<'_>)> = feed
            .schedule_days()
            .into_iter()
            .filter_map(|day| match self.local_date(day.timestamp) {
                Some(date) => Some((date, day)),
                None => {
                    warn!(timestamp = day.timestamp, "Feed day timestamp out of range, skipping");
                    None
                }
            })
            .collect();

        if days.is_empty() {
            warn!("Feed contains no schedule days");
            return Ok(String::new());
        }

        let mut sections = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            let mut day_reports = Vec::with_capacity(days.len());

            for (date, day) in &days {
                let Some(hours) = day.group(group) else {
                    debug!(group = %group, timestamp = day.timestamp, "No data for group, skipping day");
                    continue;
                };

                let schedule = DaySchedule::from_hours(hours, self.policy);
                let ctx = DayContext {
                    date: *date,
                    group,
                    label: day.label,
                };
                let report = self.renderer.render_day(&schedule, &ctx)?;
                debug!(
                    group = %group,
                    date = %date,
                    on_hours = report.total_on_hours,
                    off_hours = report.total_off_hours,
                    "Rendered day report"
                );
                day_reports.push(report.text);
            }

            if day_reports.is_empty() {
                warn!(group = %group, "Group missing from feed");
                continue;
            }
            sections.push(day_reports.join(DAY_SEPARATOR));
        }

        Ok(sections.join(GROUP_SEPARATOR))
    }

    /// Calendar date of a feed timestamp in the configured zone.
    fn local_date(&self, timestamp: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&self.timezone).date_naive())
    }
}
