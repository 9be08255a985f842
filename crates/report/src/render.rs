//! Minijinja rendering of one day's schedule.
//!
//! The layout comes from the [`Locale`] unless a custom template is
//! supplied. A fresh [`minijinja::Environment`] is created per render call,
//! with the locale's `hours` and `glyph` filters registered.

use std::path::Path;

use chrono::NaiveDate;
use svitlo_core::{DayLabel, DaySchedule};

use crate::error::ReportError;
use crate::locale::Locale;

/// What a day report is about.
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub date: NaiveDate,
    /// Feed group id, e.g. `GPV12.1`.
    pub group: &'a str,
    pub label: DayLabel,
}

/// Rendered text for one (date, group) with its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub text: String,
    pub total_on_hours: f64,
    pub total_off_hours: f64,
}

#[derive(Debug, serde::Serialize)]
struct IntervalView {
    start: String,
    end: String,
    powered: bool,
    hours: f64,
}

#[derive(Debug, serde::Serialize)]
struct TemplateContext<'a> {
    day_label: &'a str,
    date: String,
    weekday: &'a str,
    group: &'a str,
    intervals: Vec<IntervalView>,
    total_on: f64,
    total_off: f64,
}

/// Renders day schedules into localized text.
#[derive(Debug)]
pub struct ReportRenderer {
    locale: &'static Locale,
    template: String,
    group_prefix: String,
}

impl ReportRenderer {
    /// Renderer using the locale's built-in layout.
    pub fn new(locale: &'static Locale) -> Self {
        Self {
            locale,
            template: locale.day_template.to_string(),
            group_prefix: String::new(),
        }
    }

    /// Strip `prefix` from group ids before display.
    pub fn with_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = prefix.into();
        self
    }

    /// Replace the day layout. The template is validated immediately.
    pub fn with_template(mut self, template: impl Into<String>) -> Result<Self, ReportError> {
        let template = template.into();
        self.validate(&template)?;
        self.template = template;
        Ok(self)
    }

    /// Replace the day layout with the contents of a template file.
    pub fn with_template_file(self, path: &Path) -> Result<Self, ReportError> {
        let template = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded custom day template");
        self.with_template(template)
    }

    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    /// Group id as shown to readers (`GPV12.1` → `12.1`).
    pub fn display_group<'a>(&self, group: &'a str) -> &'a str {
        if self.group_prefix.is_empty() {
            return group;
        }
        group.strip_prefix(self.group_prefix.as_str()).unwrap_or(group)
    }

    /// Render one day of one group.
    pub fn render_day(
        &self,
        schedule: &DaySchedule,
        ctx: &DayContext<'_>,
    ) -> Result<Report, ReportError> {
        let total_on_hours = schedule.total_on_hours();
        let total_off_hours = schedule.total_off_hours();

        let context = TemplateContext {
            day_label: self.locale.day_label(ctx.label),
            date: ctx.date.format("%d.%m").to_string(),
            weekday: self.locale.weekday_name(ctx.date),
            group: self.display_group(ctx.group),
            intervals: schedule
                .intervals
                .iter()
                .map(|i| IntervalView {
                    start: i.start_time(),
                    end: i.end_time(),
                    powered: i.powered,
                    hours: i.duration_hours,
                })
                .collect(),
            total_on: total_on_hours,
            total_off: total_off_hours,
        };

        let text = self
            .build_env()
            .render_str(&self.template, &context)
            .map_err(|e| ReportError::Template(e.to_string()))?;

        Ok(Report {
            text,
            total_on_hours,
            total_off_hours,
        })
    }

    /// Build a minijinja environment with the locale's filters.
    fn build_env(&self) -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        let locale = self.locale;
        env.add_filter("hours", move |value: f64| locale.hours_phrase(value));
        env.add_filter("glyph", move |powered: bool| locale.glyph(powered).to_string());
        env
    }

    fn validate(&self, template: &str) -> Result<(), ReportError> {
        let env = self.build_env();
        env.template_from_str(template)
            .map_err(|e| ReportError::Template(e.to_string()))?;
        Ok(())
    }
}
