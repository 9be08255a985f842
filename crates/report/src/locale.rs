//! Language tables used by the renderer.

use chrono::{Datelike, NaiveDate};
use svitlo_core::DayLabel;

use crate::plural::{format_quantity, plural_form, PluralForm};

/// Default Ukrainian day layout.
///
/// Variables: `day_label`, `date`, `weekday`, `group`, `intervals`
/// (`start`, `end`, `powered`, `hours`), `total_on`, `total_off`.
/// Filters: `hours`, `glyph`.
const UK_DAY_TEMPLATE: &str = "\
🗓 Графік відключень на {{ day_label }}, {{ date }} ({{ weekday }}), група {{ group }}:
{% for i in intervals -%}
{{ i.powered | glyph }}{{ i.start }} - {{ i.end }} ({{ i.hours | hours }})
{% endfor %}
Світло є {{ total_on | hours }}
Світла нема {{ total_off | hours }}
";

/// Words, glyphs and layout for one report language.
#[derive(Debug)]
pub struct Locale {
    /// Indexed by ISO weekday, 0 = Monday.
    pub weekdays: [&'static str; 7],
    pub today: &'static str,
    pub tomorrow: &'static str,
    /// "hour" in the one / few / many forms.
    pub hour_forms: [&'static str; 3],
    pub powered_glyph: &'static str,
    pub unpowered_glyph: &'static str,
    pub day_template: &'static str,
}

pub static UKRAINIAN: Locale = Locale {
    weekdays: [
        "Понеділок",
        "Вівторок",
        "Середа",
        "Четвер",
        "П'ятниця",
        "Субота",
        "Неділя",
    ],
    today: "сьогодні",
    tomorrow: "завтра",
    hour_forms: ["година", "години", "годин"],
    powered_glyph: "🔋",
    unpowered_glyph: "🪫",
    day_template: UK_DAY_TEMPLATE,
};

impl Locale {
    pub fn weekday_name(&self, date: NaiveDate) -> &'static str {
        self.weekdays[date.weekday().num_days_from_monday() as usize]
    }

    pub fn day_label(&self, label: DayLabel) -> &'static str {
        match label {
            DayLabel::Today => self.today,
            DayLabel::Tomorrow => self.tomorrow,
        }
    }

    /// "2 години", "0.5 години", "5 годин".
    pub fn hours_phrase(&self, hours: f64) -> String {
        let form = match plural_form(hours) {
            PluralForm::One => self.hour_forms[0],
            PluralForm::Few => self.hour_forms[1],
            PluralForm::Many => self.hour_forms[2],
        };
        format!("{} {}", format_quantity(hours), form)
    }

    pub fn glyph(&self, powered: bool) -> &'static str {
        if powered {
            self.powered_glyph
        } else {
            self.unpowered_glyph
        }
    }
}
