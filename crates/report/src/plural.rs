//! Numeral agreement for duration phrases.
//!
//! East Slavic languages pick one of three noun forms depending on the
//! number: "1 година", "2 години", "5 годин". Fractions always take the
//! "few" form ("0.5 години").

/// Noun form selected by a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralForm {
    /// 1, 21, 31, … (but not 11).
    One,
    /// 2–4, 22–24, … (but not 12–14), and every fraction.
    Few,
    /// Everything else: 0, 5–20, 25–30, …
    Many,
}

/// Select the plural form for `value`.
pub fn plural_form(value: f64) -> PluralForm {
    if value.fract() != 0.0 {
        return PluralForm::Few;
    }

    let n = value.abs() as u64;
    let (last, last_two) = (n % 10, n % 100);
    if last == 1 && last_two != 11 {
        PluralForm::One
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        PluralForm::Few
    } else {
        PluralForm::Many
    }
}

/// Render a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
