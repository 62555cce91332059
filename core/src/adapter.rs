// core/src/adapter.rs
//
// Date adapter capability. The engine never does calendar math itself: every
// parse, format, step and comparison goes through this trait so the same
// section machinery works over any date library or calendar system.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::section::{SectionType, TokenInfo};

/// Kind of field, used to pick a default format when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Date,
    Time,
    #[default]
    DateTime,
}

/// Trait that date libraries must implement to back a field.
///
/// Implementations must be pure and synchronous: the engine calls them inside
/// a single keystroke's processing pass.
pub trait DateAdapter {
    /// The date-like value this adapter manipulates.
    type Date: Clone + std::fmt::Debug + PartialEq;

    /// Metadata for a recognized format token, or `None` if the token is unknown.
    fn token_info(&self, token: &str) -> Option<TokenInfo>;

    /// Every token the adapter recognizes. The parser matches longest first.
    fn format_tokens(&self) -> Vec<&'static str>;

    /// Characters opening and closing an escaped (literal) run in a format.
    fn escape_chars(&self) -> (char, char) {
        ('\'', '\'')
    }

    /// Parse a single section's text with its token.
    ///
    /// Components the token does not describe take adapter defaults; the
    /// engine only reads back the component the token owns.
    fn parse(&self, text: &str, token: &str) -> Option<Self::Date>;

    /// Parse a configuration string (`YYYY-MM-DD`, `HH:MM[:SS]` or both
    /// joined by `T`).
    fn parse_iso(&self, text: &str) -> Option<Self::Date>;

    /// Render one component of `value` with `token`.
    fn format(&self, value: &Self::Date, token: &str) -> String;

    /// Render a numeric section value with `token`.
    ///
    /// The default zero-pads digit tokens. Adapters override this to map
    /// numbers onto names (letter months) or ordinals.
    fn format_numeric(&self, token: &str, value: i64) -> Option<String> {
        let info = self.token_info(token)?;
        if info.has_leading_zeros {
            Some(format!("{:0width$}", value, width = info.digit_count))
        } else {
            Some(value.to_string())
        }
    }

    /// Enumerable values for letter sections, in calendar order.
    fn letter_options(&self, section_type: SectionType, token: &str) -> Vec<String>;

    /// Add `amount` units to `value`, cascading into larger units.
    fn add(&self, value: &Self::Date, amount: i64, unit: SectionType) -> Self::Date;

    /// Read one component. Hours are 0-23, months 1-12, weekdays 0-6 from
    /// the start of the locale week, meridiem 0 (AM) or 1 (PM).
    fn get(&self, value: &Self::Date, unit: SectionType) -> i64;

    /// Set one component, returning `None` if the result does not exist
    /// (e.g. day 31 in April).
    fn set(&self, value: &Self::Date, unit: SectionType, amount: i64) -> Option<Self::Date>;

    /// Number of days in `month`; with no year the maximum over all years.
    fn max_day_in_month(&self, month: i64, year: Option<i64>) -> i64;

    fn is_valid(&self, value: &Self::Date) -> bool;

    fn compare(&self, a: &Self::Date, b: &Self::Date) -> Ordering;

    /// Inclusive range check.
    fn is_within_range(&self, value: &Self::Date, min: &Self::Date, max: &Self::Date) -> bool {
        self.compare(value, min) != Ordering::Less && self.compare(value, max) != Ordering::Greater
    }

    fn now(&self) -> Self::Date;

    /// Whether the adapter's locale defaults to a 12-hour clock.
    fn is_12_hour_cycle(&self) -> bool;

    /// Default format for a field kind on the requested hour cycle.
    fn default_format(&self, kind: FieldKind, ampm: bool) -> String;

    /// Start of the day containing `value`.
    fn start_of_day(&self, value: &Self::Date) -> Self::Date {
        [SectionType::Hours, SectionType::Minutes, SectionType::Seconds]
            .into_iter()
            .fold(value.clone(), |acc, unit| {
                self.set(&acc, unit, 0).unwrap_or(acc)
            })
    }
}
