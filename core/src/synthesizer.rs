//! Section values → date value.
//!
//! Every filled section is parsed on its own with its token, and the unit it
//! owns is read back and applied to a reference date in a fixed order (year,
//! month, day, hours, minutes, seconds). Units the format does not carry keep
//! the reference's values; a reference day that does not exist in the new
//! month is clamped to the month's last day.

use tracing::trace;

use crate::adapter::DateAdapter;
use crate::section::SectionType;
use crate::state::FieldState;
use crate::validation::FieldError;

/// Outcome of combining the current sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis<D> {
    /// Best-effort date from the filled sections
    pub candidate: Option<D>,
    /// Every editable section holds a value
    pub complete: bool,
    /// Structural error; constraint checks run separately
    pub error: Option<FieldError>,
}

impl<D> Synthesis<D> {
    fn empty(error: Option<FieldError>) -> Self {
        Self {
            candidate: None,
            complete: false,
            error,
        }
    }
}

/// Unit values read back from the filled sections.
#[derive(Debug, Default)]
struct Components {
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    weekday: Option<i64>,
    hours: Option<i64>,
    twelve_hour: bool,
    minutes: Option<i64>,
    seconds: Option<i64>,
    meridiem: Option<i64>,
}

fn read_components<A: DateAdapter>(adapter: &A, state: &FieldState, reference: &A::Date) -> Option<Components> {
    let mut components = Components::default();
    for section in state.sections().iter().filter(|s| s.editable && !s.value.is_empty()) {
        let parsed = adapter.parse(&section.value, &section.format_token)?;
        let value = Some(adapter.get(&parsed, section.section_type));
        match section.section_type {
            // Two-digit years keep the reference's century.
            SectionType::Year if section.digit_count == 2 => {
                let reference_year = adapter.get(reference, SectionType::Year);
                components.year = value.map(|year| {
                    reference_year - reference_year.rem_euclid(100) + year.rem_euclid(100)
                });
            }
            SectionType::Year => components.year = value,
            SectionType::Month => components.month = value,
            SectionType::Day => components.day = value,
            SectionType::Weekday => components.weekday = value,
            SectionType::Hours => {
                components.hours = value;
                components.twelve_hour = section.is_12_hour();
            }
            SectionType::Minutes => components.minutes = value,
            SectionType::Seconds => components.seconds = value,
            SectionType::Meridiem => components.meridiem = value,
            SectionType::Literal => {}
        }
    }
    Some(components)
}

/// Apply `components` onto `reference`. `None` when a unit cannot be set.
///
/// With `clamp_day`, a typed day that exists in its month in some year (the
/// 29th of February) is clamped to the merged month's last day.
fn merge<A: DateAdapter>(
    adapter: &A,
    components: &Components,
    reference: &A::Date,
    clamp_day: bool,
) -> Option<A::Date> {
    let reference_meridiem = adapter.get(reference, SectionType::Meridiem);
    let hours = match (components.hours, components.meridiem) {
        (Some(h), Some(pm)) if components.twelve_hour => Some(h % 12 + 12 * pm),
        (Some(h), None) if components.twelve_hour => Some(h % 12 + 12 * reference_meridiem),
        (Some(h), _) => Some(h),
        (None, Some(pm)) => Some(adapter.get(reference, SectionType::Hours) % 12 + 12 * pm),
        (None, None) => None,
    };

    let calendar_changes = components.year.is_some() || components.month.is_some();
    let mut date = reference.clone();
    if calendar_changes {
        // Park on the 1st so year/month can be set without overflowing.
        date = adapter.set(&date, SectionType::Day, 1)?;
    }

    for unit in SectionType::MERGE_ORDER {
        let value = match unit {
            SectionType::Year => components.year,
            SectionType::Month => components.month,
            SectionType::Day => match components.day {
                Some(day) if clamp_day => {
                    let month = adapter.get(&date, SectionType::Month);
                    let year = adapter.get(&date, SectionType::Year);
                    if day <= adapter.max_day_in_month(month, None) {
                        Some(day.min(adapter.max_day_in_month(month, Some(year))))
                    } else {
                        Some(day)
                    }
                }
                Some(day) => Some(day),
                None if calendar_changes => {
                    let month = adapter.get(&date, SectionType::Month);
                    let year = adapter.get(&date, SectionType::Year);
                    let last = adapter.max_day_in_month(month, Some(year));
                    Some(adapter.get(reference, SectionType::Day).min(last))
                }
                None => None,
            },
            SectionType::Hours => hours,
            SectionType::Minutes => components.minutes,
            SectionType::Seconds => components.seconds,
            _ => None,
        };
        if let Some(value) = value {
            date = adapter.set(&date, unit, value)?;
        }
    }

    // A weekday only moves the date when no day section pins it.
    if let (Some(weekday), None) = (components.weekday, components.day) {
        date = adapter.set(&date, SectionType::Weekday, weekday)?;
    }

    Some(date)
}

/// Combine the sections of `state` into a candidate date.
pub fn synthesize<A: DateAdapter>(adapter: &A, state: &FieldState, reference: &A::Date) -> Synthesis<A::Date> {
    if state.is_malformed() {
        return Synthesis::empty(Some(FieldError::MalformedFormat));
    }
    if state.is_blank() {
        return Synthesis::empty(None);
    }

    let complete = state.is_complete();
    let components = read_components(adapter, state, reference);
    let mut candidate = components
        .as_ref()
        .and_then(|c| merge(adapter, c, reference, false));
    if candidate.is_none() && !complete {
        // The year has not been typed yet: a leap day is still possible.
        candidate = components
            .as_ref()
            .filter(|c| c.year.is_none())
            .and_then(|c| merge(adapter, c, reference, true));
    }
    let error = match (&candidate, complete) {
        (None, _) => Some(FieldError::InvalidSectionCombination),
        (Some(_), false) => Some(FieldError::Incomplete),
        (Some(_), true) => None,
    };
    if candidate.is_none() {
        trace!(text = %state.rendered(), "sections do not combine into a date");
    }

    Synthesis {
        candidate,
        complete,
        error,
    }
}

/// Overwrite every editable section with `value` rendered by its token.
pub fn fill_sections<A: DateAdapter>(adapter: &A, state: &mut FieldState, value: &A::Date) {
    let filled: Vec<(usize, String)> = state
        .editable_indices()
        .filter_map(|i| {
            let section = state.section(i)?;
            Some((i, adapter.format(value, &section.format_token)))
        })
        .collect();
    for (index, text) in filled {
        state.set_section_value(index, text);
    }
}
