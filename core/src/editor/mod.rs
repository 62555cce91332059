//! Editor trait and the section editors.
//!
//! Each editor handles one family of keystrokes against the selected
//! section: digits, letters, or arrow-key stepping. `FieldEngine` routes a
//! key to the first editor whose `can_handle` accepts it, then turns the
//! returned `EditorResult` into a notification (or not).

pub mod digit;
pub mod letter;
pub mod stepper;

pub use digit::DigitEditor;
pub use letter::LetterEditor;
pub use stepper::Stepper;

use crate::adapter::DateAdapter;
use crate::field::KeyEvent;
use crate::section::{Section, SectionType};
use crate::state::FieldState;
use crate::validation::Validator;

/// Result of processing a key event in an editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorResult<D> {
    /// Section values changed; the engine re-synthesizes the value
    Changed,

    /// Sections were re-derived from this date (cascading step)
    Stepped(D),

    /// Key consumed into the query buffer, no section changed
    Buffered,

    /// Key consumed but refused; state is unchanged
    Rejected,

    /// Key not handled by this editor
    PassThrough,
}

/// Everything an editor may read or touch while processing one key.
pub struct EditContext<'a, A: DateAdapter> {
    pub adapter: &'a A,
    pub state: &'a mut FieldState,
    /// Date that unset units are taken from
    pub reference: &'a A::Date,
    pub validator: &'a Validator<A::Date>,
    /// Units moved by PageUp / PageDown
    pub page_step: i64,
}

/// Editor trait for handling one family of keys against the selected section.
pub trait Editor<A: DateAdapter> {
    /// Process a key event against the selected section.
    fn process_key(&mut self, key: &KeyEvent, cx: &mut EditContext<'_, A>) -> EditorResult<A::Date>;

    /// Whether this editor handles `key` for `section`.
    fn can_handle(&self, key: &KeyEvent, section: &Section) -> bool;

    /// Name used in trace output.
    fn name(&self) -> &'static str;
}

/// Read one unit back from a filled section of `state`.
pub(crate) fn resolve_unit<A: DateAdapter>(
    adapter: &A,
    state: &FieldState,
    unit: SectionType,
) -> Option<i64> {
    let section = state.section_of(unit).filter(|s| !s.value.is_empty())?;
    let parsed = adapter.parse(&section.value, &section.format_token)?;
    Some(adapter.get(&parsed, unit))
}

/// Inclusive numeric bounds for typing or stepping `section`.
///
/// Day bounds follow the month and year already entered; letter sections
/// typed as digits accept `1..=options`.
pub(crate) fn section_bounds<A: DateAdapter>(
    adapter: &A,
    state: &FieldState,
    section: &Section,
) -> (i64, i64) {
    match section.section_type {
        SectionType::Day => {
            let max = resolve_unit(adapter, state, SectionType::Month)
                .map(|month| {
                    let year = resolve_unit(adapter, state, SectionType::Year);
                    adapter.max_day_in_month(month, year)
                })
                .unwrap_or(section.max_value);
            (section.min_value, max.min(section.max_value))
        }
        _ if !section.content_type.has_digits() => {
            let options = adapter.letter_options(section.section_type, &section.format_token);
            (1, options.len() as i64)
        }
        _ => (section.min_value, section.max_value),
    }
}

/// Number of decimal digits in `n`.
pub(crate) fn digit_len(n: i64) -> usize {
    n.unsigned_abs().checked_ilog10().map_or(1, |l| l as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleText;
    use crate::parser::split_format;
    use crate::test_adapter::FixtureAdapter;

    #[test]
    fn test_digit_len() {
        assert_eq!(digit_len(0), 1);
        assert_eq!(digit_len(9), 1);
        assert_eq!(digit_len(12), 2);
        assert_eq!(digit_len(9999), 4);
    }

    #[test]
    fn test_day_bounds_follow_month_and_year() {
        let adapter = FixtureAdapter::new();
        let parsed = split_format(&adapter, &LocaleText::default(), "MM/dd/yyyy");
        let mut state = FieldState::new(parsed.sections, parsed.malformed);
        let day = |state: &FieldState| {
            let section = state.section(2).cloned().unwrap();
            section_bounds(&adapter, state, &section)
        };

        assert_eq!(day(&state), (1, 31));
        state.set_section_value(0, "02");
        assert_eq!(day(&state), (1, 29));
        state.set_section_value(4, "2023");
        assert_eq!(day(&state), (1, 28));
        state.set_section_value(0, "04");
        assert_eq!(day(&state), (1, 30));
    }

    #[test]
    fn test_letter_bounds_count_options() {
        let adapter = FixtureAdapter::new();
        let parsed = split_format(&adapter, &LocaleText::default(), "MMMM");
        let state = FieldState::new(parsed.sections, parsed.malformed);
        let section = state.section(0).cloned().unwrap();
        assert_eq!(section_bounds(&adapter, &state, &section), (1, 12));
    }
}
