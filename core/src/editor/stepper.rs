//! Arrow-key stepping (Up/Down, PageUp/PageDown).
//!
//! Three regimes:
//! - the selected section is empty: Up sets its minimum, Down its maximum
//!   (the current year for year sections);
//! - the whole field holds a valid date: the date moves by one unit through
//!   the adapter, carrying into larger units, and every section is redrawn;
//! - otherwise the section value wraps within its own bounds.
//!
//! A step whose result is rejected by the configured constraints is refused,
//! except that a value already below (above) its bound may step up (down)
//! toward it.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::{section_bounds, EditContext, Editor, EditorResult};
use crate::adapter::DateAdapter;
use crate::field::KeyEvent;
use crate::section::{ContentType, Section, SectionType};
use crate::state::FieldState;
use crate::synthesizer::{fill_sections, synthesize};
use crate::validation::FieldError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Stepper;

impl Stepper {
    pub fn new() -> Self {
        Self
    }
}

fn step_delta(key: &KeyEvent, page_step: i64) -> Option<i64> {
    match key {
        KeyEvent::Up => Some(1),
        KeyEvent::Down => Some(-1),
        KeyEvent::PageUp => Some(page_step),
        KeyEvent::PageDown => Some(-page_step),
        _ => None,
    }
}

fn has_time(state: &FieldState) -> bool {
    state.sections().iter().any(|s| s.editable && s.section_type.is_time())
}

/// Value an empty section takes on its first step.
fn initial_value<A: DateAdapter>(cx: &EditContext<'_, A>, section: &Section, delta: i64) -> Option<String> {
    if section.content_type == ContentType::Letter {
        let options = cx.adapter.letter_options(section.section_type, &section.format_token);
        let choice = if delta > 0 { options.first() } else { options.last() };
        return choice.cloned();
    }
    let (min, max) = section_bounds(cx.adapter, cx.state, section);
    let n = if section.section_type == SectionType::Year {
        // two-digit years take the last digits of the current year
        let year = cx.adapter.get(&cx.adapter.now(), SectionType::Year);
        if year > max {
            year.rem_euclid(max + 1)
        } else {
            year
        }
    } else if delta > 0 {
        min
    } else {
        max
    };
    cx.adapter.format_numeric(&section.format_token, n)
}

/// Value of `section` moved by `delta` within its own bounds.
fn wrapped_value<A: DateAdapter>(cx: &EditContext<'_, A>, section: &Section, delta: i64) -> Option<String> {
    if section.content_type == ContentType::Letter {
        let options = cx.adapter.letter_options(section.section_type, &section.format_token);
        let len = options.len() as i64;
        if len == 0 {
            return None;
        }
        let current = options.iter().position(|o| *o == section.value).unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(len);
        return options.get(next as usize).cloned();
    }
    let (min, max) = section_bounds(cx.adapter, cx.state, section);
    let current = section.numeric_value?;
    let wrapped = min + (current - min + delta).rem_euclid(max - min + 1);
    cx.adapter.format_numeric(&section.format_token, wrapped)
}

impl Stepper {
    /// Whether stepping from `before` to `after` must be refused.
    ///
    /// A disallowed result is refused unless `before` breaks the same bound
    /// and `after` moves toward it.
    fn violates<A: DateAdapter>(
        cx: &EditContext<'_, A>,
        before: Option<&A::Date>,
        after: &A::Date,
        with_time: bool,
    ) -> bool {
        let constraint = |d: &A::Date| {
            cx.validator
                .validate(cx.adapter, d, with_time)
                .filter(|e| e.is_constraint())
        };
        let Some(error) = constraint(after) else {
            return false;
        };
        let Some(before) = before else {
            return true;
        };
        if constraint(before) != Some(error) {
            return true;
        }
        let direction = cx.adapter.compare(after, before);
        match error {
            FieldError::BelowMin | FieldError::DisablePast => direction != Ordering::Greater,
            FieldError::AboveMax | FieldError::DisableFuture => direction != Ordering::Less,
            _ => true,
        }
    }

    fn step_empty<A: DateAdapter>(
        &self,
        cx: &mut EditContext<'_, A>,
        index: usize,
        section: &Section,
        delta: i64,
    ) -> EditorResult<A::Date> {
        let Some(value) = initial_value(cx, section, delta) else {
            return EditorResult::Rejected;
        };
        let mut next = cx.state.clone();
        next.set_section_value(index, value);
        let synthesis = synthesize(cx.adapter, &next, cx.reference);
        if synthesis.complete {
            if let Some(candidate) = &synthesis.candidate {
                if Self::violates(cx, None, candidate, has_time(&next)) {
                    trace!(section = index, "initial step rejected by constraints");
                    return EditorResult::Rejected;
                }
            }
        }
        next.clear_query();
        *cx.state = next;
        EditorResult::Changed
    }

    fn step_date<A: DateAdapter>(
        &self,
        cx: &mut EditContext<'_, A>,
        section: &Section,
        current: &A::Date,
        delta: i64,
    ) -> EditorResult<A::Date> {
        let stepped = if section.section_type == SectionType::Meridiem {
            let pm = cx.adapter.get(current, SectionType::Meridiem);
            match cx.adapter.set(current, SectionType::Meridiem, 1 - pm) {
                Some(toggled) => toggled,
                None => return EditorResult::Rejected,
            }
        } else {
            cx.adapter.add(current, delta, section.section_type)
        };

        let with_time = has_time(cx.state);
        if Self::violates(cx, Some(current), &stepped, with_time) {
            debug!(unit = ?section.section_type, delta, "step rejected by constraints");
            return EditorResult::Rejected;
        }

        fill_sections(cx.adapter, cx.state, &stepped);
        cx.state.clear_query();
        EditorResult::Stepped(stepped)
    }

    fn step_section<A: DateAdapter>(
        &self,
        cx: &mut EditContext<'_, A>,
        index: usize,
        section: &Section,
        delta: i64,
    ) -> EditorResult<A::Date> {
        let Some(value) = wrapped_value(cx, section, delta) else {
            return EditorResult::Rejected;
        };
        cx.state.set_section_value(index, value);
        cx.state.clear_query();
        EditorResult::Changed
    }
}

impl<A: DateAdapter> Editor<A> for Stepper {
    fn process_key(&mut self, key: &KeyEvent, cx: &mut EditContext<'_, A>) -> EditorResult<A::Date> {
        let Some(delta) = step_delta(key, cx.page_step) else {
            return EditorResult::PassThrough;
        };
        let Some(index) = cx.state.selected_index() else {
            return EditorResult::PassThrough;
        };
        let Some(section) = cx.state.section(index).cloned() else {
            return EditorResult::PassThrough;
        };
        if !<Self as Editor<A>>::can_handle(self, key, &section) {
            return EditorResult::PassThrough;
        }

        if section.value.is_empty() {
            return self.step_empty(cx, index, &section, delta);
        }

        let synthesis = synthesize(cx.adapter, cx.state, cx.reference);
        match synthesis.candidate {
            Some(current) if synthesis.complete && synthesis.error.is_none() => {
                self.step_date(cx, &section, &current, delta)
            }
            _ => self.step_section(cx, index, &section, delta),
        }
    }

    fn can_handle(&self, key: &KeyEvent, section: &Section) -> bool {
        matches!(
            key,
            KeyEvent::Up | KeyEvent::Down | KeyEvent::PageUp | KeyEvent::PageDown
        ) && section.editable
    }

    fn name(&self) -> &'static str {
        "stepper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleText;
    use crate::parser::split_format;
    use crate::state::Selection;
    use crate::test_adapter::{date, FixtureAdapter};
    use crate::validation::Validator;
    use chrono::NaiveDateTime;

    struct Harness {
        adapter: FixtureAdapter,
        state: FieldState,
        validator: Validator<NaiveDateTime>,
        reference: NaiveDateTime,
    }

    impl Harness {
        fn new(format: &str, selected: usize) -> Self {
            let adapter = FixtureAdapter::new();
            let parsed = split_format(&adapter, &LocaleText::default(), format);
            let mut state = FieldState::new(parsed.sections, parsed.malformed);
            state.select(Selection::Section(selected));
            Self {
                adapter,
                state,
                validator: Validator::default(),
                reference: date(2022, 6, 15, 0, 0, 0),
            }
        }

        fn fill(mut self, value: NaiveDateTime) -> Self {
            fill_sections(&self.adapter, &mut self.state, &value);
            self
        }

        fn press(&mut self, key: KeyEvent) -> EditorResult<NaiveDateTime> {
            let mut cx = EditContext {
                adapter: &self.adapter,
                state: &mut self.state,
                reference: &self.reference,
                validator: &self.validator,
                page_step: 5,
            };
            Stepper::new().process_key(&key, &mut cx)
        }

        fn text(&self) -> String {
            self.state.rendered()
        }
    }

    #[test]
    fn test_empty_section_down_sets_max() {
        let mut h = Harness::new("hh:mm aa", 0);
        assert_eq!(h.press(KeyEvent::Down), EditorResult::Changed);
        assert_eq!(h.text(), "12:mm aa");
    }

    #[test]
    fn test_empty_section_up_sets_min() {
        let mut h = Harness::new("hh:mm aa", 2);
        h.press(KeyEvent::Up);
        assert_eq!(h.text(), "hh:00 aa");

        let mut h = Harness::new("hh:mm aa", 4);
        h.press(KeyEvent::Up);
        assert_eq!(h.text(), "hh:mm AM");
    }

    #[test]
    fn test_empty_year_takes_current_year() {
        let mut h = Harness::new("MM/dd/yyyy", 4);
        h.press(KeyEvent::Down);
        assert_eq!(h.text(), "MM/DD/2022");
    }

    #[test]
    fn test_partial_field_wraps_locally() {
        let mut h = Harness::new("MM/dd/yyyy", 0);
        h.state.set_section_value(0, "12");
        h.press(KeyEvent::Up);
        assert_eq!(h.text(), "01/DD/YYYY");
        h.press(KeyEvent::Down);
        assert_eq!(h.text(), "12/DD/YYYY");
    }

    #[test]
    fn test_complete_field_cascades() {
        let mut h = Harness::new("MM/dd/yyyy", 2).fill(date(2022, 12, 31, 0, 0, 0));
        let result = h.press(KeyEvent::Up);
        assert_eq!(result, EditorResult::Stepped(date(2023, 1, 1, 0, 0, 0)));
        assert_eq!(h.text(), "01/01/2023");
    }

    #[test]
    fn test_minutes_underflow_borrows_an_hour() {
        let mut h = Harness::new("HH:mm", 2).fill(date(2022, 6, 15, 10, 0, 0));
        h.press(KeyEvent::Down);
        assert_eq!(h.text(), "09:59");
    }

    #[test]
    fn test_page_keys_move_by_page_step() {
        let mut h = Harness::new("HH:mm", 2).fill(date(2022, 6, 15, 10, 30, 0));
        h.press(KeyEvent::PageUp);
        assert_eq!(h.text(), "10:35");
        h.press(KeyEvent::PageDown);
        h.press(KeyEvent::PageDown);
        assert_eq!(h.text(), "10:25");
    }

    #[test]
    fn test_meridiem_step_toggles() {
        let mut h = Harness::new("hh:mm aa", 4).fill(date(2022, 6, 15, 3, 15, 0));
        let result = h.press(KeyEvent::Down);
        assert_eq!(result, EditorResult::Stepped(date(2022, 6, 15, 15, 15, 0)));
        assert_eq!(h.text(), "03:15 PM");
    }

    #[test]
    fn test_letter_section_wraps_when_partial() {
        let mut h = Harness::new("MMMM yyyy", 0);
        h.state.set_section_value(0, "January");
        h.press(KeyEvent::Down);
        assert_eq!(h.text(), "December YYYY");
    }

    #[test]
    fn test_step_into_disallowed_value_is_rejected() {
        let mut h = Harness::new("MM/dd/yyyy", 2).fill(date(2022, 6, 20, 0, 0, 0));
        h.validator.max_date = Some(date(2022, 6, 20, 0, 0, 0));
        assert_eq!(h.press(KeyEvent::Up), EditorResult::Rejected);
        assert_eq!(h.text(), "06/20/2022");
        assert!(matches!(h.press(KeyEvent::Down), EditorResult::Stepped(_)));
    }

    #[test]
    fn test_disallowed_value_only_steps_toward_its_bound() {
        let mut h = Harness::new("MM/dd/yyyy", 2).fill(date(2023, 1, 5, 0, 0, 0));
        h.validator.min_date = Some(date(2023, 1, 10, 0, 0, 0));
        assert_eq!(h.press(KeyEvent::Down), EditorResult::Rejected);
        assert_eq!(h.text(), "01/05/2023");
        assert_eq!(h.press(KeyEvent::Up), EditorResult::Stepped(date(2023, 1, 6, 0, 0, 0)));

        let mut h = Harness::new("MM/dd/yyyy", 2).fill(date(2023, 1, 15, 0, 0, 0));
        h.validator.max_date = Some(date(2023, 1, 10, 0, 0, 0));
        assert_eq!(h.press(KeyEvent::Up), EditorResult::Rejected);
        assert_eq!(h.text(), "01/15/2023");
        assert!(matches!(h.press(KeyEvent::Down), EditorResult::Stepped(_)));
    }

    #[test]
    fn test_disallowed_by_predicate_cannot_step_elsewhere_disallowed() {
        let mut h = Harness::new("MM/dd/yyyy", 2).fill(date(2023, 1, 14, 0, 0, 0));
        h.validator.disable_date = Some(Box::new(|d: &NaiveDateTime| {
            chrono::Datelike::weekday(d).number_from_monday() >= 6
        }));
        // Saturday 14th -> Sunday 15th: still a weekend
        assert_eq!(h.press(KeyEvent::Up), EditorResult::Rejected);
        assert_eq!(h.press(KeyEvent::Down), EditorResult::Stepped(date(2023, 1, 13, 0, 0, 0)));
    }

    #[test]
    fn test_non_step_keys_pass_through() {
        let mut h = Harness::new("HH:mm", 0);
        assert_eq!(h.press(KeyEvent::Left), EditorResult::PassThrough);
    }
}
