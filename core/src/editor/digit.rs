//! Digit typing.
//!
//! Consecutive digits typed into the same section accumulate in the query
//! buffer. When appending a digit would overflow the section's maximum the
//! buffer restarts from that digit. The selection advances once no further
//! digit could keep the value in range.

use tracing::trace;

use super::{digit_len, section_bounds, EditContext, Editor, EditorResult};
use crate::adapter::DateAdapter;
use crate::field::KeyEvent;
use crate::navigator;
use crate::section::{Section, SectionType};
use crate::state::QueryKind;

/// Handles `0-9` for digit sections and for letter months/weekdays.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitEditor;

impl DigitEditor {
    pub fn new() -> Self {
        Self
    }
}

fn accepts_digits(section: &Section) -> bool {
    section.editable
        && (section.content_type.has_digits()
            || matches!(section.section_type, SectionType::Month | SectionType::Weekday))
}

fn parse_query(query: &str) -> Option<i64> {
    query.parse().ok()
}

impl<A: DateAdapter> Editor<A> for DigitEditor {
    fn process_key(&mut self, key: &KeyEvent, cx: &mut EditContext<'_, A>) -> EditorResult<A::Date> {
        let KeyEvent::Char(ch) = *key else {
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

        let (min, max) = section_bounds(cx.adapter, cx.state, &section);
        let max_len = digit_len(max);

        let previous = cx.state.query_for(index, QueryKind::Digit).unwrap_or("");
        let appended = format!("{previous}{ch}");
        let query = match parse_query(&appended) {
            Some(n) if !previous.is_empty() && appended.len() <= max_len && n <= max => appended,
            _ => ch.to_string(),
        };
        let Some(candidate) = parse_query(&query) else {
            return EditorResult::Rejected;
        };

        if candidate > max {
            trace!(section = index, candidate, max, "digit above section maximum");
            cx.state.clear_query();
            return EditorResult::Rejected;
        }
        if candidate < min {
            // "0" in a month section: wait for the next digit
            cx.state.set_query(index, QueryKind::Digit, query);
            return EditorResult::Buffered;
        }

        let Some(value) = cx.adapter.format_numeric(&section.format_token, candidate) else {
            return EditorResult::Rejected;
        };
        cx.state.set_section_value(index, value);

        let complete = query.len() >= max_len || candidate * 10 > max;
        if complete {
            navigator::advance(cx.state, index);
        } else {
            cx.state.set_query(index, QueryKind::Digit, query);
        }
        EditorResult::Changed
    }

    fn can_handle(&self, key: &KeyEvent, section: &Section) -> bool {
        matches!(key, KeyEvent::Char(c) if c.is_ascii_digit()) && accepts_digits(section)
    }

    fn name(&self) -> &'static str {
        "digit"
    }
}
