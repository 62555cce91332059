//! Letter typing for named sections (months, weekdays, meridiem).
//!
//! The query buffer is matched as a case-insensitive prefix against the
//! adapter's options; the lexically first match wins. Repeating the same
//! letter when the longer prefix matches nothing cycles through the options
//! starting with that letter. Letter sections never auto-advance.

use tracing::trace;

use super::{EditContext, Editor, EditorResult};
use crate::adapter::DateAdapter;
use crate::field::KeyEvent;
use crate::section::{ContentType, Section};
use crate::state::QueryKind;
use crate::utils::fold;

#[derive(Debug, Clone, Copy, Default)]
pub struct LetterEditor;

impl LetterEditor {
    pub fn new() -> Self {
        Self
    }
}

/// Options whose folded form starts with the folded `query`, lexically sorted.
fn matching<'a>(options: &'a [String], query: &str) -> Vec<&'a String> {
    let query = fold(query);
    let mut found: Vec<&String> = options.iter().filter(|o| fold(o).starts_with(&query)).collect();
    found.sort_by_key(|o| fold(o));
    found
}

fn is_repeat(previous: &str, ch: char) -> bool {
    let ch = fold(&ch.to_string());
    !previous.is_empty() && previous.chars().all(|c| fold(&c.to_string()) == ch)
}

impl<A: DateAdapter> Editor<A> for LetterEditor {
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

        let options = cx.adapter.letter_options(section.section_type, &section.format_token);
        let previous = cx.state.query_for(index, QueryKind::Letter).unwrap_or("").to_string();
        let appended = format!("{previous}{ch}");

        let (value, query) = if let Some(first) = matching(&options, &appended).first() {
            ((*first).clone(), appended)
        } else if is_repeat(&previous, ch) {
            let cycle = matching(&options, &ch.to_string());
            if cycle.is_empty() {
                return EditorResult::Rejected;
            }
            let next = cycle
                .iter()
                .position(|o| **o == section.value)
                .map_or(0, |pos| (pos + 1) % cycle.len());
            (cycle[next].clone(), appended)
        } else if let Some(first) = matching(&options, &ch.to_string()).first() {
            ((*first).clone(), ch.to_string())
        } else {
            trace!(section = index, %ch, "no option matches");
            return EditorResult::Rejected;
        };

        cx.state.set_query(index, QueryKind::Letter, query);
        if value == section.value {
            return EditorResult::Buffered;
        }
        cx.state.set_section_value(index, value);
        EditorResult::Changed
    }

    fn can_handle(&self, key: &KeyEvent, section: &Section) -> bool {
        matches!(key, KeyEvent::Char(c) if c.is_alphabetic())
            && section.editable
            && section.content_type == ContentType::Letter
    }

    fn name(&self) -> &'static str {
        "letter"
    }
}
