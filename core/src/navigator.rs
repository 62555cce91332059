//! Section navigator: pointer and arrow-key focus.
//!
//! Maps character offsets to sections and moves the selection between
//! editable sections. Navigation never wraps.

use serde::Serialize;

use crate::section::SectionType;
use crate::state::{FieldState, Selection};

/// Selected region for highlight rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionBounds {
    /// Character offset (inclusive)
    pub start: usize,
    /// Character offset (exclusive)
    pub end: usize,
    /// Type of the selected section; `None` for a multi-section range
    pub section_type: Option<SectionType>,
}

/// Index of the section owning character `offset`.
///
/// Offsets at or past the end belong to the last section.
pub fn section_at_offset(state: &FieldState, offset: usize) -> Option<usize> {
    let sections = state.sections();
    if sections.is_empty() {
        return None;
    }
    let index = sections.partition_point(|s| s.end <= offset);
    Some(index.min(sections.len() - 1))
}

/// Select the section under `offset`. Clicking a separator selects the next
/// editable section, or the previous one at the end of the field.
pub fn select_at_offset(state: &mut FieldState, offset: usize) -> bool {
    let Some(index) = section_at_offset(state, offset) else {
        return false;
    };
    let target = if state.section(index).is_some_and(|s| s.editable) {
        Some(index)
    } else {
        state
            .next_editable(index)
            .or_else(|| state.prev_editable(index))
    };
    match target {
        Some(index) => state.select(Selection::Section(index)),
        None => false,
    }
}

/// Select every editable section.
pub fn select_all(state: &mut FieldState) -> bool {
    match (state.first_editable(), state.last_editable()) {
        (Some(start), Some(end)) if start == end => state.select(Selection::Section(start)),
        (Some(start), Some(end)) => state.select(Selection::Range { start, end }),
        _ => false,
    }
}

/// Move to the previous editable section. Returns false when nothing moved.
pub fn move_left(state: &mut FieldState) -> bool {
    let target = match state.selection() {
        Selection::None => state.first_editable(),
        Selection::Section(index) => state.prev_editable(index),
        Selection::Range { start, .. } => Some(start),
    };
    select_target(state, target)
}

/// Move to the next editable section. Returns false when nothing moved.
pub fn move_right(state: &mut FieldState) -> bool {
    let target = match state.selection() {
        Selection::None => state.first_editable(),
        Selection::Section(index) => state.next_editable(index),
        Selection::Range { end, .. } => Some(end),
    };
    select_target(state, target)
}

pub fn move_home(state: &mut FieldState) -> bool {
    let target = state.first_editable();
    select_target(state, target)
}

pub fn move_end(state: &mut FieldState) -> bool {
    let target = state.last_editable();
    select_target(state, target)
}

/// Advance after a completed edit: select the next editable section, or
/// just drop the query buffer when the edited section is the last one.
pub fn advance(state: &mut FieldState, from: usize) {
    match state.next_editable(from) {
        Some(next) => {
            state.select(Selection::Section(next));
        }
        None => state.clear_query(),
    }
}

fn select_target(state: &mut FieldState, target: Option<usize>) -> bool {
    match target {
        Some(index) if state.selection() != Selection::Section(index) => {
            state.select(Selection::Section(index))
        }
        _ => false,
    }
}

/// Bounds of the current selection.
pub fn selection_bounds(state: &FieldState) -> Option<SelectionBounds> {
    match state.selection() {
        Selection::None => None,
        Selection::Section(index) => state.section(index).map(|s| SelectionBounds {
            start: s.start,
            end: s.end,
            section_type: Some(s.section_type),
        }),
        Selection::Range { start, end } => {
            let first = state.section(start)?;
            let last = state.section(end)?;
            Some(SelectionBounds {
                start: first.start,
                end: last.end,
                section_type: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleText;
    use crate::parser::split_format;
    use crate::test_adapter::FixtureAdapter;

    fn state(format: &str) -> FieldState {
        let parsed = split_format(&FixtureAdapter::new(), &LocaleText::default(), format);
        FieldState::new(parsed.sections, parsed.malformed)
    }

    #[test]
    fn test_offset_lookup() {
        // "hh:mm aa" -> hh[0,2) :[2,3) mm[3,5) " "[5,6) aa[6,8)
        let st = state("hh:mm aa");
        assert_eq!(section_at_offset(&st, 0), Some(0));
        assert_eq!(section_at_offset(&st, 1), Some(0));
        assert_eq!(section_at_offset(&st, 2), Some(1));
        assert_eq!(section_at_offset(&st, 4), Some(2));
        assert_eq!(section_at_offset(&st, 7), Some(4));
        assert_eq!(section_at_offset(&st, 99), Some(4));
    }

    #[test]
    fn test_click_on_separator_selects_next_section() {
        let mut st = state("hh:mm aa");
        assert!(select_at_offset(&mut st, 2));
        assert_eq!(st.selection(), Selection::Section(2));

        let mut trailing = state("HH'h'");
        assert!(select_at_offset(&mut trailing, 2));
        assert_eq!(trailing.selection(), Selection::Section(0));
    }

    #[test]
    fn test_arrows_do_not_wrap() {
        let mut st = state("MM/dd/yyyy");
        assert!(move_right(&mut st));
        assert_eq!(st.selection(), Selection::Section(0));
        assert!(!move_left(&mut st));
        assert_eq!(st.selection(), Selection::Section(0));

        assert!(move_end(&mut st));
        assert_eq!(st.selection(), Selection::Section(4));
        assert!(!move_right(&mut st));

        assert!(move_left(&mut st));
        assert_eq!(st.selection(), Selection::Section(2));
        assert!(move_home(&mut st));
        assert_eq!(st.selection(), Selection::Section(0));
    }

    #[test]
    fn test_select_all_and_collapse() {
        let mut st = state("MM/dd/yyyy");
        assert!(select_all(&mut st));
        assert_eq!(st.selection(), Selection::Range { start: 0, end: 4 });
        assert_eq!(
            selection_bounds(&st),
            Some(SelectionBounds { start: 0, end: 10, section_type: None })
        );

        assert!(move_right(&mut st));
        assert_eq!(st.selection(), Selection::Section(4));
    }

    #[test]
    fn test_selection_bounds_for_section() {
        let mut st = state("hh:mm aa");
        st.select(Selection::Section(4));
        assert_eq!(
            selection_bounds(&st),
            Some(SelectionBounds {
                start: 6,
                end: 8,
                section_type: Some(SectionType::Meridiem),
            })
        );
    }
}
