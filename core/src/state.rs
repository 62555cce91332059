//! Section state store.
//!
//! `FieldState` owns the live section array, the current selection and the
//! query buffer used to merge consecutive keystrokes into one section. It is
//! a transient editing buffer: it can always be rebuilt from a date value and
//! a format string.

use crate::section::{Section, SectionType};

/// Current selection inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// A single editable section
    Section(usize),
    /// An inclusive range of section indices (select-all)
    Range { start: usize, end: usize },
}

/// What kind of keystrokes the query buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Digit,
    Letter,
}

/// Keystrokes typed into one section since it was last selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuffer {
    pub section: usize,
    pub kind: QueryKind,
    pub text: String,
}

/// Recompute start/end offsets so sections partition the rendered string.
pub(crate) fn layout_sections(sections: &mut [Section]) {
    let mut offset = 0;
    for section in sections.iter_mut() {
        section.start = offset;
        offset += section.display_len();
        section.end = offset;
    }
}

/// Live editing state of one field.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    sections: Vec<Section>,
    selection: Selection,
    query: Option<QueryBuffer>,
    malformed: bool,
}

impl FieldState {
    /// Create a state from parsed sections.
    pub fn new(mut sections: Vec<Section>, malformed: bool) -> Self {
        layout_sections(&mut sections);
        Self {
            sections,
            selection: Selection::None,
            query: None,
            malformed,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether the format fell back to a single literal section.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    /// The rendered field text (values, or placeholders for empty sections).
    pub fn rendered(&self) -> String {
        self.sections.iter().map(Section::display).collect()
    }

    /// Set a section's value and relayout offsets.
    ///
    /// Returns false for literal or out-of-range indices.
    pub fn set_section_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.sections.get_mut(index) {
            Some(section) if section.editable => {
                section.set_value(value);
                layout_sections(&mut self.sections);
                true
            }
            _ => false,
        }
    }

    /// Clear one section. Returns false if it was already empty or literal.
    pub fn clear_section(&mut self, index: usize) -> bool {
        match self.sections.get_mut(index) {
            Some(section) if section.editable && !section.value.is_empty() => {
                section.clear();
                layout_sections(&mut self.sections);
                true
            }
            _ => false,
        }
    }

    /// Clear every editable section. Returns false if nothing changed.
    pub fn clear_all(&mut self) -> bool {
        let mut changed = false;
        for section in self.sections.iter_mut().filter(|s| !s.is_empty() && s.editable) {
            section.clear();
            changed = true;
        }
        if changed {
            layout_sections(&mut self.sections);
        }
        self.query = None;
        changed
    }

    /// Index of the first section of the given type.
    pub fn index_of(&self, section_type: SectionType) -> Option<usize> {
        self.sections.iter().position(|s| s.section_type == section_type)
    }

    /// Section of the given type, if the format has one.
    pub fn section_of(&self, section_type: SectionType) -> Option<&Section> {
        self.sections.iter().find(|s| s.section_type == section_type)
    }

    /// Every editable section holds a value.
    pub fn is_complete(&self) -> bool {
        !self.malformed && self.sections.iter().filter(|s| s.editable).all(|s| !s.value.is_empty())
    }

    /// No editable section holds a value.
    pub fn is_blank(&self) -> bool {
        self.sections.iter().filter(|s| s.editable).all(|s| s.value.is_empty())
    }

    // ========== Selection ==========

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Index of the single selected section, if any.
    pub fn selected_index(&self) -> Option<usize> {
        match self.selection {
            Selection::Section(index) => Some(index),
            _ => None,
        }
    }

    /// Change the selection.
    ///
    /// Literal sections are never selectable. Selecting anything other than
    /// the section that owns the query buffer clears it.
    pub fn select(&mut self, selection: Selection) -> bool {
        let valid = match selection {
            Selection::None => true,
            Selection::Section(index) => self.sections.get(index).is_some_and(|s| s.editable),
            Selection::Range { start, end } => {
                start <= end
                    && self.sections.get(start).is_some_and(|s| s.editable)
                    && self.sections.get(end).is_some_and(|s| s.editable)
            }
        };
        if !valid {
            return false;
        }
        if self.query.as_ref().map(|q| Selection::Section(q.section)) != Some(selection) {
            self.query = None;
        }
        self.selection = selection;
        true
    }

    /// Editable section indices in rendering order.
    pub fn editable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.editable)
            .map(|(i, _)| i)
    }

    pub fn first_editable(&self) -> Option<usize> {
        self.editable_indices().next()
    }

    pub fn last_editable(&self) -> Option<usize> {
        self.editable_indices().last()
    }

    /// Next editable section after `index`.
    pub fn next_editable(&self, index: usize) -> Option<usize> {
        self.editable_indices().find(|&i| i > index)
    }

    /// Previous editable section before `index`.
    pub fn prev_editable(&self, index: usize) -> Option<usize> {
        self.editable_indices().filter(|&i| i < index).last()
    }

    // ========== Query buffer ==========

    pub fn query(&self) -> Option<&QueryBuffer> {
        self.query.as_ref()
    }

    /// Query text for `section` if the active buffer belongs to it and holds
    /// keystrokes of `kind`.
    pub fn query_for(&self, section: usize, kind: QueryKind) -> Option<&str> {
        self.query
            .as_ref()
            .filter(|q| q.section == section && q.kind == kind)
            .map(|q| q.text.as_str())
    }

    pub fn set_query(&mut self, section: usize, kind: QueryKind, text: String) {
        self.query = Some(QueryBuffer {
            section,
            kind,
            text,
        });
    }

    pub fn clear_query(&mut self) {
        self.query = None;
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
    fn test_new_state_renders_placeholders() {
        let st = state("hh:mm aa");
        assert_eq!(st.rendered(), "hh:mm aa");
        assert!(st.is_blank());
        assert!(!st.is_complete());
        assert_eq!(st.selection(), Selection::None);
    }

    #[test]
    fn test_set_value_relayouts_offsets() {
        let mut st = state("yyyy-MM");
        assert!(st.set_section_value(0, "2023"));
        assert!(st.set_section_value(2, "7"));
        assert_eq!(st.rendered(), "2023-7");
        assert_eq!(st.section(2).map(|s| (s.start, s.end)), Some((5, 6)));
        assert!(!st.set_section_value(1, "x"));
    }

    #[test]
    fn test_literal_is_not_selectable() {
        let mut st = state("HH:mm");
        assert!(!st.select(Selection::Section(1)));
        assert!(st.select(Selection::Section(2)));
        assert!(!st.select(Selection::Range { start: 2, end: 0 }));
        assert_eq!(st.selection(), Selection::Section(2));
    }

    #[test]
    fn test_selecting_other_section_clears_query() {
        let mut st = state("HH:mm");
        st.select(Selection::Section(0));
        st.set_query(0, QueryKind::Digit, "1".to_string());

        st.select(Selection::Section(0));
        assert_eq!(st.query_for(0, QueryKind::Digit), Some("1"));
        assert_eq!(st.query_for(0, QueryKind::Letter), None);

        st.select(Selection::Section(2));
        assert!(st.query().is_none());
    }

    #[test]
    fn test_editable_neighbours() {
        let st = state("MM/dd/yyyy");
        assert_eq!(st.first_editable(), Some(0));
        assert_eq!(st.last_editable(), Some(4));
        assert_eq!(st.next_editable(0), Some(2));
        assert_eq!(st.prev_editable(2), Some(0));
        assert_eq!(st.next_editable(4), None);
        assert_eq!(st.prev_editable(0), None);
    }

    #[test]
    fn test_clear_all_reports_change() {
        let mut st = state("HH:mm");
        assert!(!st.clear_all());
        st.set_section_value(0, "10");
        assert!(st.clear_all());
        assert!(st.is_blank());
        assert!(!st.clear_section(0));
    }
}
