//! Field engine with key event processing.
//!
//! `FieldEngine` ties the section state, the editors and the validator to a
//! date adapter. Hosts feed it key events and pointer offsets, then read
//! `context()` to redraw and drain change notifications.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, trace};

use crate::adapter::DateAdapter;
use crate::context::FieldContext;
use crate::editor::{DigitEditor, EditContext, Editor, EditorResult, LetterEditor, Stepper};
use crate::locale::LocaleText;
use crate::navigator::{self, SelectionBounds};
use crate::parser::FormatParser;
use crate::section::Section;
use crate::state::{FieldState, Selection};
use crate::synthesizer::{fill_sections, synthesize, Synthesis};
use crate::validation::{FieldError, Validator};
use crate::Config;

/// Key event types a field can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable character (digits, letters, separators)
    Char(char),
    /// Backspace key (clear selection)
    Backspace,
    /// Delete key (clear selection)
    Delete,
    /// Left arrow key (previous section)
    Left,
    /// Right arrow key (next section)
    Right,
    /// Home key (first section)
    Home,
    /// End key (last section)
    End,
    /// Up arrow key (increment)
    Up,
    /// Down arrow key (decrement)
    Down,
    /// Page up (increment by page step)
    PageUp,
    /// Page down (decrement by page step)
    PageDown,
    /// Select every section
    SelectAll,
    /// Ctrl + character (Ctrl+A selects all)
    Ctrl(char),
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was consumed by the field
    Handled,
    /// Key was not handled (let the host's default behaviour run)
    NotHandled,
}

/// Sectioned date/time field over a date adapter.
pub struct FieldEngine<A: DateAdapter> {
    adapter: Arc<A>,
    config: Config,
    locale: LocaleText,
    parser: FormatParser,
    validator: Validator<A::Date>,
    format: String,

    /// Live sections, selection and query buffer
    state: FieldState,

    /// Reference used while no valid value has been seen
    reference: A::Date,

    /// Most recent complete, error-free value; survives clearing
    last_valid: Option<A::Date>,

    digit_editor: DigitEditor,
    letter_editor: LetterEditor,
    stepper: Stepper,

    /// Context for host communication
    context: FieldContext<A::Date>,
}

fn resolve_format<A: DateAdapter>(adapter: &A, config: &Config) -> String {
    match &config.format {
        Some(format) => format.clone(),
        None => {
            let ampm = config.ampm.unwrap_or_else(|| adapter.is_12_hour_cycle());
            adapter.default_format(config.kind, ampm)
        }
    }
}

impl<A: DateAdapter> FieldEngine<A> {
    /// Create a field with default placeholder text.
    pub fn new(adapter: A, config: Config) -> anyhow::Result<Self> {
        Self::from_arc(Arc::new(adapter), config, LocaleText::default())
    }

    /// Create a field with custom placeholder text.
    pub fn with_locale(adapter: A, config: Config, locale: LocaleText) -> anyhow::Result<Self> {
        Self::from_arc(Arc::new(adapter), config, locale)
    }

    /// Create a field from an Arc-wrapped adapter.
    ///
    /// Fails when a date string in `config` cannot be parsed by the adapter.
    pub fn from_arc(adapter: Arc<A>, config: Config, locale: LocaleText) -> anyhow::Result<Self> {
        let validator = Validator::from_config(&config, adapter.as_ref())?;
        let reference = match &config.reference_date {
            Some(text) => adapter
                .parse_iso(text)
                .with_context(|| format!("invalid reference_date {text:?}"))?,
            None => adapter.start_of_day(&adapter.now()),
        };
        let default_value = match &config.default_value {
            Some(text) => Some(
                adapter
                    .parse_iso(text)
                    .with_context(|| format!("invalid default_value {text:?}"))?,
            ),
            None => None,
        };

        let format = resolve_format(adapter.as_ref(), &config);
        let parser = FormatParser::new(config.format_cache_size);
        let parsed = parser.parse(adapter.as_ref(), &locale, &format);
        debug!(%format, sections = parsed.sections.len(), "field created");

        let mut engine = Self {
            adapter,
            config,
            locale,
            parser,
            validator,
            format,
            state: FieldState::new(parsed.sections, parsed.malformed),
            reference,
            last_valid: None,
            digit_editor: DigitEditor::new(),
            letter_editor: LetterEditor::new(),
            stepper: Stepper::new(),
            context: FieldContext::new(),
        };
        engine.set_value(default_value);
        Ok(engine)
    }

    // ========== Accessors ==========

    /// Get a reference to the context for reading field state.
    pub fn context(&self) -> &FieldContext<A::Date> {
        &self.context
    }

    /// Get a mutable reference to the context.
    pub fn context_mut(&mut self) -> &mut FieldContext<A::Date> {
        &mut self.context
    }

    /// Drain pending change notifications.
    pub fn take_changes(&mut self) -> Vec<crate::context::FieldChange<A::Date>> {
        self.context.take_changes()
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn value(&self) -> Option<&A::Date> {
        self.context.value.as_ref()
    }

    pub fn error(&self) -> Option<FieldError> {
        self.context.error
    }

    /// Rendered field text.
    pub fn text(&self) -> &str {
        &self.context.text
    }

    /// Most recent complete, error-free value.
    pub fn last_valid(&self) -> Option<&A::Date> {
        self.last_valid.as_ref()
    }

    /// Format template cache statistics (hits, misses).
    pub fn cache_stats(&self) -> (usize, usize) {
        self.parser.cache_stats()
    }

    // ========== Key processing ==========

    /// Process a key event and update field state.
    ///
    /// After calling this, the host should read `context()` to redraw the
    /// field. Returns `KeyResult::NotHandled` when the host's default
    /// behaviour should run instead.
    pub fn process_key(&mut self, key: KeyEvent) -> KeyResult {
        trace!(?key, selection = ?self.state.selection(), "process key");

        let key = match key {
            KeyEvent::Ctrl('a') | KeyEvent::Ctrl('A') => KeyEvent::SelectAll,
            other => other,
        };

        // Navigation works on read-only fields too
        let moved = match key {
            KeyEvent::Left => Some(navigator::move_left(&mut self.state)),
            KeyEvent::Right => Some(navigator::move_right(&mut self.state)),
            KeyEvent::Home => Some(navigator::move_home(&mut self.state)),
            KeyEvent::End => Some(navigator::move_end(&mut self.state)),
            KeyEvent::SelectAll => Some(navigator::select_all(&mut self.state)),
            KeyEvent::Ctrl(_) => return KeyResult::NotHandled,
            _ => None,
        };
        if let Some(moved) = moved {
            if moved {
                self.sync_context();
            }
            return KeyResult::Handled;
        }

        if self.state.selection() == Selection::None {
            return KeyResult::NotHandled;
        }
        if self.config.read_only {
            trace!("read-only field, ignoring edit");
            return KeyResult::Handled;
        }

        let result = match key {
            KeyEvent::Backspace | KeyEvent::Delete => self.clear_selection(),
            KeyEvent::Up | KeyEvent::Down | KeyEvent::PageUp | KeyEvent::PageDown => {
                if matches!(self.state.selection(), Selection::Range { .. }) {
                    return KeyResult::NotHandled;
                }
                self.route(key)
            }
            KeyEvent::Char(_) => {
                if let Selection::Range { start, .. } = self.state.selection() {
                    // Typing over a range edits its first section, but only
                    // once some editor takes the key.
                    let accepted = self
                        .state
                        .section(start)
                        .is_some_and(|section| self.accepts(&key, section));
                    if !accepted {
                        return KeyResult::NotHandled;
                    }
                    self.state.select(Selection::Section(start));
                }
                self.route(key)
            }
            _ => EditorResult::PassThrough,
        };

        self.apply_result(result)
    }

    fn accepts(&self, key: &KeyEvent, section: &Section) -> bool {
        <DigitEditor as Editor<A>>::can_handle(&self.digit_editor, key, section)
            || <LetterEditor as Editor<A>>::can_handle(&self.letter_editor, key, section)
            || <Stepper as Editor<A>>::can_handle(&self.stepper, key, section)
    }

    /// Hand `key` to the first editor that accepts it for the selected section.
    fn route(&mut self, key: KeyEvent) -> EditorResult<A::Date> {
        let Some(section) = self
            .state
            .selected_index()
            .and_then(|i| self.state.section(i))
            .cloned()
        else {
            return EditorResult::PassThrough;
        };
        let reference = self.reference_value();

        let editor: &mut dyn Editor<A> = if <DigitEditor as Editor<A>>::can_handle(&self.digit_editor, &key, &section) {
            &mut self.digit_editor
        } else if <LetterEditor as Editor<A>>::can_handle(&self.letter_editor, &key, &section) {
            &mut self.letter_editor
        } else if <Stepper as Editor<A>>::can_handle(&self.stepper, &key, &section) {
            &mut self.stepper
        } else {
            return EditorResult::PassThrough;
        };

        let mut cx = EditContext {
            adapter: self.adapter.as_ref(),
            state: &mut self.state,
            reference: &reference,
            validator: &self.validator,
            page_step: self.config.page_step,
        };
        let result = editor.process_key(&key, &mut cx);
        trace!(editor = editor.name(), ?result, "editor result");
        result
    }

    /// Backspace / Delete: clear the selected section or range.
    fn clear_selection(&mut self) -> EditorResult<A::Date> {
        let cleared = match self.state.selection() {
            Selection::None => false,
            Selection::Section(index) => self.state.clear_section(index),
            Selection::Range { start, end } => {
                let mut cleared = false;
                for index in start..=end {
                    cleared |= self.state.clear_section(index);
                }
                cleared
            }
        };
        self.state.clear_query();
        if cleared {
            EditorResult::Changed
        } else {
            EditorResult::Rejected
        }
    }

    fn apply_result(&mut self, result: EditorResult<A::Date>) -> KeyResult {
        match result {
            EditorResult::Changed => {
                self.commit(None);
                KeyResult::Handled
            }
            EditorResult::Stepped(date) => {
                self.commit(Some(date));
                KeyResult::Handled
            }
            EditorResult::Buffered | EditorResult::Rejected => {
                self.sync_context();
                KeyResult::Handled
            }
            EditorResult::PassThrough => KeyResult::NotHandled,
        }
    }

    // ========== Selection ==========

    /// Select the section under a pointer offset.
    pub fn select_at_offset(&mut self, offset: usize) -> bool {
        let selected = navigator::select_at_offset(&mut self.state, offset);
        self.sync_context();
        selected
    }

    /// Select the section at `index`. Literal sections cannot be selected.
    pub fn select_section(&mut self, index: usize) -> bool {
        let selected = self.state.select(Selection::Section(index));
        self.sync_context();
        selected
    }

    pub fn select_all(&mut self) -> bool {
        let selected = navigator::select_all(&mut self.state);
        self.sync_context();
        selected
    }

    /// Drop the selection (field blur).
    pub fn clear_selection_focus(&mut self) {
        self.state.select(Selection::None);
        self.sync_context();
    }

    pub fn selection_bounds(&self) -> Option<SelectionBounds> {
        navigator::selection_bounds(&self.state)
    }

    // ========== Programmatic updates (no notification) ==========

    /// Replace the value from the host. Does not notify.
    pub fn set_value(&mut self, value: Option<A::Date>) {
        match value {
            Some(value) => {
                fill_sections(self.adapter.as_ref(), &mut self.state, &value);
                self.last_valid = Some(value);
            }
            None => {
                self.state.clear_all();
            }
        }
        self.state.clear_query();
        self.refresh();
    }

    /// Switch to a new format, re-deriving sections from the current value.
    pub fn set_format(&mut self, format: &str) {
        debug!(from = %self.format, to = %format, "format changed");
        self.format = format.to_string();
        self.rebuild_sections();
    }

    /// Replace the placeholder text. Cached templates are dropped.
    pub fn set_locale(&mut self, locale: LocaleText) {
        self.locale = locale;
        self.parser.clear_cache();
        self.rebuild_sections();
    }

    /// Install a date predicate; `true` disables the date.
    pub fn set_disable_date<F>(&mut self, predicate: F)
    where
        F: Fn(&A::Date) -> bool + 'static,
    {
        self.validator.disable_date = Some(Box::new(predicate));
        self.refresh();
    }

    /// Install a time predicate; only consulted when the format has time sections.
    pub fn set_disable_time<F>(&mut self, predicate: F)
    where
        F: Fn(&A::Date) -> bool + 'static,
    {
        self.validator.disable_time = Some(Box::new(predicate));
        self.refresh();
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.config.read_only = read_only;
    }

    fn rebuild_sections(&mut self) {
        let parsed = self.parser.parse(self.adapter.as_ref(), &self.locale, &self.format);
        let selection = self.state.selection();
        self.state = FieldState::new(parsed.sections, parsed.malformed);
        if let Some(value) = self.context.value.clone() {
            fill_sections(self.adapter.as_ref(), &mut self.state, &value);
        }
        // keep the focus on the same index when it is still selectable
        self.state.select(selection);
        self.refresh();
    }

    // ========== Synthesis ==========

    /// Date unset units are taken from.
    fn reference_value(&self) -> A::Date {
        self.last_valid
            .clone()
            .unwrap_or_else(|| self.reference.clone())
    }

    fn has_time(&self) -> bool {
        self.state
            .sections()
            .iter()
            .any(|s| s.editable && s.section_type.is_time())
    }

    /// Recompute value, candidate and error from the sections.
    fn evaluate(&self, stepped: Option<A::Date>) -> Synthesis<A::Date> {
        let mut synthesis = match stepped {
            Some(date) => Synthesis {
                candidate: Some(date),
                complete: true,
                error: None,
            },
            None => synthesize(self.adapter.as_ref(), &self.state, &self.reference_value()),
        };
        if synthesis.complete && synthesis.error.is_none() {
            if let Some(candidate) = &synthesis.candidate {
                synthesis.error = self
                    .validator
                    .validate(self.adapter.as_ref(), candidate, self.has_time());
            }
        }
        synthesis
    }

    fn store(&mut self, synthesis: Synthesis<A::Date>) {
        let value = match (&synthesis.candidate, synthesis.error) {
            (Some(candidate), None) if synthesis.complete => Some(candidate.clone()),
            _ => None,
        };
        self.context.value = value;
        self.context.candidate = synthesis.candidate;
        self.context.error = synthesis.error;
        self.sync_context();
    }

    /// Re-evaluate without notifying the host.
    fn refresh(&mut self) {
        let synthesis = self.evaluate(None);
        self.store(synthesis);
    }

    /// Re-evaluate after an accepted edit and notify the host.
    fn commit(&mut self, stepped: Option<A::Date>) {
        let synthesis = self.evaluate(stepped);
        self.store(synthesis);
        if let Some(value) = &self.context.value {
            self.last_valid = Some(value.clone());
        }
        debug!(
            text = %self.context.text,
            error = ?self.context.error,
            "field changed"
        );
        self.context.push_change();
    }

    /// Copy rendered text, sections and selection into the context.
    fn sync_context(&mut self) {
        self.context.text = self.state.rendered();
        self.context.sections = self.state.sections().iter().map(|s| s.meta()).collect();
        self.context.selection = navigator::selection_bounds(&self.state);
    }
}
