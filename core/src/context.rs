//! Field context for host communication.
//!
//! `FieldContext` is a plain data container with public fields. After each
//! `process_key()` the host reads it to redraw the field, and drains
//! `changes` (via `take_changes`) to learn about accepted edits. No
//! callbacks, no traits.

use serde::Serialize;

use crate::navigator::SelectionBounds;
use crate::section::SectionMeta;
use crate::validation::FieldError;

/// One accepted edit, in the order edits happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange<D> {
    /// Surfaced value: complete and error-free, otherwise `None`
    pub value: Option<D>,
    /// Best-effort value even when incomplete or rejected
    pub candidate: Option<D>,
    pub error: Option<FieldError>,
    /// Rendered field text after the edit
    pub text: String,
    pub sections: Vec<SectionMeta>,
}

/// Field state as seen by the host.
#[derive(Debug, Clone, Serialize)]
pub struct FieldContext<D> {
    /// Rendered text (values, placeholders for empty sections)
    pub text: String,

    /// Section snapshots with character offsets
    pub sections: Vec<SectionMeta>,

    /// Highlighted region, if any
    pub selection: Option<SelectionBounds>,

    /// Current surfaced value
    pub value: Option<D>,

    /// Current candidate value
    pub candidate: Option<D>,

    /// Current error classification
    pub error: Option<FieldError>,

    /// Pending change notifications, oldest first
    pub changes: Vec<FieldChange<D>>,
}

impl<D> Default for FieldContext<D> {
    fn default() -> Self {
        Self {
            text: String::new(),
            sections: Vec::new(),
            selection: None,
            value: None,
            candidate: None,
            error: None,
            changes: Vec::new(),
        }
    }
}

impl<D: Clone> FieldContext<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state as a change notification.
    pub fn push_change(&mut self) {
        self.changes.push(FieldChange {
            value: self.value.clone(),
            candidate: self.candidate.clone(),
            error: self.error,
            text: self.text.clone(),
            sections: self.sections.clone(),
        });
    }

    /// Drain pending change notifications.
    pub fn take_changes(&mut self) -> Vec<FieldChange<D>> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn last_change(&self) -> Option<&FieldChange<D>> {
        self.changes.last()
    }

    /// Whether the host should show the field as invalid.
    ///
    /// Incomplete input is not an error while the user is still typing.
    pub fn is_invalid(&self) -> bool {
        self.error.is_some_and(|e| e != FieldError::Incomplete)
    }
}
