//! Whole-value error classification and constraint checks.

use std::cmp::Ordering;
use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::adapter::DateAdapter;
use crate::section::SectionType;
use crate::Config;

/// Why a field's value is not surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldError {
    /// Some editable section has no value
    Incomplete,
    /// Sections combine into a date that does not exist (April 31st)
    InvalidSectionCombination,
    BelowMin,
    AboveMax,
    /// Rejected by a `disable_date` / `disable_time` predicate
    DisabledByPredicate,
    DisablePast,
    DisableFuture,
    /// The format has no editable section
    MalformedFormat,
}

impl FieldError {
    /// Errors raised by configured constraints rather than by the sections.
    pub fn is_constraint(self) -> bool {
        matches!(
            self,
            FieldError::BelowMin
                | FieldError::AboveMax
                | FieldError::DisabledByPredicate
                | FieldError::DisablePast
                | FieldError::DisableFuture
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldError::Incomplete => "incomplete",
            FieldError::InvalidSectionCombination => "invalid-section-combination",
            FieldError::BelowMin => "below-min",
            FieldError::AboveMax => "above-max",
            FieldError::DisabledByPredicate => "disabled-by-predicate",
            FieldError::DisablePast => "disable-past",
            FieldError::DisableFuture => "disable-future",
            FieldError::MalformedFormat => "malformed-format",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-supplied predicate; `true` disables the value.
pub type DatePredicate<D> = Box<dyn Fn(&D) -> bool>;

/// Constraint set applied to complete values.
///
/// Checks run in a fixed order: adapter validity, min/max date and time,
/// disable predicates, then past/future relative to `adapter.now()`. The
/// first failing check classifies the value.
pub struct Validator<D> {
    pub min_date: Option<D>,
    pub max_date: Option<D>,
    pub min_time: Option<D>,
    pub max_time: Option<D>,
    pub disable_past: bool,
    pub disable_future: bool,
    pub disable_date: Option<DatePredicate<D>>,
    pub disable_time: Option<DatePredicate<D>>,
}

impl<D> Default for Validator<D> {
    fn default() -> Self {
        Self {
            min_date: None,
            max_date: None,
            min_time: None,
            max_time: None,
            disable_past: false,
            disable_future: false,
            disable_date: None,
            disable_time: None,
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Validator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .field("min_time", &self.min_time)
            .field("max_time", &self.max_time)
            .field("disable_past", &self.disable_past)
            .field("disable_future", &self.disable_future)
            .field("disable_date", &self.disable_date.is_some())
            .field("disable_time", &self.disable_time.is_some())
            .finish()
    }
}

fn resolve<A: DateAdapter>(adapter: &A, name: &str, text: Option<&String>) -> anyhow::Result<Option<A::Date>> {
    text.map(|text| {
        adapter
            .parse_iso(text)
            .with_context(|| format!("invalid {name} {text:?}"))
    })
    .transpose()
}

impl<D> Validator<D> {
    /// Build a validator from the string constraints in `config`.
    pub fn from_config<A>(config: &Config, adapter: &A) -> anyhow::Result<Self>
    where
        A: DateAdapter<Date = D>,
    {
        Ok(Self {
            min_date: resolve(adapter, "min_date", config.min_date.as_ref())?,
            max_date: resolve(adapter, "max_date", config.max_date.as_ref())?,
            min_time: resolve(adapter, "min_time", config.min_time.as_ref())?,
            max_time: resolve(adapter, "max_time", config.max_time.as_ref())?,
            disable_past: config.disable_past,
            disable_future: config.disable_future,
            disable_date: None,
            disable_time: None,
        })
    }

    /// Classify a complete value. `has_time` selects time-aware comparisons
    /// against "now" and enables the `disable_time` predicate.
    pub fn validate<A>(&self, adapter: &A, value: &D, has_time: bool) -> Option<FieldError>
    where
        A: DateAdapter<Date = D>,
    {
        if !adapter.is_valid(value) {
            return Some(FieldError::InvalidSectionCombination);
        }

        let day = |d: &D| {
            (
                adapter.get(d, SectionType::Year),
                adapter.get(d, SectionType::Month),
                adapter.get(d, SectionType::Day),
            )
        };
        let time_of_day = |d: &D| {
            (
                adapter.get(d, SectionType::Hours),
                adapter.get(d, SectionType::Minutes),
                adapter.get(d, SectionType::Seconds),
            )
        };

        if let Some(min) = &self.min_date {
            if day(value) < day(min) {
                return Some(FieldError::BelowMin);
            }
        }
        if let Some(max) = &self.max_date {
            if day(value) > day(max) {
                return Some(FieldError::AboveMax);
            }
        }
        if let Some(min) = &self.min_time {
            if time_of_day(value) < time_of_day(min) {
                return Some(FieldError::BelowMin);
            }
        }
        if let Some(max) = &self.max_time {
            if time_of_day(value) > time_of_day(max) {
                return Some(FieldError::AboveMax);
            }
        }

        if self.disable_date.as_ref().is_some_and(|disabled| disabled(value)) {
            return Some(FieldError::DisabledByPredicate);
        }
        if has_time && self.disable_time.as_ref().is_some_and(|disabled| disabled(value)) {
            return Some(FieldError::DisabledByPredicate);
        }

        if self.disable_past || self.disable_future {
            let now = adapter.now();
            let ordering = if has_time {
                adapter.compare(value, &now)
            } else {
                day(value).cmp(&day(&now))
            };
            if self.disable_past && ordering == Ordering::Less {
                return Some(FieldError::DisablePast);
            }
            if self.disable_future && ordering == Ordering::Greater {
                return Some(FieldError::DisableFuture);
            }
        }

        None
    }
}
