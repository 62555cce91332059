//! sectionfield-chrono crate root
//!
//! This crate provides the chrono-backed `ChronoAdapter` (date-fns style
//! format tokens, en-US and de calendar names) and re-exports the field
//! engine from `sectionfield-core`.
//!
//! Public API exported here:
//! - `ChronoAdapter` from `adapter`
//! - `AdapterLocale` and locale lookup from `locale`
//! - key script parsing and replay from `script`

pub mod adapter;
pub mod locale;
pub mod script;
pub mod tokens;

// Re-export field components from core
pub use sectionfield_core::{
    Config, DateAdapter, FieldChange, FieldContext, FieldEngine, FieldError, FieldKind, KeyEvent,
    KeyResult, LocaleText, SectionMeta, SectionType, SelectionBounds,
};

pub use adapter::ChronoAdapter;
pub use locale::AdapterLocale;
pub use script::{parse_script, replay, Step};

/// A field over chrono date-times.
pub type ChronoField = FieldEngine<ChronoAdapter>;

/// Build a field for `locale` with `config`.
pub fn field(locale: &str, config: Config) -> anyhow::Result<ChronoField> {
    FieldEngine::new(ChronoAdapter::with_locale(locale)?, config)
}
