//! sectionfield-core
//!
//! Calendar-agnostic engine for sectioned date/time input fields, shared by
//! adapter crates (sectionfield-chrono).
//!
//! A format string such as `"MM/dd/yyyy hh:mm aa"` is split into sections;
//! keystrokes edit one section at a time and the sections are recombined
//! into a date value through a `DateAdapter`.
//!
//! Public API:
//! - `FieldEngine` - Key processing, selection and value synchronization
//! - `DateAdapter` - Calendar capability implemented by date libraries
//! - `FieldContext` - Rendered state and change notifications for hosts
//! - `FormatParser` - Format string → sections, with a template cache
//! - `Validator` - Min/max and predicate constraints
//! - `Config` - Field configuration
use serde::{Deserialize, Serialize};

pub mod section;
pub use section::{ContentType, Section, SectionMeta, SectionType, TokenInfo};

pub mod adapter;
pub use adapter::{DateAdapter, FieldKind};

pub mod locale;
pub use locale::LocaleText;

pub mod parser;
pub use parser::{split_format, FormatParser, ParsedFormat};

pub mod state;
pub use state::{FieldState, QueryBuffer, QueryKind, Selection};

pub mod navigator;
pub use navigator::SelectionBounds;

pub mod validation;
pub use validation::{DatePredicate, FieldError, Validator};

pub mod synthesizer;
pub use synthesizer::{fill_sections, synthesize, Synthesis};

pub mod editor;
pub use editor::{DigitEditor, EditContext, Editor, EditorResult, LetterEditor, Stepper};

pub mod context;
pub use context::{FieldChange, FieldContext};

pub mod field;
pub use field::{FieldEngine, KeyEvent, KeyResult};

#[cfg(test)]
mod test_adapter;

/// Field configuration.
///
/// Date strings (`min_date`, `reference_date`, ...) are parsed by the
/// adapter's `parse_iso` when the field is built; a string the adapter
/// cannot read makes `FieldEngine::new` fail.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Field kind, used to pick a default format
    pub kind: FieldKind,
    /// Explicit format; overrides the adapter default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Force the 12-hour (true) or 24-hour (false) default format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ampm: Option<bool>,

    /// Ignore editing keys; navigation still works
    pub read_only: bool,
    pub disable_future: bool,
    pub disable_past: bool,

    // Constraints, compared by calendar day (dates) or time of day (times)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<String>,

    /// Supplies units the format lacks until a valid value exists.
    /// Default: start of today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
    /// Initial value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Units moved by PageUp/PageDown. Default: 5
    pub page_step: i64,
    /// Maximum number of cached format templates. Default: 64
    pub format_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: FieldKind::DateTime,
            format: None,
            ampm: None,
            read_only: false,
            disable_future: false,
            disable_past: false,
            min_date: None,
            max_date: None,
            min_time: None,
            max_time: None,
            reference_date: None,
            default_value: None,
            page_step: 5,
            format_cache_size: 64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Builder-style format override.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set the PageUp/PageDown step. Non-positive values are ignored.
    pub fn set_page_step(&mut self, step: i64) {
        if step > 0 {
            self.page_step = step;
        }
    }
}

/// Utility helpers.
pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        s.nfc().collect::<String>().trim().to_string()
    }

    /// Normalized, lowercased form used for case-insensitive matching.
    pub fn fold(s: &str) -> String {
        normalize(s).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_roundtrip_keeps_defaults() {
        let config = Config::from_toml_str("format = \"HH:mm\"\nread_only = true\n").unwrap();
        assert_eq!(config.format.as_deref(), Some("HH:mm"));
        assert!(config.is_read_only());
        assert_eq!(config.page_step, 5);
        assert_eq!(config.kind, FieldKind::DateTime);

        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_kind_is_kebab_case() {
        let config = Config::from_toml_str("kind = \"date-time\"\nampm = false\n").unwrap();
        assert_eq!(config.kind, FieldKind::DateTime);
        assert_eq!(config.ampm, Some(false));
        assert!(Config::from_toml_str("kind = \"datetime\"").is_err());
    }

    #[test]
    fn test_page_step_must_be_positive() {
        let mut config = Config::default();
        config.set_page_step(0);
        assert_eq!(config.page_step, 5);
        config.set_page_step(15);
        assert_eq!(config.page_step, 15);
    }

    #[test]
    fn test_fold_is_case_and_normalization_insensitive() {
        // precomposed "ä" vs. "a" + combining diaeresis
        assert_eq!(utils::fold("Mär"), utils::fold("ma\u{308}r"));
        assert_eq!(utils::fold(" PM "), "pm");
    }
}
