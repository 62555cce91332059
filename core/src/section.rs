//! Section data model.
//!
//! A field's rendered text is split into an ordered list of sections. Each
//! section is either an editable date component (year, month, hours, ...) or
//! a literal separator run (`/`, `:`, spaces, escaped text). Sections carry
//! their own character offsets so navigation can map a pointer position back
//! to the owning section.

use serde::{Deserialize, Serialize};

/// Semantic type of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Year,
    Month,
    Day,
    Weekday,
    Hours,
    Minutes,
    Seconds,
    Meridiem,
    Literal,
}

impl SectionType {
    /// Units merged into a reference date, in the order they must be applied.
    pub const MERGE_ORDER: [SectionType; 6] = [
        SectionType::Year,
        SectionType::Month,
        SectionType::Day,
        SectionType::Hours,
        SectionType::Minutes,
        SectionType::Seconds,
    ];

    /// Whether this section describes a time-of-day component.
    pub fn is_time(self) -> bool {
        matches!(
            self,
            SectionType::Hours | SectionType::Minutes | SectionType::Seconds | SectionType::Meridiem
        )
    }

    /// Whether this section describes a calendar component.
    pub fn is_date(self) -> bool {
        matches!(
            self,
            SectionType::Year | SectionType::Month | SectionType::Day | SectionType::Weekday
        )
    }
}

/// Which kinds of keystrokes a section's content accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// Pure digits ("05", "2023")
    Digit,
    /// Digits rendered with letters ("1st", "22nd")
    DigitWithLetter,
    /// Names chosen from an enumerable set ("PM", "March")
    Letter,
}

impl ContentType {
    pub fn has_digits(self) -> bool {
        !matches!(self, ContentType::Letter)
    }
}

/// Metadata an adapter exposes for one of its format tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub section_type: SectionType,
    pub content_type: ContentType,
    /// Maximum number of digits the token renders (0 for letter tokens)
    pub digit_count: usize,
    /// Whether digit values are zero-padded to `digit_count`
    pub has_leading_zeros: bool,
    /// Smallest value the token can hold
    pub min: i64,
    /// Largest value the token can hold (day tokens are refined per month)
    pub max: i64,
}

/// One addressable unit of the formatted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub section_type: SectionType,
    /// Adapter token this section renders (literal text for literal sections)
    pub format_token: String,
    pub content_type: ContentType,
    /// Current value; empty when unset
    pub value: String,
    /// Parsed integer for digit-bearing sections
    pub numeric_value: Option<i64>,
    pub placeholder: String,
    pub editable: bool,
    pub digit_count: usize,
    pub has_leading_zeros: bool,
    pub min_value: i64,
    pub max_value: i64,
    /// Start character offset in the rendered string (inclusive)
    pub start: usize,
    /// End character offset in the rendered string (exclusive)
    pub end: usize,
}

impl Section {
    /// Create an editable section from adapter token metadata.
    pub fn from_token(token: &str, info: TokenInfo, placeholder: String) -> Self {
        Self {
            section_type: info.section_type,
            format_token: token.to_string(),
            content_type: info.content_type,
            value: String::new(),
            numeric_value: None,
            placeholder,
            editable: true,
            digit_count: info.digit_count,
            has_leading_zeros: info.has_leading_zeros,
            min_value: info.min,
            max_value: info.max,
            start: 0,
            end: 0,
        }
    }

    /// Create a literal (non-editable) section.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            section_type: SectionType::Literal,
            format_token: text.clone(),
            content_type: ContentType::Letter,
            value: text.clone(),
            numeric_value: None,
            placeholder: text,
            editable: false,
            digit_count: 0,
            has_leading_zeros: false,
            min_value: 0,
            max_value: 0,
            start: 0,
            end: 0,
        }
    }

    /// Whether an editable section currently holds no value.
    pub fn is_empty(&self) -> bool {
        self.editable && self.value.is_empty()
    }

    /// Text shown for this section: the value, or the placeholder when unset.
    pub fn display(&self) -> &str {
        if self.value.is_empty() {
            &self.placeholder
        } else {
            &self.value
        }
    }

    /// Rendered length in characters.
    pub fn display_len(&self) -> usize {
        self.display().chars().count()
    }

    /// Hours rendered on a 12-hour clock.
    pub fn is_12_hour(&self) -> bool {
        self.section_type == SectionType::Hours && self.max_value == 12
    }

    /// Set the value, deriving `numeric_value` from its digits.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.numeric_value = if self.content_type.has_digits() {
            let digits: String = self.value.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        } else {
            None
        };
    }

    /// Clear the value back to the placeholder.
    pub fn clear(&mut self) {
        if self.editable {
            self.value.clear();
            self.numeric_value = None;
        }
    }

    /// Snapshot used in host notifications.
    pub fn meta(&self) -> SectionMeta {
        SectionMeta {
            section_type: self.section_type,
            value: self.value.clone(),
            placeholder: self.placeholder.clone(),
            editable: self.editable,
            start: self.start,
            end: self.end,
        }
    }
}

/// Serializable view of a section for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMeta {
    pub section_type: SectionType,
    pub value: String,
    pub placeholder: String,
    pub editable: bool,
    pub start: usize,
    pub end: usize,
}
