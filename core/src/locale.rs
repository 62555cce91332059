//! Placeholder text for empty sections.
//!
//! `LocaleText` is loaded once when a field is built and never mutated after
//! that; a locale switch replaces the whole object (see
//! `FieldEngine::set_locale`), which also invalidates cached format templates.

use serde::{Deserialize, Serialize};

use crate::section::{ContentType, SectionType};

/// Section placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleText {
    /// Character repeated once per year digit ("YYYY", "YY")
    pub year: String,
    pub month_digit: String,
    pub month_letter: String,
    pub day: String,
    pub weekday_digit: String,
    pub weekday_letter: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub meridiem: String,
}

impl Default for LocaleText {
    fn default() -> Self {
        Self {
            year: "Y".to_string(),
            month_digit: "MM".to_string(),
            month_letter: "MMMM".to_string(),
            day: "DD".to_string(),
            weekday_digit: "EE".to_string(),
            weekday_letter: "EEEE".to_string(),
            hours: "hh".to_string(),
            minutes: "mm".to_string(),
            seconds: "ss".to_string(),
            meridiem: "aa".to_string(),
        }
    }
}

impl LocaleText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load locale text from TOML. Missing keys keep their English defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load locale text from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Placeholder for a section of the given type.
    pub fn placeholder(
        &self,
        section_type: SectionType,
        content_type: ContentType,
        digit_count: usize,
    ) -> String {
        let letter = content_type == ContentType::Letter;
        match section_type {
            SectionType::Year => self.year.repeat(digit_count.max(1)),
            SectionType::Month if letter => self.month_letter.clone(),
            SectionType::Month => self.month_digit.clone(),
            SectionType::Day => self.day.clone(),
            SectionType::Weekday if letter => self.weekday_letter.clone(),
            SectionType::Weekday => self.weekday_digit.clone(),
            SectionType::Hours => self.hours.clone(),
            SectionType::Minutes => self.minutes.clone(),
            SectionType::Seconds => self.seconds.clone(),
            SectionType::Meridiem => self.meridiem.clone(),
            SectionType::Literal => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_placeholders() {
        let text = LocaleText::default();
        assert_eq!(text.placeholder(SectionType::Year, ContentType::Digit, 4), "YYYY");
        assert_eq!(text.placeholder(SectionType::Year, ContentType::Digit, 2), "YY");
        assert_eq!(text.placeholder(SectionType::Month, ContentType::Letter, 0), "MMMM");
        assert_eq!(text.placeholder(SectionType::Month, ContentType::Digit, 2), "MM");
        assert_eq!(text.placeholder(SectionType::Meridiem, ContentType::Letter, 0), "aa");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = LocaleText::from_toml_str("year = \"A\"\nday = \"JJ\"\n").unwrap();
        assert_eq!(text.placeholder(SectionType::Year, ContentType::Digit, 4), "AAAA");
        assert_eq!(text.placeholder(SectionType::Day, ContentType::Digit, 2), "JJ");
        assert_eq!(text.hours, "hh");
    }
}
