//! `DateAdapter` over `chrono::NaiveDateTime`.
//!
//! Values are wall-clock date-times with no time zone. Weekdays are counted
//! from the locale's first day of the week.

use std::cmp::Ordering;

use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use sectionfield_core::utils::fold;
use sectionfield_core::{DateAdapter, FieldKind, SectionType, TokenInfo};

use crate::locale::{self, AdapterLocale};
use crate::tokens::{ordinal, TOKENS};

/// Gregorian calendar adapter backed by chrono.
#[derive(Debug, Clone)]
pub struct ChronoAdapter {
    locale: &'static AdapterLocale,
    /// Fixed clock for tests and replays; `None` reads the local clock
    now: Option<NaiveDateTime>,
}

impl Default for ChronoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChronoAdapter {
    /// Adapter for the en-US locale.
    pub fn new() -> Self {
        Self {
            locale: locale::en_us(),
            now: None,
        }
    }

    /// Adapter for a bundled locale code.
    pub fn with_locale(code: &str) -> anyhow::Result<Self> {
        let locale = locale::locale(code).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown locale {code:?} (available: {})",
                locale::locale_codes().join(", ")
            )
        })?;
        Ok(Self { locale, now: None })
    }

    /// Pin "now" to a fixed instant.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn locale(&self) -> &'static AdapterLocale {
        self.locale
    }

    fn base() -> NaiveDateTime {
        NaiveDateTime::default()
    }

    fn months(&self, token: &str) -> &'static [&'static str; 12] {
        let locale: &'static AdapterLocale = self.locale;
        if token == "MMM" {
            &locale.months_short
        } else {
            &locale.months
        }
    }

    fn meridiem_names(&self, token: &str) -> [String; 2] {
        let (am, pm) = (self.locale.am, self.locale.pm);
        if token == "aaa" {
            [am.to_lowercase(), pm.to_lowercase()]
        } else {
            [am.to_string(), pm.to_string()]
        }
    }

    fn weekday_index(&self, value: &NaiveDateTime) -> i64 {
        let from_sunday = value.weekday().num_days_from_sunday() as i64;
        (from_sunday - self.locale.week_starts_on as i64).rem_euclid(7)
    }

    fn add_months(value: &NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
        if n >= 0 {
            value.checked_add_months(months)
        } else {
            value.checked_sub_months(months)
        }
    }
}

impl DateAdapter for ChronoAdapter {
    type Date = NaiveDateTime;

    fn token_info(&self, token: &str) -> Option<TokenInfo> {
        TOKENS.get(token).copied()
    }

    fn format_tokens(&self) -> Vec<&'static str> {
        TOKENS.keys().copied().collect()
    }

    fn parse(&self, text: &str, token: &str) -> Option<NaiveDateTime> {
        let info = self.token_info(token)?;
        let base = Self::base();
        let options = self.letter_options(info.section_type, token);
        if !options.is_empty() {
            let wanted = fold(text);
            let index = options.iter().position(|o| fold(o) == wanted)? as i64;
            return match info.section_type {
                SectionType::Month => self.set(&base, SectionType::Month, index + 1),
                SectionType::Weekday => self.set(&base, SectionType::Weekday, index),
                SectionType::Meridiem => self.set(&base, SectionType::Meridiem, index),
                _ => None,
            };
        }

        let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
        let n: i64 = digits.parse().ok()?;
        if n < info.min || n > info.max {
            return None;
        }
        let n = match token {
            "h" | "hh" => n % 12,
            "yy" => 2000 + n,
            _ => n,
        };
        self.set(&base, info.section_type, n)
    }

    fn parse_iso(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .or_else(|| {
                ["%H:%M:%S", "%H:%M"]
                    .iter()
                    .find_map(|f| NaiveTime::parse_from_str(text, f).ok())
                    .map(|t| Self::base().date().and_time(t))
            })
    }

    fn format(&self, value: &NaiveDateTime, token: &str) -> String {
        let (pm, hour12) = value.hour12();
        match token {
            "yyyy" => format!("{:04}", value.year()),
            "yy" => format!("{:02}", value.year().rem_euclid(100)),
            "M" => value.month().to_string(),
            "MM" => format!("{:02}", value.month()),
            "MMM" | "MMMM" => self.months(token)[value.month0() as usize].to_string(),
            "d" => value.day().to_string(),
            "dd" => format!("{:02}", value.day()),
            "do" => ordinal(value.day() as i64),
            "EEE" | "EEEE" => {
                let week = self.locale.week(token == "EEE");
                week[self.weekday_index(value) as usize].to_string()
            }
            "H" => value.hour().to_string(),
            "HH" => format!("{:02}", value.hour()),
            "h" => hour12.to_string(),
            "hh" => format!("{:02}", hour12),
            "m" => value.minute().to_string(),
            "mm" => format!("{:02}", value.minute()),
            "s" => value.second().to_string(),
            "ss" => format!("{:02}", value.second()),
            "a" | "aa" | "aaa" => self.meridiem_names(token)[pm as usize].clone(),
            _ => String::new(),
        }
    }

    fn format_numeric(&self, token: &str, value: i64) -> Option<String> {
        let info = self.token_info(token)?;
        if value < info.min || value > info.max {
            return None;
        }
        let options = self.letter_options(info.section_type, token);
        if !options.is_empty() {
            return options.get(usize::try_from(value - 1).ok()?).cloned();
        }
        Some(match token {
            "do" => ordinal(value),
            _ if info.has_leading_zeros => format!("{:0width$}", value, width = info.digit_count),
            _ => value.to_string(),
        })
    }

    fn letter_options(&self, section_type: SectionType, token: &str) -> Vec<String> {
        let Some(info) = self.token_info(token) else {
            return Vec::new();
        };
        if info.section_type != section_type || info.content_type.has_digits() {
            return Vec::new();
        }
        match section_type {
            SectionType::Month => self.months(token).iter().map(|m| m.to_string()).collect(),
            SectionType::Weekday => self
                .locale
                .week(token == "EEE")
                .into_iter()
                .map(str::to_string)
                .collect(),
            SectionType::Meridiem => self.meridiem_names(token).to_vec(),
            _ => Vec::new(),
        }
    }

    fn add(&self, value: &NaiveDateTime, amount: i64, unit: SectionType) -> NaiveDateTime {
        let stepped = match unit {
            SectionType::Year => amount.checked_mul(12).and_then(|m| Self::add_months(value, m)),
            SectionType::Month => Self::add_months(value, amount),
            SectionType::Day | SectionType::Weekday => {
                TimeDelta::try_days(amount).and_then(|d| value.checked_add_signed(d))
            }
            SectionType::Hours => TimeDelta::try_hours(amount).and_then(|d| value.checked_add_signed(d)),
            SectionType::Minutes => {
                TimeDelta::try_minutes(amount).and_then(|d| value.checked_add_signed(d))
            }
            SectionType::Seconds => {
                TimeDelta::try_seconds(amount).and_then(|d| value.checked_add_signed(d))
            }
            SectionType::Meridiem => amount
                .checked_mul(12)
                .and_then(TimeDelta::try_hours)
                .and_then(|d| value.checked_add_signed(d)),
            SectionType::Literal => None,
        };
        stepped.unwrap_or(*value)
    }

    fn get(&self, value: &NaiveDateTime, unit: SectionType) -> i64 {
        match unit {
            SectionType::Year => value.year() as i64,
            SectionType::Month => value.month() as i64,
            SectionType::Day => value.day() as i64,
            SectionType::Weekday => self.weekday_index(value),
            SectionType::Hours => value.hour() as i64,
            SectionType::Minutes => value.minute() as i64,
            SectionType::Seconds => value.second() as i64,
            SectionType::Meridiem => value.hour12().0 as i64,
            SectionType::Literal => 0,
        }
    }

    fn set(&self, value: &NaiveDateTime, unit: SectionType, amount: i64) -> Option<NaiveDateTime> {
        let n = u32::try_from(amount).ok();
        match unit {
            SectionType::Year => value.with_year(i32::try_from(amount).ok()?),
            SectionType::Month => value.with_month(n?),
            SectionType::Day => value.with_day(n?),
            SectionType::Weekday => {
                if !(0..7).contains(&amount) {
                    return None;
                }
                let shift = amount - self.weekday_index(value);
                value.checked_add_signed(TimeDelta::try_days(shift)?)
            }
            SectionType::Hours => value.with_hour(n?),
            SectionType::Minutes => value.with_minute(n?),
            SectionType::Seconds => value.with_second(n?),
            SectionType::Meridiem => match n? {
                0 | 1 => value.with_hour(value.hour() % 12 + 12 * n?),
                _ => None,
            },
            SectionType::Literal => Some(*value),
        }
    }

    fn max_day_in_month(&self, month: i64, year: Option<i64>) -> i64 {
        match month {
            2 => {
                let leap = match year.and_then(|y| i32::try_from(y).ok()) {
                    Some(y) => NaiveDate::from_ymd_opt(y, 2, 29).is_some(),
                    None => true,
                };
                if leap {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    fn is_valid(&self, value: &NaiveDateTime) -> bool {
        (0..=9999).contains(&value.year())
    }

    fn compare(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> Ordering {
        a.cmp(b)
    }

    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }

    fn is_12_hour_cycle(&self) -> bool {
        self.locale.hour12
    }

    fn default_format(&self, kind: FieldKind, ampm: bool) -> String {
        let time = if ampm {
            self.locale.time_format_12
        } else {
            self.locale.time_format_24
        };
        match kind {
            FieldKind::Date => self.locale.date_format.to_string(),
            FieldKind::Time => time.to_string(),
            FieldKind::DateTime => format!("{} {}", self.locale.date_format, time),
        }
    }
}
