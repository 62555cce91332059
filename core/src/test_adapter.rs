//! Minimal Gregorian adapter over `chrono::NaiveDateTime` for unit tests.

use std::cmp::Ordering;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};

use crate::adapter::{DateAdapter, FieldKind};
use crate::section::{ContentType, SectionType, TokenInfo};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone)]
pub struct FixtureAdapter {
    now: NaiveDateTime,
}

impl FixtureAdapter {
    pub fn new() -> Self {
        Self {
            now: date(2022, 6, 15, 14, 12, 25),
        }
    }
}

pub fn date(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|d| d.and_hms_opt(h, mi, s))
        .expect("fixture date")
}

fn digit(section_type: SectionType, digit_count: usize, min: i64, max: i64) -> TokenInfo {
    TokenInfo {
        section_type,
        content_type: ContentType::Digit,
        digit_count,
        has_leading_zeros: true,
        min,
        max,
    }
}

fn letter(section_type: SectionType, max: i64) -> TokenInfo {
    TokenInfo {
        section_type,
        content_type: ContentType::Letter,
        digit_count: 0,
        has_leading_zeros: false,
        min: 1,
        max,
    }
}

impl DateAdapter for FixtureAdapter {
    type Date = NaiveDateTime;

    fn token_info(&self, token: &str) -> Option<TokenInfo> {
        Some(match token {
            "yyyy" => digit(SectionType::Year, 4, 0, 9999),
            "MM" => digit(SectionType::Month, 2, 1, 12),
            "MMMM" => letter(SectionType::Month, 12),
            "dd" => digit(SectionType::Day, 2, 1, 31),
            "HH" => digit(SectionType::Hours, 2, 0, 23),
            "hh" => digit(SectionType::Hours, 2, 1, 12),
            "mm" => digit(SectionType::Minutes, 2, 0, 59),
            "ss" => digit(SectionType::Seconds, 2, 0, 59),
            "aa" => letter(SectionType::Meridiem, 2),
            _ => return None,
        })
    }

    fn format_tokens(&self) -> Vec<&'static str> {
        vec!["yyyy", "MM", "MMMM", "dd", "HH", "hh", "mm", "ss", "aa"]
    }

    fn parse(&self, text: &str, token: &str) -> Option<NaiveDateTime> {
        let base = date(2000, 1, 1, 0, 0, 0);
        match token {
            "MMMM" => {
                let m = MONTHS.iter().position(|name| *name == text)? as u32 + 1;
                base.with_month(m)
            }
            "aa" => match text {
                "AM" => Some(base),
                "PM" => base.with_hour(12),
                _ => None,
            },
            _ => {
                let info = self.token_info(token)?;
                let n: i64 = text.parse().ok()?;
                if n < info.min || n > info.max {
                    return None;
                }
                let n = if token == "hh" { n % 12 } else { n };
                self.set(&base, info.section_type, n)
            }
        }
    }

    fn parse_iso(&self, text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    fn format(&self, value: &NaiveDateTime, token: &str) -> String {
        match token {
            "yyyy" => format!("{:04}", value.year()),
            "MM" => format!("{:02}", value.month()),
            "MMMM" => MONTHS[value.month0() as usize].to_string(),
            "dd" => format!("{:02}", value.day()),
            "HH" => format!("{:02}", value.hour()),
            "hh" => format!("{:02}", value.hour12().1),
            "mm" => format!("{:02}", value.minute()),
            "ss" => format!("{:02}", value.second()),
            "aa" => if value.hour12().0 { "PM" } else { "AM" }.to_string(),
            _ => String::new(),
        }
    }

    fn format_numeric(&self, token: &str, value: i64) -> Option<String> {
        match token {
            "MMMM" => MONTHS.get(usize::try_from(value - 1).ok()?).map(|s| s.to_string()),
            _ => {
                let info = self.token_info(token)?;
                Some(format!("{:0width$}", value, width = info.digit_count))
            }
        }
    }

    fn letter_options(&self, section_type: SectionType, _token: &str) -> Vec<String> {
        match section_type {
            SectionType::Month => MONTHS.iter().map(|s| s.to_string()).collect(),
            SectionType::Meridiem => vec!["AM".to_string(), "PM".to_string()],
            _ => Vec::new(),
        }
    }

    fn add(&self, value: &NaiveDateTime, amount: i64, unit: SectionType) -> NaiveDateTime {
        let months = |n: i64| {
            if n >= 0 {
                value.checked_add_months(Months::new(n as u32))
            } else {
                value.checked_sub_months(Months::new(n.unsigned_abs() as u32))
            }
        };
        let stepped = match unit {
            SectionType::Year => months(amount * 12),
            SectionType::Month => months(amount),
            SectionType::Day | SectionType::Weekday => value.checked_add_signed(Duration::days(amount)),
            SectionType::Hours => value.checked_add_signed(Duration::hours(amount)),
            SectionType::Minutes => value.checked_add_signed(Duration::minutes(amount)),
            SectionType::Seconds => value.checked_add_signed(Duration::seconds(amount)),
            SectionType::Meridiem => value.checked_add_signed(Duration::hours(12 * amount)),
            SectionType::Literal => Some(*value),
        };
        stepped.unwrap_or(*value)
    }

    fn get(&self, value: &NaiveDateTime, unit: SectionType) -> i64 {
        match unit {
            SectionType::Year => value.year() as i64,
            SectionType::Month => value.month() as i64,
            SectionType::Day => value.day() as i64,
            SectionType::Weekday => value.weekday().num_days_from_sunday() as i64,
            SectionType::Hours => value.hour() as i64,
            SectionType::Minutes => value.minute() as i64,
            SectionType::Seconds => value.second() as i64,
            SectionType::Meridiem => (value.hour() >= 12) as i64,
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
                let current = self.get(value, SectionType::Weekday);
                Some(self.add(value, amount - current, SectionType::Day))
            }
            SectionType::Hours => value.with_hour(n?),
            SectionType::Minutes => value.with_minute(n?),
            SectionType::Seconds => value.with_second(n?),
            SectionType::Meridiem => value.with_hour(value.hour() % 12 + 12 * n?),
            SectionType::Literal => Some(*value),
        }
    }

    fn max_day_in_month(&self, month: i64, year: Option<i64>) -> i64 {
        match month {
            2 => match year {
                Some(y) if !(y % 4 == 0 && (y % 100 != 0 || y % 400 == 0)) => 28,
                _ => 29,
            },
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    fn is_valid(&self, _value: &NaiveDateTime) -> bool {
        true
    }

    fn compare(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> Ordering {
        a.cmp(b)
    }

    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn is_12_hour_cycle(&self) -> bool {
        true
    }

    fn default_format(&self, kind: FieldKind, ampm: bool) -> String {
        let time = if ampm { "hh:mm aa" } else { "HH:mm" };
        match kind {
            FieldKind::Date => "MM/dd/yyyy".to_string(),
            FieldKind::Time => time.to_string(),
            FieldKind::DateTime => format!("MM/dd/yyyy {time}"),
        }
    }
}
