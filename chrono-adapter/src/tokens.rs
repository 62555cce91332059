//! Format token table (date-fns style patterns).

use sectionfield_core::{ContentType, SectionType, TokenInfo};

const fn digits(section_type: SectionType, digit_count: usize, has_leading_zeros: bool, min: i64, max: i64) -> TokenInfo {
    TokenInfo {
        section_type,
        content_type: ContentType::Digit,
        digit_count,
        has_leading_zeros,
        min,
        max,
    }
}

const fn letters(section_type: SectionType, count: i64) -> TokenInfo {
    TokenInfo {
        section_type,
        content_type: ContentType::Letter,
        digit_count: 0,
        has_leading_zeros: false,
        min: 1,
        max: count,
    }
}

/// Every token the chrono adapter understands.
pub static TOKENS: phf::Map<&'static str, TokenInfo> = phf::phf_map! {
    "yyyy" => digits(SectionType::Year, 4, true, 0, 9999),
    "yy" => digits(SectionType::Year, 2, true, 0, 99),
    "M" => digits(SectionType::Month, 2, false, 1, 12),
    "MM" => digits(SectionType::Month, 2, true, 1, 12),
    "MMM" => letters(SectionType::Month, 12),
    "MMMM" => letters(SectionType::Month, 12),
    "d" => digits(SectionType::Day, 2, false, 1, 31),
    "dd" => digits(SectionType::Day, 2, true, 1, 31),
    "do" => TokenInfo {
        section_type: SectionType::Day,
        content_type: ContentType::DigitWithLetter,
        digit_count: 2,
        has_leading_zeros: false,
        min: 1,
        max: 31,
    },
    "EEE" => letters(SectionType::Weekday, 7),
    "EEEE" => letters(SectionType::Weekday, 7),
    "H" => digits(SectionType::Hours, 2, false, 0, 23),
    "HH" => digits(SectionType::Hours, 2, true, 0, 23),
    "h" => digits(SectionType::Hours, 2, false, 1, 12),
    "hh" => digits(SectionType::Hours, 2, true, 1, 12),
    "m" => digits(SectionType::Minutes, 2, false, 0, 59),
    "mm" => digits(SectionType::Minutes, 2, true, 0, 59),
    "s" => digits(SectionType::Seconds, 2, false, 0, 59),
    "ss" => digits(SectionType::Seconds, 2, true, 0, 59),
    "a" => letters(SectionType::Meridiem, 2),
    "aa" => letters(SectionType::Meridiem, 2),
    "aaa" => letters(SectionType::Meridiem, 2),
};

/// English ordinal for a day number ("1st", "22nd", "13th").
pub fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
