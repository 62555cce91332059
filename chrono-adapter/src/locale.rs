//! Calendar names and default formats per locale.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Locale data the chrono adapter renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterLocale {
    pub code: &'static str,
    pub months: [&'static str; 12],
    pub months_short: [&'static str; 12],
    /// Weekday names starting on Sunday
    pub weekdays: [&'static str; 7],
    pub weekdays_short: [&'static str; 7],
    pub am: &'static str,
    pub pm: &'static str,
    /// First day of the week, days from Sunday
    pub week_starts_on: u32,
    /// Whether times default to a 12-hour clock
    pub hour12: bool,
    pub date_format: &'static str,
    pub time_format_12: &'static str,
    pub time_format_24: &'static str,
}

impl AdapterLocale {
    /// Weekday names in locale week order.
    pub fn week(&self, short: bool) -> Vec<&'static str> {
        let names = if short { &self.weekdays_short } else { &self.weekdays };
        (0..7)
            .map(|i| names[(i + self.week_starts_on as usize) % 7])
            .collect()
    }
}

pub static EN_US: AdapterLocale = AdapterLocale {
    code: "en-US",
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    am: "AM",
    pm: "PM",
    week_starts_on: 0,
    hour12: true,
    date_format: "MM/dd/yyyy",
    time_format_12: "hh:mm aa",
    time_format_24: "HH:mm",
};

pub static DE: AdapterLocale = AdapterLocale {
    code: "de",
    months: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
        "September", "Oktober", "November", "Dezember",
    ],
    months_short: [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ],
    weekdays: [
        "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
    ],
    weekdays_short: ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
    am: "AM",
    pm: "PM",
    week_starts_on: 1,
    hour12: false,
    date_format: "dd.MM.yyyy",
    time_format_12: "hh:mm aa",
    time_format_24: "HH:mm",
};

static LOCALES: Lazy<HashMap<&'static str, &'static AdapterLocale>> = Lazy::new(|| {
    [&EN_US, &DE].into_iter().map(|l| (l.code, l)).collect()
});

/// Look up a locale by code ("en-US", "de").
pub fn locale(code: &str) -> Option<&'static AdapterLocale> {
    LOCALES.get(code).copied()
}

/// Codes of every bundled locale, sorted.
pub fn locale_codes() -> Vec<&'static str> {
    let mut codes: Vec<_> = LOCALES.keys().copied().collect();
    codes.sort();
    codes
}

/// The default locale.
pub fn en_us() -> &'static AdapterLocale {
    &EN_US
}
