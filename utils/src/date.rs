// SPDX-License-Identifier: GPL-3.0-only

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Format used by the date filters
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used by the date-time inputs of the booking forms
pub const INPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Checks that the given string is a valid yyyy-mm-dd date
pub fn check_date_format(date: &str) -> bool {
    parse_date(date).is_some()
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Parses the value of a date-time input (yyyy-mm-ddThh:mm), seconds are accepted but optional
pub fn parse_input_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, INPUT_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_format_checks() {
        assert!(check_date_format("2024-01-31"));
        assert!(check_date_format(" 2024-01-31 "));
        assert!(!check_date_format("2024-02-30"));
        assert!(!check_date_format("31/01/2024"));
        assert!(!check_date_format("2024-01"));
        assert!(!check_date_format(""));
    }

    #[test]
    fn input_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .unwrap();
        assert_eq!(parse_input_datetime("2024-03-05T14:30"), Some(expected));
        assert_eq!(parse_input_datetime("2024-03-05T14:30:00"), Some(expected));
        assert_eq!(parse_input_datetime("2024-03-05"), None);
    }
}
