// SPDX-License-Identifier: GPL-3.0-only

use chrono::NaiveDateTime;

use crate::date::INPUT_DATETIME_FORMAT;

/// Formats an amount with vi-VN digit grouping (1.250.000), decimals are kept after a comma
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let integer = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = integer.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if cents > 0 {
        let decimals = format!("{cents:02}");
        grouped.push(',');
        grouped.push_str(decimals.trim_end_matches('0'));
    }

    if negative && (integer > 0 || cents > 0) {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// hh:mm - dd/mm/yyyy
pub fn format_date_time(date: &NaiveDateTime) -> String {
    date.format("%H:%M - %d/%m/%Y").to_string()
}

/// Value accepted by the date-time inputs
pub fn format_for_input(date: &NaiveDateTime) -> String {
    date.format(INPUT_DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(999.0), "999");
        assert_eq!(format_currency(1000.0), "1.000");
        assert_eq!(format_currency(1_250_000.0), "1.250.000");
        assert_eq!(format_currency(-45_000.0), "-45.000");
        assert_eq!(format_currency(1234.5), "1.234,5");
        assert_eq!(format_currency(1234.56), "1.234,56");
    }

    #[test]
    fn date_time_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 7)
            .and_then(|d| d.and_hms_opt(16, 41, 0))
            .unwrap();
        assert_eq!(format_date_time(&date), "16:41 - 07/04/2024");
        assert_eq!(format_for_input(&date), "2024-04-07T16:41");
    }
}
