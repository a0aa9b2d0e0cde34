//! Lenient date coercion for timeliness scoring.

use crate::dataset::CellValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Separators of year-month values such as `2023-05`, which date to the 1st.
const YEAR_MONTH_SEPARATORS: [char; 2] = ['-', '/'];

/// Coerce a cell to a calendar date.
///
/// Anything that is not a date, datetime or parseable date string yields
/// `None`. Numbers are never read as timestamps.
pub fn coerce_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Str(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parse a date from common textual layouts.
///
/// Year-month values date to the first of the month and bare four-digit
/// years to January 1st.
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
        .or_else(|| parse_partial_date(s))
}

fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    YEAR_MONTH_SEPARATORS.iter().find_map(|sep| {
        let fmt = format!("%Y{sep}%m{sep}%d");
        NaiveDate::parse_from_str(&format!("{s}{sep}01"), &fmt).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date_str("1987-03-14"), Some(ymd(1987, 3, 14)));
        assert_eq!(parse_date_str("  2021-11-02 "), Some(ymd(2021, 11, 2)));
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert_eq!(parse_date_str("2022-05-06T10:11:12"), Some(ymd(2022, 5, 6)));
        assert_eq!(parse_date_str("2022-05-06 10:11:12.250"), Some(ymd(2022, 5, 6)));
        assert_eq!(parse_date_str("2022-05-06T10:11:12+02:00"), Some(ymd(2022, 5, 6)));
    }

    #[test]
    fn test_parse_slash_and_named_month() {
        assert_eq!(parse_date_str("2019/12/31"), Some(ymd(2019, 12, 31)));
        assert_eq!(parse_date_str("31/12/2019"), Some(ymd(2019, 12, 31)));
        assert_eq!(parse_date_str("12/31/2019"), Some(ymd(2019, 12, 31)));
        assert_eq!(parse_date_str("05-Mar-2020"), Some(ymd(2020, 3, 5)));
        assert_eq!(parse_date_str("Mar 05, 2020"), Some(ymd(2020, 3, 5)));
    }

    #[test]
    fn test_parse_minute_precision_datetimes() {
        assert_eq!(parse_date_str("2023-05-06 10:11"), Some(ymd(2023, 5, 6)));
        assert_eq!(parse_date_str("2023-05-06T10:11"), Some(ymd(2023, 5, 6)));
    }

    #[test]
    fn test_parse_partial_dates() {
        assert_eq!(parse_date_str("2023-05"), Some(ymd(2023, 5, 1)));
        assert_eq!(parse_date_str("2023/11"), Some(ymd(2023, 11, 1)));
        assert_eq!(parse_date_str("2023"), Some(ymd(2023, 1, 1)));
        assert_eq!(parse_date_str("2023-13"), None);
        assert_eq!(parse_date_str("12/2019"), None);
        assert_eq!(parse_date_str("202"), None);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("not a date"), None);
        assert_eq!(parse_date_str("2021-13-45"), None);
    }

    #[test]
    fn test_coerce_cell_values() {
        let date = ymd(2024, 2, 29);
        assert_eq!(coerce_date(&CellValue::Date(date)), Some(date));
        assert_eq!(
            coerce_date(&CellValue::DateTime(date.and_hms_opt(8, 0, 0).unwrap())),
            Some(date)
        );
        assert_eq!(coerce_date(&CellValue::Str("2024-02-29".into())), Some(date));
        assert_eq!(coerce_date(&CellValue::Int(20240229)), None);
        assert_eq!(coerce_date(&CellValue::Null), None);
    }
}
