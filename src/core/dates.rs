//! Civil-date plumbing: flexible input parsing, inclusive ranges and the
//! company pay period.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::AppError;

/// Parses a date in either ISO (`yyyy-mm-dd`) or `dd/mm/yyyy` form.
///
/// Impossible dates (31/02/…) and years outside 1900..=2100 are rejected.
pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains('/') {
        NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()?
    } else {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?
    };
    if !(1900..=2100).contains(&parsed.year()) {
        return None;
    }
    Some(parsed)
}

/// Validated inclusive [from, to] range used by every report and worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub fn parse_range(from: &str, to: &str) -> Result<DateRange, AppError> {
    let from = parse_input_date(from).ok_or_else(|| {
        AppError::Validation(format!("invalid from date '{from}', use dd/mm/yyyy or yyyy-mm-dd"))
    })?;
    let to = parse_input_date(to).ok_or_else(|| {
        AppError::Validation(format!("invalid to date '{to}', use dd/mm/yyyy or yyyy-mm-dd"))
    })?;
    if from > to {
        return Err(AppError::Validation(
            "from date cannot be after to date".into(),
        ));
    }
    Ok(DateRange { from, to })
}

/// Every calendar day in [from, to], ascending.
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(from), move |d| {
        d.checked_add_days(Days::new(1)).filter(|next| *next <= to)
    })
}

/// dd/mm/yyyy display format used throughout the reports.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// The company pay period is a fixed non-calendar month running from the 18th
/// to the 17th. On or after the 18th the current period started this month;
/// before the 18th it started on the 18th of the previous month.
pub fn company_pay_period(today: NaiveDate) -> DateRange {
    let (year, month) = (today.year(), today.month());
    let (from, to) = if today.day() >= 18 {
        (ymd(year, month, 18), next_month(year, month, 17))
    } else {
        (prev_month(year, month, 18), ymd(year, month, 17))
    };
    DateRange { from, to }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // day is always 17 or 18, valid in every month
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn next_month(year: i32, month: u32, day: u32) -> NaiveDate {
    if month == 12 {
        ymd(year + 1, 1, day)
    } else {
        ymd(year, month + 1, day)
    }
}

fn prev_month(year: i32, month: u32, day: u32) -> NaiveDate {
    if month == 1 {
        ymd(year - 1, 12, day)
    } else {
        ymd(year, month - 1, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_both_input_formats() {
        assert_eq!(parse_input_date("2026-03-05"), Some(date(2026, 3, 5)));
        assert_eq!(parse_input_date("05/03/2026"), Some(date(2026, 3, 5)));
        assert_eq!(parse_input_date(" 05/03/2026 "), Some(date(2026, 3, 5)));
    }

    #[test]
    fn rejects_impossible_and_out_of_bound_dates() {
        assert_eq!(parse_input_date("31/02/2024"), None);
        assert_eq!(parse_input_date("2024-02-31"), None);
        assert_eq!(parse_input_date("01/01/1899"), None);
        assert_eq!(parse_input_date("2101-01-01"), None);
        assert_eq!(parse_input_date("not a date"), None);
        assert_eq!(parse_input_date(""), None);
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(parse_range("2026-01-10", "2026-01-01").is_err());
        assert!(parse_range("garbage", "2026-01-01").is_err());
        let range = parse_range("01/01/2026", "2026-01-10").unwrap();
        assert_eq!(range.from, date(2026, 1, 1));
        assert_eq!(range.to, date(2026, 1, 10));
    }

    #[test]
    fn inclusive_day_iteration() {
        let days: Vec<_> = days_inclusive(date(2026, 2, 27), date(2026, 3, 2)).collect();
        assert_eq!(
            days,
            vec![
                date(2026, 2, 27),
                date(2026, 2, 28),
                date(2026, 3, 1),
                date(2026, 3, 2)
            ]
        );
        let single: Vec<_> = days_inclusive(date(2026, 1, 5), date(2026, 1, 5)).collect();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn pay_period_on_or_after_the_18th() {
        let period = company_pay_period(date(2026, 8, 18));
        assert_eq!(period.from, date(2026, 8, 18));
        assert_eq!(period.to, date(2026, 9, 17));
    }

    #[test]
    fn pay_period_before_the_18th() {
        let period = company_pay_period(date(2026, 8, 17));
        assert_eq!(period.from, date(2026, 7, 18));
        assert_eq!(period.to, date(2026, 8, 17));
    }

    #[test]
    fn pay_period_wraps_year_boundaries() {
        let december = company_pay_period(date(2026, 12, 20));
        assert_eq!(december.from, date(2026, 12, 18));
        assert_eq!(december.to, date(2027, 1, 17));

        let january = company_pay_period(date(2026, 1, 5));
        assert_eq!(january.from, date(2025, 12, 18));
        assert_eq!(january.to, date(2026, 1, 17));
    }

    #[test]
    fn formats_dmy() {
        assert_eq!(format_dmy(date(2026, 3, 5)), "05/03/2026");
    }
}
