use crate::error::{EstateLedgerError, Result};
use chrono::NaiveDate;

pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn first_day_of_next_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year.saturating_add(1) } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
}

/// Linear month counter, so that `(year, month)` pairs compare and subtract
/// without carrying across year boundaries by hand.
pub fn month_ordinal(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(EstateLedgerError::InvalidPeriod(format!(
            "month {} must be between 1 and 12",
            month
        )));
    }
    Ok(())
}

/// Parses a calendar date in `YYYY-MM-DD` form.
/// A trailing time part (`2024-01-10T00:00:00.000Z`) is ignored, since only the
/// date is meaningful for bookkeeping.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
        EstateLedgerError::DateError(format!(
            "Invalid date '{}'. Expected YYYY-MM-DD",
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_day_of_next_month() {
        assert_eq!(
            first_day_of_next_month(2023, 1),
            NaiveDate::from_ymd_opt(2023, 2, 1)
        );
        assert_eq!(
            first_day_of_next_month(2023, 12),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_month_ordinal_orders_across_years() {
        assert_eq!(month_ordinal(2023, 12) + 1, month_ordinal(2024, 1));
        assert!(month_ordinal(2023, 11) < month_ordinal(2024, 2));
        assert_eq!(month_ordinal(2024, 3) - month_ordinal(2023, 1), 14);
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_parse_calendar_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(parse_calendar_date("2024-01-10").unwrap(), expected);
        assert_eq!(
            parse_calendar_date("2024-01-10T00:00:00.000Z").unwrap(),
            expected
        );
        assert_eq!(parse_calendar_date(" 2024-01-10 ").unwrap(), expected);

        assert!(parse_calendar_date("2024-13-01").is_err());
        assert!(parse_calendar_date("10/01/2024").is_err());
        assert!(parse_calendar_date("").is_err());
    }
}
