use crate::error::{EstateLedgerError, Result};
use crate::utils::{first_day_of_month, first_day_of_next_month, month_ordinal, validate_month};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKind {
    Year(i32),
    Month { year: i32, month: u32 },
}

/// A reporting period: one calendar year or one calendar month.
///
/// The half-open date window `[start, end)` is resolved when the period is
/// built, so every constructed `Period` is known to be representable.
/// Text form is `YYYY` or `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    kind: PeriodKind,
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn year(year: i32) -> Result<Self> {
        let start = first_day_of_month(year, 1);
        let end = first_day_of_month(year.saturating_add(1), 1);

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self {
                kind: PeriodKind::Year(year),
                start,
                end,
            }),
            _ => Err(EstateLedgerError::InvalidPeriod(format!(
                "year {} is outside the supported calendar range",
                year
            ))),
        }
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        validate_month(month)?;

        let start = first_day_of_month(year, month);
        let end = first_day_of_next_month(year, month);

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self {
                kind: PeriodKind::Month { year, month },
                start,
                end,
            }),
            _ => Err(EstateLedgerError::InvalidPeriod(format!(
                "{:04}-{:02} is outside the supported calendar range",
                year, month
            ))),
        }
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Result<Self> {
        Self::month(date.year(), date.month())
    }

    /// The calendar year containing `date`.
    pub fn year_of(date: NaiveDate) -> Result<Self> {
        Self::year(date.year())
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn calendar_year(&self) -> i32 {
        match self.kind {
            PeriodKind::Year(year) => year,
            PeriodKind::Month { year, .. } => year,
        }
    }

    /// The month number (1-12) for a month period, `None` for a year period.
    pub fn calendar_month(&self) -> Option<u32> {
        match self.kind {
            PeriodKind::Year(_) => None,
            PeriodKind::Month { month, .. } => Some(month),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the period (exclusive bound).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Last day inside the period (inclusive bound), for display.
    pub fn last_day(&self) -> NaiveDate {
        self.end.checked_sub_days(Days::new(1)).unwrap_or(self.start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of months in this period that are due as of `today`.
    ///
    /// A year is fully due once it has passed, due up to and including the
    /// current month while it is running, and not due at all before it starts.
    /// A single month is due once `today` has reached it.
    pub fn months_elapsed(&self, today: NaiveDate) -> u32 {
        match self.kind {
            PeriodKind::Year(year) => {
                if year < today.year() {
                    12
                } else if year == today.year() {
                    today.month()
                } else {
                    0
                }
            }
            PeriodKind::Month { year, month } => {
                if month_ordinal(year, month) <= month_ordinal(today.year(), today.month()) {
                    1
                } else {
                    0
                }
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PeriodKind::Year(year) => write!(f, "{:04}", year),
            PeriodKind::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl FromStr for Period {
    type Err = EstateLedgerError;

    /// Parses `"YYYY"` or `"YYYY-MM"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || {
            EstateLedgerError::InvalidPeriod(format!(
                "'{}'. Expected 'YYYY' or 'YYYY-MM'",
                s
            ))
        };

        let parts: Vec<&str> = trimmed.split('-').collect();
        let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());

        match parts.as_slice() {
            [year] if all_digits(year) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                Self::year(year)
            }
            [year, month] if all_digits(year) && all_digits(month) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                Self::month(year, month)
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = EstateLedgerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
