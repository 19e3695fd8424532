//! Billing period contract

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CareError, Result, ValidationError};

/// Half-open date window `[start, end)` over which compliance is aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPeriod")]
pub struct BillingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawPeriod> for BillingPeriod {
    type Error = CareError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl BillingPeriod {
    /// Create a period, rejecting empty or inverted windows
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(ValidationError::InvalidPeriod { start, end }.into());
        }
        Ok(Self { start, end })
    }

    /// The calendar month `year-month`
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(ValidationError::InvalidMonth { year, month })?;
        Self::month_starting(start)
    }

    /// The calendar month containing `date`
    pub fn containing(date: NaiveDate) -> Result<Self> {
        Self::month(date.year(), date.month())
    }

    fn month_starting(start: NaiveDate) -> Result<Self> {
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(ValidationError::InvalidPeriod { start, end: start })?;
        Self::new(start, end)
    }

    /// The period immediately following this one, with the same length in months
    /// when this is a calendar month and the same length in days otherwise
    pub fn next(&self) -> Result<Self> {
        if self.is_calendar_month() {
            return Self::month_starting(self.end);
        }
        let end = self
            .end
            .checked_add_signed(self.end - self.start)
            .ok_or(ValidationError::InvalidPeriod {
                start: self.end,
                end: self.end,
            })?;
        Self::new(self.end, end)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls in `[start, end)`
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of days in the period
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    #[must_use]
    pub fn is_calendar_month(&self) -> bool {
        self.start.day() == 1 && self.start.checked_add_months(Months::new(1)) == Some(self.end)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
