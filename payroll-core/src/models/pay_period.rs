use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    /// Months are 0-indexed: January is 0, December is 11.
    #[error("month must be between 0 and 11, got {0}")]
    InvalidMonth(u32),

    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

/// A calendar month used to bucket sales and attendance.
///
/// The month is 0-indexed, matching [`Datelike::month0`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPayPeriod")]
pub struct PayPeriod {
    year: i32,
    month0: u32,
}

/// Unchecked serde form of [`PayPeriod`].
#[derive(Deserialize)]
struct RawPayPeriod {
    year: i32,
    month0: u32,
}

impl TryFrom<RawPayPeriod> for PayPeriod {
    type Error = PeriodError;

    fn try_from(raw: RawPayPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month0)
    }
}

impl PayPeriod {
    /// # Example
    ///
    /// ```
    /// use payroll_core::{PayPeriod, PeriodError};
    ///
    /// let march = PayPeriod::new(2025, 2).unwrap();
    /// assert_eq!(march.days_in_month(), 31);
    /// assert_eq!(march.working_days(), 27);
    ///
    /// assert_eq!(PayPeriod::new(2025, 12), Err(PeriodError::InvalidMonth(12)));
    /// ```
    pub fn new(
        year: i32,
        month0: u32,
    ) -> Result<Self, PeriodError> {
        if month0 > 11 {
            return Err(PeriodError::InvalidMonth(month0));
        }
        if NaiveDate::from_ymd_opt(year, month0 + 1, 1).is_none() {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month0 })
    }

    /// The period containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn contains(
        &self,
        date: NaiveDate,
    ) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month0 {
            1 if is_leap_year(self.year) => 29,
            1 => 28,
            3 | 5 | 8 | 10 => 30,
            _ => 31,
        }
    }

    /// Calendar days minus one rest day per full week.
    ///
    /// This approximates "Fridays off" as `days / 7` rather than counting the
    /// Fridays that actually fall in the month; pro-ration is calibrated
    /// against this figure.
    pub fn working_days(&self) -> u32 {
        let days = self.days_in_month();
        days - days / 7
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
