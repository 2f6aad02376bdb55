//! Calendar month used by reports and the fixed-entry rollover.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};

use crate::{EngineError, ResultEngine};

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A calendar month, e.g. `2024-02`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
    first_day: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate(format!("invalid month: {month}")));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::InvalidDate(format!("invalid year: {year}")));
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::InvalidDate(format!("invalid period: {year}-{month}")))?;
        Ok(Self {
            year,
            month,
            first_day,
        })
    }

    /// The month `date` falls in.
    pub fn containing(date: NaiveDate) -> ResultEngine<Self> {
        Self::new(date.year(), date.month())
    }

    /// The current month (UTC).
    pub fn current() -> ResultEngine<Self> {
        Self::containing(Utc::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }

    pub fn next(self) -> ResultEngine<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn previous(self) -> ResultEngine<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// `[first day, first day of next month)`.
    pub fn date_range(self) -> ResultEngine<(NaiveDate, NaiveDate)> {
        Ok((self.first_day, self.next()?.first_day))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
