//! Term model
//!
//! An academic billing period. Where a term sits relative to today (upcoming,
//! current, completed) is always computed from its dates, never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TermId;

/// Number of terms in an academic year
pub const TERMS_PER_YEAR: u8 = 3;

/// Where a term sits relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermPhase {
    Upcoming,
    Current,
    Completed,
}

impl fmt::Display for TermPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Upcoming => "Upcoming",
            Self::Current => "Current",
            Self::Completed => "Completed",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,

    /// Term number within the year (1 to 3)
    pub number: u8,

    /// Academic year
    pub year: i32,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,
}

impl Term {
    pub fn new(number: u8, year: i32, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: TermId::from_parts(number, year),
            number,
            year,
            start_date,
            end_date,
        }
    }

    /// Display name, e.g. "Term 1, 2025"
    pub fn name(&self) -> String {
        format!("Term {}, {}", self.number, self.year)
    }

    /// Length of the term in days, both ends included
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Length of the term rounded to the nearest week
    pub fn duration_weeks(&self) -> i64 {
        (self.total_days() + 3) / 7
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn overlaps(&self, other: &Term) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    pub fn phase(&self, today: NaiveDate) -> TermPhase {
        if today < self.start_date {
            TermPhase::Upcoming
        } else if today > self.end_date {
            TermPhase::Completed
        } else {
            TermPhase::Current
        }
    }

    /// Days of the term already behind `today`
    pub fn days_elapsed(&self, today: NaiveDate) -> i64 {
        (today - self.start_date).num_days().clamp(0, self.total_days())
    }

    /// Days of the term still ahead of `today`
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().clamp(0, self.total_days())
    }

    /// Whole percentage of the term completed
    pub fn percent_complete(&self, today: NaiveDate) -> u32 {
        let total = self.total_days();
        if total <= 0 {
            return 0;
        }
        (self.days_elapsed(today) * 100 / total) as u32
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.number == 0 || self.number > TERMS_PER_YEAR {
            return Err(format!(
                "Term number must be between 1 and {}, got {}",
                TERMS_PER_YEAR, self.number
            ));
        }
        if self.end_date <= self.start_date {
            return Err(format!(
                "Term end date {} must be after start date {}",
                self.end_date, self.start_date
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name())
    }
}
