//! Calendar period types for monthly revenue bucketing.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Calendar month, 1 (January) through 12 (December).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Month(u8);

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month(1),
        Month(2),
        Month(3),
        Month(4),
        Month(5),
        Month(6),
        Month(7),
        Month(8),
        Month(9),
        Month(10),
        Month(11),
        Month(12),
    ];

    pub fn new(number: u8) -> DomainResult<Self> {
        if !(1..=12).contains(&number) {
            return Err(DomainError::validation(format!(
                "month out of range: {number}"
            )));
        }
        Ok(Self(number))
    }

    /// Month of a UTC timestamp.
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        // chrono's month() is always 1..=12.
        Self(timestamp.month() as u8)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Zero-based index for fixed 12-slot arrays.
    pub fn index(&self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A billing period: one calendar month of one year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Period a UTC timestamp falls into.
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: Month::of(timestamp),
        }
    }
}

impl core::fmt::Display for Period {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}
