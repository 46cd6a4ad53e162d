//! Reporting windows on the UTC calendar
//!
//! Every window is open-ended: it starts on a calendar day and runs through
//! whatever the ledger holds after it, future-dated expenses included.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Start days of the summary windows for one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub today: NaiveDate,
    /// Trailing seven days: today and the six days before it
    pub week: NaiveDate,
    /// First day of the current calendar month
    pub month: NaiveDate,
}

impl WindowBounds {
    pub fn from_now(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            today,
            week: today - Duration::days(6),
            month: today.with_day(1).unwrap_or(today),
        }
    }

    /// True when the week window lies inside the month window
    ///
    /// Early in a month the trailing week reaches back into the previous
    /// month, so the week total can exceed the month total.
    pub fn week_within_month(&self) -> bool {
        self.month <= self.week
    }
}
