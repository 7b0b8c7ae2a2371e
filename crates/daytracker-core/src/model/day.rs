use chrono::NaiveDate;

use super::Argb;

/// One calendar date's assigned color within a specific calendar.
///
/// Within a calendar's day list, dates are unique -- coloring an
/// already-colored date replaces the prior entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    pub color: Argb,
}

impl Day {
    pub fn new(date: NaiveDate, color: Argb) -> Self {
        Self { date, color }
    }
}
