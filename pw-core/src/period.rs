use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A closed date range, start through end inclusive.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize, Deserialize)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    /// Number of days covered, counting both ends. Zero when reversed.
    pub fn num_days(&self) -> i64 {
        ((self.1 - self.0).num_days() + 1).max(0)
    }
}

/// A user's start/end selection for one comparison period.
///
/// Either end may still be unset. Setters keep the selection ordered: moving
/// the start past the end drags the end along, and vice versa.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Default)]
pub struct PeriodSelection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl PeriodSelection {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn set_start(&mut self, date: NaiveDate) {
        self.start = Some(date);
        if matches!(self.end, Some(end) if date > end) {
            self.end = Some(date);
        }
    }

    pub fn set_end(&mut self, date: NaiveDate) {
        self.end = Some(date);
        if matches!(self.start, Some(start) if date < start) {
            self.start = Some(date);
        }
    }

    /// The selected range, once both ends are set.
    pub fn range(&self) -> Option<DateRange> {
        Some(DateRange(self.start?, self.end?))
    }

    /// Default comparison periods relative to `today`: the first runs from
    /// 30 to 15 days ago, the second from today to 15 days ahead.
    pub fn default_pair(today: NaiveDate) -> (PeriodSelection, PeriodSelection) {
        let first = PeriodSelection::new(
            today.checked_sub_days(Days::new(30)),
            today.checked_sub_days(Days::new(15)),
        );
        let second = PeriodSelection::new(Some(today), today.checked_add_days(Days::new(15)));
        (first, second)
    }
}

impl From<DateRange> for PeriodSelection {
    fn from(range: DateRange) -> Self {
        Self::new(Some(range.0), Some(range.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_num_days() {
        assert_eq!(DateRange(ymd(2022, 1, 1), ymd(2022, 1, 5)).num_days(), 5);
        assert_eq!(DateRange(ymd(2022, 3, 15), ymd(2022, 3, 15)).num_days(), 1);
        assert_eq!(DateRange(ymd(2022, 3, 15), ymd(2022, 3, 14)).num_days(), 0);
    }

    #[test]
    fn test_selection_range_requires_both_ends() {
        let mut selection = PeriodSelection::default();
        assert_eq!(selection.range(), None);
        selection.set_start(ymd(2024, 1, 1));
        assert_eq!(selection.range(), None);
        selection.set_end(ymd(2024, 1, 31));
        assert_eq!(selection.range(), Some(DateRange(ymd(2024, 1, 1), ymd(2024, 1, 31))));
    }

    #[test]
    fn test_selection_stays_ordered() {
        let mut selection = PeriodSelection::new(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 10)));
        selection.set_start(ymd(2024, 2, 1));
        assert_eq!(selection.end, Some(ymd(2024, 2, 1)));

        selection.set_end(ymd(2023, 12, 1));
        assert_eq!(selection.start, Some(ymd(2023, 12, 1)));
        assert_eq!(selection.end, Some(ymd(2023, 12, 1)));
    }

    #[test]
    fn test_default_pair() {
        let (first, second) = PeriodSelection::default_pair(ymd(2024, 3, 31));
        assert_eq!(first.range(), Some(DateRange(ymd(2024, 3, 1), ymd(2024, 3, 16))));
        assert_eq!(second.range(), Some(DateRange(ymd(2024, 3, 31), ymd(2024, 4, 15))));
    }
}
