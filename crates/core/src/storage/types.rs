use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use super::DateRangeError;
use crate::calendar::week_start;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// A single day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates a date range for an entire month.
    pub fn month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// Creates a date range for the Sunday-to-Saturday week containing `date`.
    pub fn week(date: NaiveDate) -> Self {
        let start = week_start(date);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);

        Self { start, end }
    }

    /// From `start` until the same day `months` months later.
    pub fn months_from(start: NaiveDate, months: u32) -> Self {
        let end = start
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Rejects ranges longer than `max_days`.
    pub fn limited_to(self, max_days: i64) -> Result<Self, DateRangeError> {
        let days = self.days();
        if days > max_days {
            return Err(DateRangeError::TooLong {
                days,
                max: max_days,
            });
        }
        Ok(self)
    }

    /// True if the range is exactly one calendar month.
    pub fn is_whole_month(&self) -> bool {
        Self::month(self.start.year(), self.start.month()).is_ok_and(|month| month == *self)
    }

    /// True if the range is exactly one Sunday-to-Saturday week.
    pub fn is_whole_week(&self) -> bool {
        Self::week(self.start) == *self
    }
}

/// What the event store is asked for when building a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub range: DateRange,
    /// Whitespace-separated words; any one matching is enough.
    pub keyword: Option<String>,
    /// Region ids; empty means every region.
    pub region_ids: Vec<u64>,
    /// Event-type ids; empty means every type.
    pub event_type_ids: Vec<u64>,
}

impl EventQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            keyword: None,
            region_ids: Vec::new(),
            event_type_ids: Vec::new(),
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_regions(mut self, region_ids: impl IntoIterator<Item = u64>) -> Self {
        self.region_ids = region_ids.into_iter().collect();
        self
    }

    pub fn with_event_types(mut self, event_type_ids: impl IntoIterator<Item = u64>) -> Self {
        self.event_type_ids = event_type_ids.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_valid_range_construction() {
        let range = DateRange::new(make_date(2018, 11, 1), make_date(2018, 11, 30)).unwrap();

        assert_eq!(range.start, make_date(2018, 11, 1));
        assert_eq!(range.end, make_date(2018, 11, 30));
        assert_eq!(range.days(), 30);
    }

    #[test]
    fn test_invalid_range_returns_error() {
        let result = DateRange::new(make_date(2018, 11, 30), make_date(2018, 11, 1));
        assert_eq!(result, Err(DateRangeError::InvalidRange));
    }

    #[test]
    fn test_month_factory_february_non_leap_year() {
        let range = DateRange::month(2019, 2).unwrap();

        assert_eq!(range.start, make_date(2019, 2, 1));
        assert_eq!(range.end, make_date(2019, 2, 28));
        assert!(range.is_whole_month());
    }

    #[test]
    fn test_month_factory_december() {
        let range = DateRange::month(2018, 12).unwrap();
        assert_eq!(range.end, make_date(2018, 12, 31));
    }

    #[test]
    fn test_month_factory_invalid_month() {
        assert_eq!(
            DateRange::month(2018, 13),
            Err(DateRangeError::InvalidMonth {
                year: 2018,
                month: 13
            })
        );
    }

    #[test]
    fn test_week_factory_starts_on_sunday() {
        // 2018-11-14 is a Wednesday
        let range = DateRange::week(make_date(2018, 11, 14));

        assert_eq!(range.start, make_date(2018, 11, 11));
        assert_eq!(range.end, make_date(2018, 11, 17));
        assert_eq!(range.start.weekday(), Weekday::Sun);
        assert_eq!(range.end.weekday(), Weekday::Sat);
        assert!(range.is_whole_week());
    }

    #[test]
    fn test_week_factory_crossing_month_boundary() {
        let range = DateRange::week(make_date(2018, 11, 30));

        assert_eq!(range.start, make_date(2018, 11, 25));
        assert_eq!(range.end, make_date(2018, 12, 1));
    }

    #[test]
    fn test_months_from_clamps_day() {
        let range = DateRange::months_from(make_date(2018, 11, 30), 3);
        assert_eq!(range.end, make_date(2019, 2, 28));
    }

    #[test]
    fn test_limited_to() {
        let range = DateRange::new(make_date(2018, 1, 1), make_date(2018, 12, 31)).unwrap();
        assert!(range.limited_to(365).is_ok());
        assert_eq!(
            range.limited_to(100),
            Err(DateRangeError::TooLong {
                days: 365,
                max: 100
            })
        );
    }

    #[test]
    fn test_shape_predicates() {
        let range = DateRange::new(make_date(2018, 11, 12), make_date(2018, 11, 18)).unwrap();
        assert!(!range.is_whole_week());
        assert!(!range.is_whole_month());
        assert!(range.contains(make_date(2018, 11, 18)));
        assert!(!range.contains(make_date(2018, 11, 19)));
    }

    #[test]
    fn test_event_query_builder() {
        let query = EventQuery::new(DateRange::day(make_date(2018, 11, 14)))
            .with_keyword("jazz")
            .with_regions([1, 2])
            .with_event_types([5]);

        assert_eq!(query.keyword.as_deref(), Some("jazz"));
        assert_eq!(query.region_ids, vec![1, 2]);
        assert_eq!(query.event_type_ids, vec![5]);
    }
}
