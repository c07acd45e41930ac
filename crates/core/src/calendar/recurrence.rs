use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Which occurrence of a weekday within a month a monthly rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayIndex {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekdayIndex {
    /// Returns the 1-based position counted from the start of the month,
    /// or None for `Last`, which is counted from the end.
    pub fn ordinal(self) -> Option<u32> {
        match self {
            WeekdayIndex::First => Some(1),
            WeekdayIndex::Second => Some(2),
            WeekdayIndex::Third => Some(3),
            WeekdayIndex::Fourth => Some(4),
            WeekdayIndex::Last => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeekdayIndex::First => "first",
            WeekdayIndex::Second => "second",
            WeekdayIndex::Third => "third",
            WeekdayIndex::Fourth => "fourth",
            WeekdayIndex::Last => "last",
        }
    }
}

/// The two mutually exclusive ways a monthly rule picks its days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MonthlyMode {
    /// Fixed days of the month, e.g. the 2nd and the 15th.
    DaysOfMonth { days: BTreeSet<u32> },
    /// The Nth (or last) given weekday, e.g. "second Wednesday".
    WeekdayIndex {
        index: WeekdayIndex,
        #[serde(with = "crate::serde::sunday_weekday")]
        weekday: Weekday,
    },
}

/// The repeat pattern of an event.
///
/// Each variant carries only the fields that matter for it. A monthly rule
/// without a mode is representable (it comes from incomplete CMS input) and
/// never occurs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Daily {
        interval: u32,
    },
    Weekly {
        interval: u32,
        #[serde(with = "crate::serde::sunday_weekdays")]
        weekdays: HashSet<Weekday>,
    },
    Monthly {
        interval: u32,
        #[serde(default)]
        mode: Option<MonthlyMode>,
    },
}

/// Discriminant of [`Recurrence`], used for logging and API summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn kind(&self) -> RecurrenceKind {
        match self {
            Recurrence::None => RecurrenceKind::None,
            Recurrence::Daily { .. } => RecurrenceKind::Daily,
            Recurrence::Weekly { .. } => RecurrenceKind::Weekly,
            Recurrence::Monthly { .. } => RecurrenceKind::Monthly,
        }
    }

    /// Returns true unless this is `Recurrence::None`.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => write!(f, "does not repeat"),
            Recurrence::Daily { interval } => write!(f, "every {interval} day(s)"),
            Recurrence::Weekly { interval, weekdays } => {
                let mut days: Vec<&Weekday> = weekdays.iter().collect();
                days.sort_by_key(|day| day.num_days_from_sunday());
                let names: Vec<String> = days.iter().map(|day| day.to_string()).collect();
                write!(f, "every {interval} week(s) on {}", names.join(", "))
            }
            Recurrence::Monthly { interval, mode } => {
                write!(f, "every {interval} month(s)")?;
                match mode {
                    Some(MonthlyMode::DaysOfMonth { days }) => {
                        let names: Vec<String> = days.iter().map(u32::to_string).collect();
                        write!(f, " on day(s) {}", names.join(", "))
                    }
                    Some(MonthlyMode::WeekdayIndex { index, weekday }) => {
                        write!(f, " on the {} {weekday}", index.label())
                    }
                    None => Ok(()),
                }
            }
        }
    }
}

/// Converts a 0..6 weekday number (Sunday = 0) into a [`Weekday`].
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// A complete, read-only description of when an event repeats.
///
/// All recurrence math is measured from `anchor_date`. A rule without an
/// anchor never occurs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub recurrence: Recurrence,
    pub anchor_date: Option<NaiveDate>,
    /// No occurrence falls after this date.
    pub end_date: Option<NaiveDate>,
    /// Dates suppressed regardless of the pattern.
    #[serde(default)]
    pub exception_dates: BTreeSet<NaiveDate>,
}

impl RecurrenceRule {
    /// Creates a rule with the given pattern starting on `anchor_date`.
    pub fn new(recurrence: Recurrence, anchor_date: NaiveDate) -> Self {
        Self {
            recurrence,
            anchor_date: Some(anchor_date),
            end_date: None,
            exception_dates: BTreeSet::new(),
        }
    }

    /// Every `interval` days from the anchor.
    pub fn daily(anchor_date: NaiveDate, interval: u32) -> Self {
        Self::new(Recurrence::Daily { interval }, anchor_date)
    }

    /// On the given weekdays of every `interval`-th week from the anchor's week.
    pub fn weekly(
        anchor_date: NaiveDate,
        interval: u32,
        weekdays: impl IntoIterator<Item = Weekday>,
    ) -> Self {
        Self::new(
            Recurrence::Weekly {
                interval,
                weekdays: weekdays.into_iter().collect(),
            },
            anchor_date,
        )
    }

    /// On the given days of every `interval`-th month from the anchor's month.
    pub fn monthly_on_days(
        anchor_date: NaiveDate,
        interval: u32,
        days: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self::new(
            Recurrence::Monthly {
                interval,
                mode: Some(MonthlyMode::DaysOfMonth {
                    days: days.into_iter().collect(),
                }),
            },
            anchor_date,
        )
    }

    /// On the Nth (or last) weekday of every `interval`-th month.
    pub fn monthly_on_weekday(
        anchor_date: NaiveDate,
        interval: u32,
        index: WeekdayIndex,
        weekday: Weekday,
    ) -> Self {
        Self::new(
            Recurrence::Monthly {
                interval,
                mode: Some(MonthlyMode::WeekdayIndex { index, weekday }),
            },
            anchor_date,
        )
    }

    /// Sets the last date an occurrence may fall on.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Adds a single exception date.
    pub fn with_exception(mut self, date: NaiveDate) -> Self {
        self.exception_dates.insert(date);
        self
    }

    /// Adds several exception dates.
    pub fn with_exceptions(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.exception_dates.extend(dates);
        self
    }

    pub fn kind(&self) -> RecurrenceKind {
        self.recurrence.kind()
    }

    /// Returns true if `date` is explicitly excluded.
    pub fn is_exception(&self, date: NaiveDate) -> bool {
        self.exception_dates.contains(&date)
    }

    /// Returns true if the series ended strictly before `date`.
    pub fn has_ended_before(&self, date: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_weekday_index_ordinal() {
        assert_eq!(WeekdayIndex::First.ordinal(), Some(1));
        assert_eq!(WeekdayIndex::Fourth.ordinal(), Some(4));
        assert_eq!(WeekdayIndex::Last.ordinal(), None);
    }

    #[test]
    fn test_weekday_from_index_is_sunday_based() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(3), Some(Weekday::Wed));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn test_rule_builder() {
        let anchor = make_date(2018, 11, 1);
        let rule = RecurrenceRule::daily(anchor, 6)
            .with_end_date(make_date(2018, 11, 30))
            .with_exceptions([make_date(2018, 11, 13), make_date(2018, 11, 25)]);

        assert_eq!(rule.kind(), RecurrenceKind::Daily);
        assert_eq!(rule.anchor_date, Some(anchor));
        assert!(rule.is_exception(make_date(2018, 11, 13)));
        assert!(!rule.is_exception(make_date(2018, 11, 19)));
        assert!(rule.has_ended_before(make_date(2018, 12, 1)));
        assert!(!rule.has_ended_before(make_date(2018, 11, 30)));
    }

    #[test]
    fn test_recurrence_display() {
        let weekly = Recurrence::Weekly {
            interval: 2,
            weekdays: HashSet::from([Weekday::Thu, Weekday::Tue]),
        };
        assert_eq!(weekly.to_string(), "every 2 week(s) on Tue, Thu");

        let monthly = RecurrenceRule::monthly_on_weekday(
            make_date(2018, 11, 14),
            1,
            WeekdayIndex::Second,
            Weekday::Wed,
        );
        assert_eq!(
            monthly.recurrence.to_string(),
            "every 1 month(s) on the second Wed"
        );

        let incomplete = Recurrence::Monthly {
            interval: 1,
            mode: None,
        };
        assert_eq!(incomplete.to_string(), "every 1 month(s)");
    }

    #[test]
    fn test_rule_json_shape() {
        let rule = RecurrenceRule::monthly_on_days(make_date(2018, 11, 10), 1, [15, 10]);
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["recurrence"]["kind"], "monthly");
        assert_eq!(json["recurrence"]["mode"]["mode"], "days_of_month");
        assert_eq!(json["recurrence"]["mode"]["days"], serde_json::json!([10, 15]));

        let parsed: RecurrenceRule = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn test_weekly_rule_from_json() {
        let json = r#"{
            "recurrence": {"kind": "weekly", "interval": 2, "weekdays": [5]},
            "anchor_date": "2018-11-02",
            "end_date": null
        }"#;
        let rule: RecurrenceRule = serde_json::from_str(json).unwrap();

        assert_eq!(
            rule.recurrence,
            Recurrence::Weekly {
                interval: 2,
                weekdays: HashSet::from([Weekday::Fri]),
            }
        );
        assert!(rule.exception_dates.is_empty());
    }
}
