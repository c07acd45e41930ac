//! Decides whether a recurrence rule produces an occurrence on a given date.
//!
//! Every function here is total: degenerate rules (zero interval, missing
//! anchor, monthly without a mode) simply never occur.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use super::recurrence::{MonthlyMode, Recurrence, RecurrenceRule, WeekdayIndex};

/// Returns true if `rule` yields an occurrence on `date`.
///
/// Dates before the anchor never occur, and exception dates override every
/// pattern. The rule's end date is not consulted here; the expander applies it.
pub fn is_occurrence(rule: &RecurrenceRule, date: NaiveDate) -> bool {
    let Some(anchor) = rule.anchor_date else {
        return false;
    };
    if date < anchor || rule.is_exception(date) {
        return false;
    }

    match &rule.recurrence {
        Recurrence::None => false,
        Recurrence::Daily { interval } => {
            let days = (date - anchor).num_days();
            is_multiple(days, *interval)
        }
        Recurrence::Weekly { interval, weekdays } => {
            let weeks = (week_start(date) - week_start(anchor)).num_days() / 7;
            is_multiple(weeks, *interval) && weekdays.contains(&date.weekday())
        }
        Recurrence::Monthly { interval, mode } => {
            if !is_multiple(month_delta(anchor, date), *interval) {
                return false;
            }
            match mode {
                Some(MonthlyMode::DaysOfMonth { days }) => days.contains(&date.day()),
                Some(MonthlyMode::WeekdayIndex { index, weekday }) => {
                    weekday_in_month(date.year(), date.month(), *index, *weekday) == Some(date)
                }
                None => false,
            }
        }
    }
}

/// `delta mod interval == 0`, with a zero interval never matching.
fn is_multiple(delta: i64, interval: u32) -> bool {
    interval > 0 && delta.rem_euclid(i64::from(interval)) == 0
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Whole calendar months from `from` to `to`, ignoring the day.
pub fn month_delta(from: NaiveDate, to: NaiveDate) -> i64 {
    let index = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month0());
    index(to) - index(from)
}

/// Resolves "the Nth (or last) `weekday` of `year`-`month`".
///
/// Returns None when the month is invalid or has no such weekday (a fifth
/// occurrence is never asked for, so this only happens at the calendar's
/// outer limits).
pub fn weekday_in_month(
    year: i32,
    month: u32,
    index: WeekdayIndex,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    match index.ordinal() {
        None => {
            // Step back from the first of next month to the previous target weekday.
            let next_month = first.checked_add_months(Months::new(1))?;
            let back = days_back_to(weekday, next_month.weekday());
            next_month.checked_sub_days(Days::new(u64::from(back)))
        }
        Some(nth) => {
            // Step forward from the last day of the previous month.
            let forward =
                (7 + weekday.num_days_from_sunday() - first.weekday().num_days_from_sunday()) % 7;
            let candidate =
                first.checked_add_days(Days::new(u64::from(forward + (nth - 1) * 7)))?;
            (candidate.month() == month).then_some(candidate)
        }
    }
}

/// Days to step back from a date falling on `from` to reach the previous
/// `target`. Strictly before, so the same weekday is a full week back.
fn days_back_to(target: Weekday, from: Weekday) -> u32 {
    let diff = (7 + from.num_days_from_sunday() - target.num_days_from_sunday()) % 7;
    if diff == 0 {
        7
    } else {
        diff
    }
}
