//! Expands a recurrence rule into the concrete dates inside a window.

use std::iter::FusedIterator;

use chrono::{Months, NaiveDate};

use super::evaluator::is_occurrence;
use super::recurrence::RecurrenceRule;

/// How far ahead `next_occurrence` looks for an unbounded series.
pub const DISPLAY_HORIZON_MONTHS: u32 = 18;

/// Lazy, ordered sequence of occurrence dates of one rule inside a window.
///
/// Walks the window a day at a time, so the cost is linear in the window
/// length. Clone it (or call [`expand`] again) to restart.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(date) = self.cursor {
            if date > self.end || self.rule.has_ended_before(date) {
                self.cursor = None;
                return None;
            }
            self.cursor = date.succ_opt();
            if is_occurrence(self.rule, date) {
                return Some(date);
            }
        }
        None
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Expands `rule` over the inclusive window `[start, end]`.
///
/// The walk starts at the later of `start` and the rule's anchor and stops
/// once the rule's end date has passed. A rule without an anchor yields
/// nothing.
pub fn expand(rule: &RecurrenceRule, start: NaiveDate, end: NaiveDate) -> Occurrences<'_> {
    let cursor = rule.anchor_date.map(|anchor| anchor.max(start));
    Occurrences { rule, cursor, end }
}

/// First occurrence on or after `from`.
///
/// Bounded by the rule's end date, or by [`DISPLAY_HORIZON_MONTHS`] when the
/// series never ends.
pub fn next_occurrence(rule: &RecurrenceRule, from: NaiveDate) -> Option<NaiveDate> {
    let horizon = from
        .checked_add_months(Months::new(DISPLAY_HORIZON_MONTHS))
        .unwrap_or(NaiveDate::MAX);
    let end = rule.end_date.map_or(horizon, |end| end.min(horizon));
    expand(rule, from, end).next()
}
