use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::types::Occurrence;

/// Sorts occurrences by date, then start time, with all-day entries first.
///
/// The sort is stable, so occurrences sharing a date and time keep their
/// input order.
pub fn sort_occurrences(occurrences: &mut [Occurrence]) {
    occurrences.sort_by_key(Occurrence::schedule_key);
}

/// Returns true if `occurrences` is in display order.
pub fn is_sorted_for_display(occurrences: &[Occurrence]) -> bool {
    occurrences
        .windows(2)
        .all(|pair| pair[0].schedule_key() <= pair[1].schedule_key())
}

/// The occurrences starting on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOccurrences {
    pub date: NaiveDate,
    pub occurrences: Vec<Occurrence>,
}

impl DayOccurrences {
    pub fn new(date: NaiveDate, occurrences: Vec<Occurrence>) -> Self {
        Self { date, occurrences }
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Groups occurrences by start date. Days without occurrences are omitted
/// and each day keeps the display order.
pub fn build_day_list(occurrences: Vec<Occurrence>) -> Vec<DayOccurrences> {
    let mut grouped: BTreeMap<NaiveDate, Vec<Occurrence>> = BTreeMap::new();

    for occurrence in occurrences {
        grouped
            .entry(occurrence.start_date)
            .or_default()
            .push(occurrence);
    }

    grouped
        .into_iter()
        .map(|(date, mut day)| {
            sort_occurrences(&mut day);
            DayOccurrences::new(date, day)
        })
        .collect()
}
