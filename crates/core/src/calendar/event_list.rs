//! Builds the ordered occurrence list for a date window.
//!
//! Standard events come from the store as templates; series are expanded
//! into one synthetic occurrence per date. Both are merged and sorted.

use tracing::{debug, trace};

use super::expander::expand;
use super::sorting::sort_occurrences;
use super::types::{EventTemplate, Occurrence, RecurringEvent};
use crate::storage::{self, DateRange, EventQuery, EventRepository};

/// Hands out occurrence ids for a single list build.
#[derive(Debug, Default)]
pub struct OccurrenceIds {
    next: u64,
}

impl OccurrenceIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

/// Expands one series over `range` into occurrences.
///
/// A series whose last start date is before the window is skipped without
/// being walked.
pub fn materialize(
    recurring: &RecurringEvent,
    range: DateRange,
    ids: &mut OccurrenceIds,
) -> Vec<Occurrence> {
    let template = &recurring.template;
    if template
        .last_start_date
        .is_some_and(|last| last < range.start)
    {
        trace!(event_id = %template.event_id, "series ended before window, skipped");
        return Vec::new();
    }

    expand(&recurring.rule, range.start, range.end)
        .map(|date| Occurrence::recurring(template, date, ids.next_id()))
        .collect()
}

/// Merges standard templates and expanded series into one sorted list.
pub fn build_event_list(
    range: DateRange,
    standard: &[EventTemplate],
    recurring: &[RecurringEvent],
) -> Vec<Occurrence> {
    let mut ids = OccurrenceIds::new();
    let mut occurrences: Vec<Occurrence> = standard.iter().map(Occurrence::from_template).collect();

    for series in recurring {
        let expanded = materialize(series, range, &mut ids);
        trace!(
            event_id = %series.template.event_id,
            kind = ?series.rule.kind(),
            occurrences = expanded.len(),
            "expanded series"
        );
        occurrences.extend(expanded);
    }

    sort_occurrences(&mut occurrences);

    debug!(
        start = %range.start,
        end = %range.end,
        standard = standard.len(),
        series = recurring.len(),
        occurrences = occurrences.len(),
        "built event list"
    );

    occurrences
}

/// Fetches the window's events from `repo` and builds the sorted list.
pub async fn get_event_list(
    repo: &dyn EventRepository,
    query: &EventQuery,
) -> storage::Result<Vec<Occurrence>> {
    let standard = repo.get_standard_events(query).await?;
    let recurring = repo.get_recurring_events(query).await?;

    Ok(build_event_list(query.range, &standard, &recurring))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use proptest::prelude::*;
    use uuid::Uuid;

    use super::*;
    use crate::calendar::recurrence::Recurrence;
    use crate::calendar::sorting::is_sorted_for_display;
    use crate::calendar::types::{Event, OccurrenceId};

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_time(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    fn november() -> DateRange {
        DateRange::new(make_date(2018, 11, 1), make_date(2018, 11, 30)).unwrap()
    }

    fn weekly_fridays() -> Event {
        Event::recurring(
            "Choir",
            make_date(2018, 11, 2),
            Recurrence::Weekly {
                interval: 2,
                weekdays: [Weekday::Fri].into(),
            },
        )
        .with_times(make_time(19, 0), make_time(21, 0))
    }

    #[test]
    fn test_empty_inputs_give_empty_list() {
        assert!(build_event_list(november(), &[], &[]).is_empty());
    }

    #[test]
    fn test_merges_and_sorts() {
        let fair = Event::new("Fair", make_date(2018, 11, 16));
        let breakfast = Event::new("Breakfast", make_date(2018, 11, 2))
            .with_times(make_time(8, 0), make_time(9, 0));
        let choir = weekly_fridays().recurring_event().unwrap();

        let list = build_event_list(
            november(),
            &[fair.template.clone(), breakfast.template.clone()],
            &[choir],
        );

        let summary: Vec<(NaiveDate, &str)> = list
            .iter()
            .map(|o| (o.start_date, o.title.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (make_date(2018, 11, 2), "Breakfast"),
                (make_date(2018, 11, 2), "Choir"),
                (make_date(2018, 11, 16), "Fair"),
                (make_date(2018, 11, 16), "Choir"),
                (make_date(2018, 11, 30), "Choir"),
            ]
        );
        assert!(is_sorted_for_display(&list));
    }

    #[test]
    fn test_occurrence_ids_are_local_and_unique() {
        let choir = weekly_fridays().recurring_event().unwrap();
        let market = Event::recurring(
            "Market",
            make_date(2018, 11, 1),
            Recurrence::Daily { interval: 6 },
        )
        .recurring_event()
        .unwrap();

        let list = build_event_list(november(), &[], &[choir.clone(), market]);
        let mut ids: Vec<String> = list.iter().map(|o| o.id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), list.len());

        // A second build starts counting again.
        let again = build_event_list(november(), &[], &[choir]);
        assert!(again.iter().any(|o| o.id == OccurrenceId::Recurring(1)));
    }

    #[test]
    fn test_series_ended_before_window_is_skipped() {
        let ended = weekly_fridays()
            .with_last_start_date(make_date(2018, 10, 31))
            .recurring_event()
            .unwrap();
        let mut ids = OccurrenceIds::new();

        assert!(materialize(&ended, november(), &mut ids).is_empty());
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_materialized_occurrences_copy_template() {
        let event = weekly_fridays().with_duration(2);
        let series = event.recurring_event().unwrap();
        let mut ids = OccurrenceIds::new();

        let occurrences = materialize(&series, november(), &mut ids);

        assert_eq!(occurrences.len(), 3);
        for occurrence in &occurrences {
            assert_eq!(occurrence.source_event_id, event.id);
            assert_eq!(occurrence.template_id, event.template.id);
            assert_eq!(occurrence.start_time, Some(make_time(19, 0)));
            assert_eq!(occurrence.duration, 2);
        }
        assert_eq!(occurrences[1].finish_date, make_date(2018, 11, 17));
    }

    #[test]
    fn test_build_is_idempotent_ignoring_ids() {
        let choir = weekly_fridays().recurring_event().unwrap();
        let fair = Event::new("Fair", make_date(2018, 11, 16));
        let strip = |list: Vec<Occurrence>| -> Vec<(NaiveDate, String)> {
            list.into_iter().map(|o| (o.start_date, o.title)).collect()
        };

        let first = build_event_list(november(), &[fair.template.clone()], &[choir.clone()]);
        let second = build_event_list(november(), &[fair.template], &[choir]);
        assert_eq!(strip(first), strip(second));
    }

    struct StubRepository {
        standard: Vec<EventTemplate>,
        recurring: Vec<RecurringEvent>,
        queries: Mutex<Vec<EventQuery>>,
    }

    #[async_trait]
    impl EventRepository for StubRepository {
        async fn get_event(&self, _id: Uuid) -> storage::Result<Option<Event>> {
            Ok(None)
        }

        async fn get_standard_events(
            &self,
            query: &EventQuery,
        ) -> storage::Result<Vec<EventTemplate>> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.standard.clone())
        }

        async fn get_recurring_events(
            &self,
            _query: &EventQuery,
        ) -> storage::Result<Vec<RecurringEvent>> {
            Ok(self.recurring.clone())
        }

        async fn create_event(&self, _event: &Event) -> storage::Result<()> {
            Ok(())
        }

        async fn count_events(&self) -> storage::Result<usize> {
            Ok(self.standard.len() + self.recurring.len())
        }
    }

    #[tokio::test]
    async fn test_get_event_list_uses_repository() {
        let repo = StubRepository {
            standard: vec![Event::new("Fair", make_date(2018, 11, 16)).template],
            recurring: vec![weekly_fridays().recurring_event().unwrap()],
            queries: Mutex::new(Vec::new()),
        };
        let query = EventQuery::new(november()).with_keyword("choir");

        let list = get_event_list(&repo, &query).await.unwrap();

        assert_eq!(list.len(), 4);
        assert_eq!(repo.queries.lock().unwrap()[0], query);
    }

    proptest! {
        #[test]
        fn prop_list_is_sorted(
            offsets in proptest::collection::vec((0i64..30, proptest::option::of(0u32..24)), 0..12),
            interval in 1u32..5,
        ) {
            let standard: Vec<EventTemplate> = offsets
                .iter()
                .map(|(offset, hour)| {
                    let date = make_date(2018, 11, 1) + chrono::Duration::days(*offset);
                    let mut event = Event::new("Standard", date);
                    if let Some(hour) = hour {
                        event = event.with_times(make_time(*hour, 0), make_time(23, 59));
                    }
                    event.template
                })
                .collect();
            let series = Event::recurring(
                "Series",
                make_date(2018, 10, 20),
                Recurrence::Daily { interval },
            )
            .with_times(make_time(12, 0), make_time(13, 0))
            .recurring_event()
            .unwrap();

            let list = build_event_list(november(), &standard, &[series]);
            prop_assert!(is_sorted_for_display(&list));
        }
    }
}
