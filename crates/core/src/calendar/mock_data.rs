//! Demo events for seeding the event store.
//!
//! Pure functions: every date is derived from the `today` passed in, so the
//! same call always produces the same schedule (ids aside).

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

use super::recurrence::{MonthlyMode, Recurrence, WeekdayIndex};
use super::types::Event;

const REGION_CENTRAL: u64 = 1;
const REGION_NORTH: u64 = 2;
const TYPE_MUSIC: u64 = 10;
const TYPE_MARKET: u64 = 11;
const TYPE_COMMUNITY: u64 = 12;

fn days_after(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(today)
}

fn with_hours(event: Event, start: u32, end: u32) -> Event {
    match (
        NaiveTime::from_hms_opt(start, 0, 0),
        NaiveTime::from_hms_opt(end, 0, 0),
    ) {
        (Some(start), Some(end)) => event.with_times(start, end),
        _ => event,
    }
}

/// Generates a mix of standard and recurring demo events around `today`.
///
/// Covers every recurrence shape: daily, weekly on several weekdays, monthly
/// on fixed days and monthly on an indexed weekday, plus a series with a
/// cancelled date and one multi-day standard event.
///
/// # Example
///
/// ```
/// use eventide_core::calendar::generate_seed_events;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2018, 11, 14).unwrap();
/// let events = generate_seed_events(today);
///
/// assert!(events.iter().any(|event| event.is_recurring()));
/// assert!(events.iter().any(|event| !event.is_recurring()));
/// ```
pub fn generate_seed_events(today: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();

    events.push(
        with_hours(
            Event::new("Harvest Fair", days_after(today, 3)),
            10,
            17,
        )
        .with_description("Local produce, crafts and a children's corner")
        .with_location("Town Square")
        .with_region(REGION_CENTRAL)
        .with_event_type(TYPE_MARKET),
    );

    events.push(
        Event::new("Folk Festival", days_after(today, 10))
            .with_duration(3)
            .with_description("Three days of folk music on two stages")
            .with_location("Riverside Park")
            .with_region(REGION_NORTH)
            .with_event_type(TYPE_MUSIC),
    );

    events.push(
        with_hours(
            Event::new("Library Open Day", days_after(today, 21)),
            9,
            12,
        )
        .with_location("Central Library")
        .with_region(REGION_CENTRAL)
        .with_event_type(TYPE_COMMUNITY),
    );

    let park_run_start = days_after(today, 1);
    events.push(
        with_hours(
            Event::recurring(
                "Park Run",
                park_run_start,
                Recurrence::Daily { interval: 7 },
            ),
            8,
            9,
        )
        .with_description("Free timed 5k, all paces welcome")
        .with_location("Riverside Park")
        .with_region(REGION_NORTH)
        .with_event_type(TYPE_COMMUNITY)
        .with_exception(days_after(park_run_start, 14)),
    );

    events.push(
        with_hours(
            Event::recurring(
                "Jazz Evening",
                today,
                Recurrence::Weekly {
                    interval: 2,
                    weekdays: [Weekday::Wed, Weekday::Fri].into(),
                },
            ),
            19,
            22,
        )
        .with_description("Live jazz in the courtyard bar")
        .with_location("The Old Mill")
        .with_region(REGION_CENTRAL)
        .with_event_type(TYPE_MUSIC),
    );

    let month_start = today.with_day(1).unwrap_or(today);
    events.push(
        with_hours(
            Event::recurring(
                "Farmers Market",
                month_start,
                Recurrence::Monthly {
                    interval: 1,
                    mode: Some(MonthlyMode::DaysOfMonth {
                        days: [1, 15].into(),
                    }),
                },
            ),
            8,
            13,
        )
        .with_location("Market Hall")
        .with_region(REGION_CENTRAL)
        .with_event_type(TYPE_MARKET),
    );

    events.push(
        with_hours(
            Event::recurring(
                "Community Council",
                month_start,
                Recurrence::Monthly {
                    interval: 1,
                    mode: Some(MonthlyMode::WeekdayIndex {
                        index: WeekdayIndex::Second,
                        weekday: Weekday::Wed,
                    }),
                },
            ),
            18,
            20,
        )
        .with_description("Open meeting, residents welcome")
        .with_location("Council Chambers")
        .with_region(REGION_NORTH)
        .with_event_type(TYPE_COMMUNITY)
        .with_last_start_date(days_after(month_start, 365)),
    );

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event_list::build_event_list;
    use crate::calendar::operations::{validate_event_template, validate_rule};
    use crate::storage::DateRange;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 11, 14).unwrap()
    }

    #[test]
    fn test_seed_events_are_valid() {
        for event in generate_seed_events(today()) {
            assert!(validate_event_template(&event.template).is_ok(), "{}", event.title());
            if let Some(rule) = event.rule() {
                assert!(validate_rule(&rule).is_ok(), "{}", event.title());
            }
        }
    }

    #[test]
    fn test_seed_events_mix() {
        let events = generate_seed_events(today());
        let recurring = events.iter().filter(|event| event.is_recurring()).count();

        assert_eq!(events.len(), 7);
        assert_eq!(recurring, 4);
        assert!(events.iter().any(|event| !event.exception_dates.is_empty()));
    }

    #[test]
    fn test_seed_events_produce_occurrences() {
        let events = generate_seed_events(today());
        let standard: Vec<_> = events
            .iter()
            .filter(|event| !event.is_recurring())
            .map(|event| event.template.clone())
            .collect();
        let recurring: Vec<_> = events.iter().filter_map(Event::recurring_event).collect();
        let month = DateRange::month(2018, 11).unwrap();

        let list = build_event_list(month, &standard, &recurring);

        assert!(list.iter().any(|o| o.title == "Community Council"));
        assert!(list.iter().any(|o| o.title == "Jazz Evening"));
        // The cancelled park run is not listed.
        let cancelled = NaiveDate::from_ymd_opt(2018, 11, 29).unwrap();
        assert!(!list
            .iter()
            .any(|o| o.title == "Park Run" && o.start_date == cancelled));
    }
}
