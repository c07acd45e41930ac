use chrono::NaiveDate;

use super::error::{EventError, RuleError};
use super::evaluator::is_occurrence;
use super::expander::next_occurrence;
use super::recurrence::{MonthlyMode, Recurrence, RecurrenceRule};
use super::types::{Event, EventTemplate, Occurrence, RecurringEvent};
use crate::storage::{DateRange, EventQuery};

const MAX_TITLE_LEN: usize = 200;

/// Returns true if a standard event's template overlaps the given bounds.
///
/// A missing last start date is treated as the start date. With only one
/// bound, the template just has to reach past it.
pub fn template_overlaps(
    template: &EventTemplate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    let first = template.start_date;
    let last = template.last_date();

    match (start, end) {
        (Some(start), Some(end)) => {
            (first <= start && last >= end)
                || (start <= first && first <= end)
                || (start <= last && last <= end)
        }
        (Some(start), None) => first >= start || last > start,
        (None, Some(end)) => last <= end || first < end,
        (None, None) => true,
    }
}

/// Returns true if a series may produce occurrences inside `range`.
pub fn recurring_in_window(template: &EventTemplate, range: DateRange) -> bool {
    template.start_date <= range.end
        && template
            .last_start_date
            .is_none_or(|last| last >= range.start)
}

/// Returns true if any word of `keyword` appears in the event's title or
/// description, ignoring case. A missing or blank keyword matches everything.
pub fn matches_keyword(event: &Event, keyword: Option<&str>) -> bool {
    let Some(keyword) = keyword else {
        return true;
    };
    let words: Vec<String> = keyword.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return true;
    }

    let title = event.title().to_lowercase();
    let description = event
        .description
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    words
        .iter()
        .any(|word| title.contains(word.as_str()) || description.contains(word.as_str()))
}

/// Returns true if the event's region and type are among the requested ones.
/// An empty filter matches every event.
pub fn matches_taxonomy(event: &Event, region_ids: &[u64], event_type_ids: &[u64]) -> bool {
    let in_set = |ids: &[u64], value: Option<u64>| {
        ids.is_empty() || value.is_some_and(|value| ids.contains(&value))
    };

    in_set(region_ids, event.region_id) && in_set(event_type_ids, event.event_type_id)
}

/// Keyword and taxonomy filters of a query applied at the owner level.
pub fn matches_query(event: &Event, query: &EventQuery) -> bool {
    matches_keyword(event, query.keyword.as_deref())
        && matches_taxonomy(event, &query.region_ids, &query.event_type_ids)
}

/// Filters standard events overlapping the query window.
pub fn filter_standard_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    query: &EventQuery,
) -> Vec<EventTemplate> {
    events
        .into_iter()
        .filter(|event| !event.is_recurring())
        .filter(|event| {
            template_overlaps(
                &event.template,
                Some(query.range.start),
                Some(query.range.end),
            )
        })
        .filter(|event| matches_query(event, query))
        .map(|event| event.template.clone())
        .collect()
}

/// Filters series that may occur inside the query window.
pub fn filter_recurring_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    query: &EventQuery,
) -> Vec<RecurringEvent> {
    events
        .into_iter()
        .filter(|event| recurring_in_window(&event.template, query.range))
        .filter(|event| matches_query(event, query))
        .filter_map(Event::recurring_event)
        .collect()
}

/// Validates an event template before it is stored.
pub fn validate_event_template(template: &EventTemplate) -> Result<(), EventError> {
    if template.title.trim().is_empty() {
        return Err(EventError::EmptyTitle);
    }
    if template.title.len() > MAX_TITLE_LEN {
        return Err(EventError::TitleTooLong);
    }
    if template
        .last_start_date
        .is_some_and(|last| last < template.start_date)
    {
        return Err(EventError::InvalidDateRange);
    }
    if let (Some(start), Some(end)) = (template.start_time, template.end_time) {
        if end <= start {
            return Err(EventError::InvalidTimeRange);
        }
    }
    if template.duration == 0 {
        return Err(EventError::ZeroDuration);
    }
    Ok(())
}

/// Reports rules that can never produce an occurrence.
///
/// Evaluation stays total whatever this returns.
pub fn validate_rule(rule: &RecurrenceRule) -> Result<(), RuleError> {
    if rule.anchor_date.is_none() && rule.recurrence.is_recurring() {
        return Err(RuleError::MissingAnchor);
    }

    match &rule.recurrence {
        Recurrence::None => Ok(()),
        Recurrence::Daily { interval } => check_interval(*interval),
        Recurrence::Weekly { interval, weekdays } => {
            check_interval(*interval)?;
            if weekdays.is_empty() {
                return Err(RuleError::NoWeekdays);
            }
            Ok(())
        }
        Recurrence::Monthly { interval, mode } => {
            check_interval(*interval)?;
            match mode {
                None => Err(RuleError::MissingMonthlyMode),
                Some(MonthlyMode::DaysOfMonth { days }) => {
                    if days.is_empty() {
                        return Err(RuleError::NoDaysOfMonth);
                    }
                    match days.iter().find(|day| !(1..=31).contains(*day)) {
                        Some(day) => Err(RuleError::DayOfMonthOutOfRange(*day)),
                        None => Ok(()),
                    }
                }
                Some(MonthlyMode::WeekdayIndex { .. }) => Ok(()),
            }
        }
    }
}

fn check_interval(interval: u32) -> Result<(), RuleError> {
    if interval == 0 {
        return Err(RuleError::ZeroInterval);
    }
    Ok(())
}

/// Returns true once the template's last start date has passed.
pub fn is_expired(template: &EventTemplate, today: NaiveDate) -> bool {
    template.last_date() < today
}

/// Returns true once every day of the occurrence is in the past.
pub fn is_finished(occurrence: &Occurrence, today: NaiveDate) -> bool {
    occurrence.finish_date < today
}

/// The occurrence of `event` on `date`.
///
/// For a series that fires on `date` this is a materialized occurrence;
/// otherwise it is the template itself.
pub fn occurrence_at(event: &Event, date: NaiveDate) -> Occurrence {
    match event.rule() {
        Some(rule) if !rule.has_ended_before(date) && is_occurrence(&rule, date) => {
            Occurrence::recurring(&event.template, date, 1)
        }
        _ => Occurrence::from_template(&event.template),
    }
}

/// The occurrence to show for `event` as of `today`.
///
/// Series resolve to their next occurrence within the display horizon and
/// fall back to the template when none is found.
pub fn latest_occurrence(event: &Event, today: NaiveDate) -> Occurrence {
    event
        .rule()
        .and_then(|rule| next_occurrence(&rule, today))
        .map(|date| Occurrence::recurring(&event.template, date, 1))
        .unwrap_or_else(|| Occurrence::from_template(&event.template))
}
