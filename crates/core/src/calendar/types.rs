use std::collections::BTreeSet;
use std::fmt;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::recurrence::{Recurrence, RecurrenceRule};

fn default_duration() -> u32 {
    1
}

/// The schedule row of an event: when it starts, how long it lasts and,
/// for series, the last date it may start on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub id: Uuid,
    /// The event this template belongs to.
    pub event_id: Uuid,
    pub title: String,
    pub start_date: NaiveDate,
    /// For recurring events, the series end date.
    #[serde(default)]
    pub last_start_date: Option<NaiveDate>,
    /// Length in days; 1 for single-day events.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(
        default,
        deserialize_with = "crate::serde::deserialize_optional_time"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(
        default,
        deserialize_with = "crate::serde::deserialize_optional_time"
    )]
    pub end_time: Option<NaiveTime>,
}

impl EventTemplate {
    /// Creates a single-day, all-day template.
    pub fn new(event_id: Uuid, title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            title: title.into(),
            start_date,
            last_start_date: None,
            duration: 1,
            start_time: None,
            end_time: None,
        }
    }

    /// The last date this template covers, falling back to the start date.
    pub fn last_date(&self) -> NaiveDate {
        self.last_start_date.unwrap_or(self.start_date)
    }
}

/// An event record as stored in the event store.
///
/// An event with `Recurrence::None` is a standard event; anything else is a
/// series whose anchor is the template's start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Region taxonomy term.
    pub region_id: Option<u64>,
    /// Event-type taxonomy term.
    pub event_type_id: Option<u64>,
    pub template: EventTemplate,
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Dates on which a series is cancelled.
    #[serde(default)]
    pub exception_dates: BTreeSet<NaiveDate>,
}

impl Event {
    /// Creates a new standard (non-recurring) event.
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            description: None,
            location: None,
            region_id: None,
            event_type_id: None,
            template: EventTemplate::new(id, title, start_date),
            recurrence: Recurrence::None,
            exception_dates: BTreeSet::new(),
        }
    }

    /// Creates a new series anchored at `start_date`.
    pub fn recurring(
        title: impl Into<String>,
        start_date: NaiveDate,
        recurrence: Recurrence,
    ) -> Self {
        Self::new(title, start_date).with_recurrence(recurrence)
    }

    pub fn title(&self) -> &str {
        &self.template.title
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// The rule derived from this event, if it repeats.
    pub fn rule(&self) -> Option<RecurrenceRule> {
        if !self.is_recurring() {
            return None;
        }
        Some(RecurrenceRule {
            recurrence: self.recurrence.clone(),
            anchor_date: Some(self.template.start_date),
            end_date: self.template.last_start_date,
            exception_dates: self.exception_dates.clone(),
        })
    }

    /// Projects this event into the shape the event-list builder consumes.
    pub fn recurring_event(&self) -> Option<RecurringEvent> {
        self.rule().map(|rule| RecurringEvent {
            rule,
            template: self.template.clone(),
        })
    }

    /// Sets the recurrence pattern.
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Sets the description for this event.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location for this event.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_region(mut self, region_id: u64) -> Self {
        self.region_id = Some(region_id);
        self
    }

    pub fn with_event_type(mut self, event_type_id: u64) -> Self {
        self.event_type_id = Some(event_type_id);
        self
    }

    /// Sets the last start date (the series end date for recurring events).
    pub fn with_last_start_date(mut self, date: NaiveDate) -> Self {
        self.template.last_start_date = Some(date);
        self
    }

    /// Sets the duration in days.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.template.duration = days;
        self
    }

    /// Sets the start and end times.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.template.start_time = Some(start);
        self.template.end_time = Some(end);
        self
    }

    /// Cancels the series on `date`.
    pub fn with_exception(mut self, date: NaiveDate) -> Self {
        self.exception_dates.insert(date);
        self
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self.template.event_id = id;
        self
    }
}

/// A series as handed to the event-list builder: its rule plus the template
/// every occurrence copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringEvent {
    pub rule: RecurrenceRule,
    pub template: EventTemplate,
}

/// Identifies an occurrence within one rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceId {
    /// A standard event, identified by its template.
    Template(Uuid),
    /// A materialized occurrence of a series; unique within one list only.
    Recurring(u64),
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceId::Template(id) => write!(f, "{id}"),
            OccurrenceId::Recurring(n) => write!(f, "recurring-{n}"),
        }
    }
}

impl Serialize for OccurrenceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One dated appearance of an event, built fresh for every list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub source_event_id: Uuid,
    pub template_id: Uuid,
    pub title: String,
    pub start_date: NaiveDate,
    /// Last day this occurrence covers (equal to `start_date` for one-day events).
    pub finish_date: NaiveDate,
    pub duration: u32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub last_start_date: Option<NaiveDate>,
}

impl Occurrence {
    /// The template itself as an occurrence.
    pub fn from_template(template: &EventTemplate) -> Self {
        Self::copy(template, OccurrenceId::Template(template.id), template.start_date)
    }

    /// A materialized occurrence of `template` on `date`.
    pub fn recurring(template: &EventTemplate, date: NaiveDate, id: u64) -> Self {
        Self::copy(template, OccurrenceId::Recurring(id), date)
    }

    fn copy(template: &EventTemplate, id: OccurrenceId, start_date: NaiveDate) -> Self {
        Self {
            id,
            source_event_id: template.event_id,
            template_id: template.id,
            title: template.title.clone(),
            start_date,
            finish_date: finish_date(start_date, template.duration),
            duration: template.duration,
            start_time: template.start_time,
            end_time: template.end_time,
            last_start_date: template.last_start_date,
        }
    }

    /// Sort key for display: date, then time with all-day first.
    pub fn schedule_key(&self) -> (NaiveDate, Option<NaiveTime>) {
        (self.start_date, self.start_time)
    }

    pub fn is_multi_day(&self) -> bool {
        self.duration > 1
    }
}

/// Last day covered by an event of `duration` days starting on `start`.
pub fn finish_date(start: NaiveDate, duration: u32) -> NaiveDate {
    if duration <= 1 {
        return start;
    }
    start
        .checked_add_days(Days::new(u64::from(duration - 1)))
        .unwrap_or(start)
}
