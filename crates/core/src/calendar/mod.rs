mod error;
mod evaluator;
mod event_list;
mod expander;
mod mock_data;
mod operations;
mod recurrence;
mod sorting;
mod types;
mod view;

pub use error::{EventError, RuleError, ViewError};
pub use evaluator::{is_occurrence, month_delta, week_start, weekday_in_month};
pub use event_list::{build_event_list, get_event_list, materialize, OccurrenceIds};
pub use expander::{expand, next_occurrence, Occurrences, DISPLAY_HORIZON_MONTHS};
pub use mock_data::generate_seed_events;
pub use operations::{
    filter_recurring_events, filter_standard_events, is_expired, is_finished, latest_occurrence,
    matches_keyword, matches_query, matches_taxonomy, occurrence_at, recurring_in_window,
    template_overlaps, validate_event_template, validate_rule,
};
pub use recurrence::{
    weekday_from_index, MonthlyMode, Recurrence, RecurrenceKind, RecurrenceRule, WeekdayIndex,
};
pub use sorting::{build_day_list, is_sorted_for_display, sort_occurrences, DayOccurrences};
pub use types::{finish_date, Event, EventTemplate, Occurrence, OccurrenceId, RecurringEvent};
pub use view::{
    month_options, CalendarView, JumpLink, JumpLinks, MonthOption, ViewKind,
    DEFAULT_FUTURE_MONTHS, DEFAULT_HEADER,
};
