use thiserror::Error;

/// Errors that can occur when validating an event or its template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Last start date must be after or equal to start date")]
    InvalidDateRange,
    #[error("End time must be after start time")]
    InvalidTimeRange,
    #[error("Duration must be at least one day")]
    ZeroDuration,
}

/// Errors reported when a recurrence rule cannot produce occurrences.
///
/// The evaluator never raises these; they are only used to warn at ingest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Recurring event has no start date")]
    MissingAnchor,
    #[error("Recurrence interval must be at least 1")]
    ZeroInterval,
    #[error("Weekly recurrence needs at least one weekday")]
    NoWeekdays,
    #[error("Monthly recurrence needs at least one day of the month")]
    NoDaysOfMonth,
    #[error("Day of month out of range (1-31): {0}")]
    DayOfMonthOutOfRange(u32),
    #[error("Monthly recurrence needs either days of the month or a weekday index")]
    MissingMonthlyMode,
}

/// Errors raised while resolving the requested calendar view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("End date must be after or equal to start date")]
    InvalidRange,
}
