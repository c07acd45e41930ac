//! Event listing handlers.
//!
//! Date windows are resolved here, the store is read through the repository
//! trait and the list itself is built by `eventide_core`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use eventide_core::calendar::{
    build_day_list, get_event_list, latest_occurrence, month_options, occurrence_at,
    CalendarView, DayOccurrences, Event, MonthOption, Occurrence, ViewKind,
};
use eventide_core::serde::{
    deserialize_id_list, deserialize_optional_date, deserialize_optional_string,
};
use eventide_core::storage::{DateRange, EventQuery, RepositoryError};

use crate::{handlers::AppError, state::AppState};

/// Keyword and taxonomy filters shared by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    /// Comma-separated region ids.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub regions: Vec<u64>,
    /// Comma-separated event-type ids.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub types: Vec<u64>,
}

/// Query parameters for listing events.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Window start (YYYY-MM-DD, default: today)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD, default: start plus the default listing months)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end: Option<NaiveDate>,
    #[serde(flatten)]
    pub filters: FilterQuery,
}

/// Query parameters for looking up a single occurrence.
#[derive(Debug, Deserialize)]
pub struct OccurrenceAtQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct JumpLinkResponse {
    pub title: &'static str,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct JumpLinksResponse {
    pub previous: JumpLinkResponse,
    pub next: JumpLinkResponse,
}

/// Response of the `show` endpoints.
#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub view: ViewKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub header: String,
    pub jump_links: Option<JumpLinksResponse>,
    pub events: Vec<Occurrence>,
    pub days: Vec<DayOccurrences>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn event_query(range: DateRange, filters: FilterQuery) -> EventQuery {
    let query = EventQuery::new(range)
        .with_regions(filters.regions)
        .with_event_types(filters.types);
    match filters.keyword {
        Some(keyword) => query.with_keyword(keyword),
        None => query,
    }
}

/// List occurrences in a window (GET /api/events).
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<Occurrence>>, AppError> {
    let start = query.start.unwrap_or_else(today);
    let end = query
        .end
        .unwrap_or_else(|| DateRange::months_from(start, state.config.default_future_months).end);
    let range = DateRange::new(start, end)?.limited_to(state.config.max_window_days)?;

    let event_query = event_query(range, query.filters);
    let occurrences = get_event_list(state.event_repo.as_ref(), &event_query).await?;

    tracing::debug!(
        start = %range.start,
        end = %range.end,
        occurrences = occurrences.len(),
        "listed events"
    );

    Ok(Json(occurrences))
}

/// Default listing (GET /api/events/show).
pub async fn show_default(
    State(state): State<AppState>,
    Query(filters): Query<FilterQuery>,
) -> Result<Json<ShowResponse>, AppError> {
    show_impl(&state, None, None, filters).await
}

/// Keyword, month or day listing (GET /api/events/show/{id}).
pub async fn show_single(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(filters): Query<FilterQuery>,
) -> Result<Json<ShowResponse>, AppError> {
    show_impl(&state, Some(id.as_str()), None, filters).await
}

/// Range listing (GET /api/events/show/{id}/{other}).
pub async fn show_range(
    State(state): State<AppState>,
    Path((id, other)): Path<(String, String)>,
    Query(filters): Query<FilterQuery>,
) -> Result<Json<ShowResponse>, AppError> {
    show_impl(&state, Some(id.as_str()), Some(other.as_str()), filters).await
}

async fn show_impl(
    state: &AppState,
    id: Option<&str>,
    other: Option<&str>,
    filters: FilterQuery,
) -> Result<Json<ShowResponse>, AppError> {
    let view = CalendarView::resolve(id, other, today(), state.config.default_future_months)?;
    let range = view.range.limited_to(state.config.max_window_days)?;

    let event_query = event_query(range, filters);
    let events = get_event_list(state.event_repo.as_ref(), &event_query).await?;

    let jump_links = view.jump_links().map(|links| JumpLinksResponse {
        previous: JumpLinkResponse {
            title: links.previous.title,
            href: format!("/api/events/show/{}", links.previous.path()),
        },
        next: JumpLinkResponse {
            title: links.next.title,
            href: format!("/api/events/show/{}", links.next.path()),
        },
    });

    Ok(Json(ShowResponse {
        view: view.kind,
        start: range.start,
        end: range.end,
        header: view.header(&state.config.default_header),
        jump_links,
        days: build_day_list(events.clone()),
        events,
    }))
}

/// Months offered by the month picker (GET /api/events/months).
pub async fn list_months() -> Json<Vec<MonthOption>> {
    Json(month_options(today()))
}

async fn find_event(state: &AppState, event_id: Uuid) -> Result<Event, AppError> {
    state
        .event_repo
        .get_event(event_id)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound {
                entity_type: "Event",
                id: event_id.to_string(),
            }
            .into()
        })
}

/// Get a stored event (GET /api/events/{event_id}).
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(find_event(&state, event_id).await?))
}

/// The occurrence to show for an event from today on (GET /api/events/{event_id}/next).
pub async fn next_event_occurrence(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Occurrence>, AppError> {
    let event = find_event(&state, event_id).await?;
    Ok(Json(latest_occurrence(&event, today())))
}

/// The occurrence of an event on a given date (GET /api/events/{event_id}/at?date=).
pub async fn event_occurrence_at(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<OccurrenceAtQuery>,
) -> Result<Json<Occurrence>, AppError> {
    let event = find_event(&state, event_id).await?;
    Ok(Json(occurrence_at(&event, query.date)))
}
