use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        events::{
            event_occurrence_at, get_event, list_events, list_months, next_event_occurrence,
            show_default, show_range, show_single,
        },
        health::{healthz, livez},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // The API is read-only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/events", get(list_events))
        .route("/events/show", get(show_default))
        .route("/events/show/{id}", get(show_single))
        .route("/events/show/{id}/{other}", get(show_range))
        .route("/events/months", get(list_months))
        .route("/events/{event_id}", get(get_event))
        .route("/events/{event_id}/next", get(next_event_occurrence))
        .route("/events/{event_id}/at", get(event_occurrence_at))
        .layer(cors);

    let timeout = state.config.request_timeout();

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
