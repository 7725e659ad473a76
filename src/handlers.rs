use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Local;
use futures::future::try_join_all;

use crate::{
    AppState,
    calendar,
    error::ApiError,
    models::{CalendarView, ClassEvent, MonthLabel},
    months,
    schedule,
    validation::{parse_months, split_selection, validate_locations},
};

#[derive(Debug, serde::Deserialize)]
pub struct ScheduleQuery {
    /// Comma-separated month labels, e.g. "2024 June,2024 July".
    pub months: String,
    /// Comma-separated location codes; absent means all registered locations.
    pub locations: Option<String>,
    /// Comma-separated language display names; absent means all languages.
    pub languages: Option<String>,
    #[serde(default)]
    pub include_series: bool,
}

#[utoipa::path(get, path = "/", tag = "schedule")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Teaching Schedule API",
        "endpoints": {
            "/months": "List selectable months",
            "/schedule": "Get filtered class events as JSON",
            "/schedule.ics": "Download filtered schedule as an iCal file",
            "/calendar": "Get the calendar view payload"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "schedule")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "schedule")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/months",
    responses(
        (status = 200, description = "Selectable month labels, newest first", body = [String])
    ),
    tag = "schedule"
)]
pub async fn get_months() -> impl IntoResponse {
    let today = Local::now().date_naive();
    Json(months::selectable_months(today))
}

/// Fetch the requested months concurrently and run the whole pipeline:
/// normalize, expire stale registration links, filter by location and
/// language, merged and sorted ascending by date. Any single month fetch
/// failing fails the batch.
async fn run_pipeline(
    state: &AppState,
    labels: &[MonthLabel],
    query: &ScheduleQuery,
) -> Result<Vec<ClassEvent>, ApiError> {
    let locations = match &query.locations {
        Some(raw) => {
            let codes = split_selection(raw);
            validate_locations(&codes, &state.registry)?;
            codes
        }
        None => state.registry.locations().to_vec(),
    };
    let languages = match &query.languages {
        Some(raw) => split_selection(raw),
        None => state.registry.language_names(),
    };

    let fetches = labels.iter().map(|label| state.source.fetch_rows(label));
    let batches = try_join_all(fetches).await?;

    let normalized = labels
        .iter()
        .zip(batches)
        .map(|(label, rows)| schedule::normalize_rows(&rows, *label, query.include_series))
        .collect();
    let events = schedule::merge_months(normalized);
    let events = schedule::expire_links(events, Local::now().naive_local());
    let events = schedule::by_location(events, &locations);
    let events = schedule::by_language(events, &languages, &state.registry)?;
    Ok(events)
}

#[utoipa::path(
    get,
    path = "/schedule",
    params(
        ("months" = String, Query, description = "Comma-separated month labels, e.g. \"2024 June\""),
        ("locations" = Option<String>, Query, description = "Comma-separated location codes (default: all)"),
        ("languages" = Option<String>, Query, description = "Comma-separated language display names (default: all)"),
        ("include_series" = Option<bool>, Query, description = "Include series-based classes")
    ),
    responses(
        (status = 200, description = "Filtered class events, ascending by date", body = [ClassEvent]),
        (status = 400, description = "Bad month label, location, or language"),
        (status = 404, description = "Worksheet not found for a requested month")
    ),
    tag = "schedule"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let labels = parse_months(&query.months)?;
    let events = run_pipeline(&state, &labels, &query).await?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/schedule.ics",
    params(
        ("months" = String, Query, description = "Comma-separated month labels"),
        ("locations" = Option<String>, Query, description = "Comma-separated location codes (default: all)"),
        ("languages" = Option<String>, Query, description = "Comma-separated language display names (default: all)"),
        ("include_series" = Option<bool>, Query, description = "Include series-based classes")
    ),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 400, description = "Bad month label, location, or language"),
        (status = 404, description = "Worksheet not found for a requested month")
    ),
    tag = "schedule"
)]
pub async fn get_ical(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let labels = parse_months(&query.months)?;
    let events = run_pipeline(&state, &labels, &query).await?;
    let body = state.exporter.generate(&events);
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            (
                "content-disposition",
                "attachment; filename=teaching_schedule.ics",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/calendar",
    params(
        ("months" = String, Query, description = "Comma-separated month labels; the first anchors the view"),
        ("locations" = Option<String>, Query, description = "Comma-separated location codes (default: all)"),
        ("languages" = Option<String>, Query, description = "Comma-separated language display names (default: all)"),
        ("include_series" = Option<bool>, Query, description = "Include series-based classes")
    ),
    responses(
        (status = 200, description = "Calendar view payload", body = CalendarView),
        (status = 400, description = "Bad month label, location, or language"),
        (status = 404, description = "Worksheet not found for a requested month")
    ),
    tag = "schedule"
)]
pub async fn get_calendar(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ScheduleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let labels = parse_months(&query.months)?;
    let events = run_pipeline(&state, &labels, &query).await?;

    let today = Local::now().date_naive();
    let anchor = months::calendar_anchor(labels[0], today);
    Ok(Json(calendar::view(&events, anchor, &state.registry)))
}
