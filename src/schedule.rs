use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{ClassEvent, MonthLabel, RawScheduleRow};
use crate::registry::Registry;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("unknown language {0:?}")]
    UnknownLanguage(String),
}

static YMD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})").expect("regex compiles"));
static MDY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").expect("regex compiles"));

/// The sheet's `date` cell is either a bare day-of-month (sometimes exported
/// as "15.0") or a full date in Y/M/D or M/D/Y order. Whatever the form, the
/// result is a structured date anchored to the worksheet's month; no string
/// reassembly happens downstream of this.
fn parse_event_date(cell: &str, month: MonthLabel) -> Option<NaiveDate> {
    let cell = cell.trim();
    if let Some(caps) = YMD_RE.captures(cell) {
        let (y, m, d) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        return NaiveDate::from_ymd_opt(y, m, d);
    }
    if let Some(caps) = MDY_RE.captures(cell) {
        let (m, d, y) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        return NaiveDate::from_ymd_opt(y, m, d);
    }
    let day = cell.parse::<f64>().ok().filter(|v| v.fract() == 0.0)? as u32;
    NaiveDate::from_ymd_opt(month.year, month.month, day)
}

const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M:%S", "%H:%M"];

fn parse_time(cell: &str) -> Option<NaiveTime> {
    let cell = cell.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(cell, fmt).ok())
}

fn combine(date: Option<NaiveDate>, time_cell: Option<&str>) -> Option<NaiveDateTime> {
    Some(NaiveDateTime::new(date?, parse_time(time_cell?)?))
}

fn non_blank(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Turn one month's raw worksheet rows into typed [`ClassEvent`]s.
///
/// Rows without a date and cancelled rows are dropped; series-based rows are
/// dropped unless `include_series`. Malformed date or time cells degrade to
/// `None` fields instead of losing the row, and the weekday is always
/// recomputed from the derived date, never taken from the sheet's own "day"
/// column. Output order matches input order.
pub fn normalize_rows(
    rows: &[RawScheduleRow],
    month: MonthLabel,
    include_series: bool,
) -> Vec<ClassEvent> {
    let mut events = Vec::new();
    for row in rows {
        let Some(date_cell) = non_blank(row.date.as_deref()) else {
            continue;
        };
        if row.is_cancelled() {
            continue;
        }
        if !include_series && row.is_series() {
            continue;
        }

        let date = parse_event_date(&date_cell, month);
        if date.is_none() {
            tracing::warn!(month = %month, cell = %date_cell, "unparseable date cell");
        }
        events.push(ClassEvent {
            date,
            start_time: combine(date, row.start_time.as_deref()),
            end_time: combine(date, row.end_time.as_deref()),
            day_of_week: date.map(|d| d.format("%A").to_string()),
            title: non_blank(row.class.as_deref()).unwrap_or_default(),
            location: non_blank(row.location.as_deref()).unwrap_or_default(),
            language: non_blank(row.lang.as_deref()).unwrap_or_default(),
            registration_link: non_blank(row.registration_link.as_deref()),
        });
    }
    events
}

/// Clear registration links for classes that have already started. `now` is
/// sampled once per pipeline run so every event sees the same cutoff. A null
/// start time keeps its link: a parse failure must not suppress registration.
pub fn expire_links(mut events: Vec<ClassEvent>, now: NaiveDateTime) -> Vec<ClassEvent> {
    for event in &mut events {
        if event.start_time.is_some_and(|start| start < now) {
            event.registration_link = None;
        }
    }
    events
}

fn sort_by_date(events: &mut [ClassEvent]) {
    // Stable, so same-day classes keep their sheet order
    events.sort_by_key(|e| e.date);
}

/// Keep events at one of the allowed locations, sorted ascending by date.
/// An empty allow-list means "show nothing", not "no filter".
pub fn by_location(mut events: Vec<ClassEvent>, allowed: &[String]) -> Vec<ClassEvent> {
    events.retain(|e| allowed.iter().any(|loc| *loc == e.location));
    sort_by_date(&mut events);
    events
}

/// Keep events in one of the requested languages, given by display name and
/// resolved back to codes through the registry. A display name the registry
/// does not know is a caller bug and fails the whole call.
pub fn by_language(
    mut events: Vec<ClassEvent>,
    display_names: &[String],
    registry: &Registry,
) -> Result<Vec<ClassEvent>, ScheduleError> {
    let codes = display_names
        .iter()
        .map(|name| {
            registry
                .language_code(name)
                .map(str::to_string)
                .ok_or_else(|| ScheduleError::UnknownLanguage(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    events.retain(|e| codes.iter().any(|code| *code == e.language));
    sort_by_date(&mut events);
    Ok(events)
}

/// Combine independently normalized months into one ascending timeline.
pub fn merge_months(batches: Vec<Vec<ClassEvent>>) -> Vec<ClassEvent> {
    let mut all: Vec<ClassEvent> = batches.into_iter().flatten().collect();
    sort_by_date(&mut all);
    all
}
