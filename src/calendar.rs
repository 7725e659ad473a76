use chrono::NaiveDate;

use crate::models::{CalendarEvent, CalendarView, ClassEvent};
use crate::registry::Registry;

const ISO_LOCAL: &str = "%Y-%m-%dT%H:%M:%S";

/// Project normalized events into the calendar widget's event shape. Events
/// missing either timestamp are skipped outright; the widget crashes on null
/// start or end fields, so they must never reach it.
pub fn project(events: &[ClassEvent], registry: &Registry) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter_map(|event| {
            let (start, end) = (event.start_time?, event.end_time?);
            Some(CalendarEvent {
                title: event.title.clone(),
                start: start.format(ISO_LOCAL).to_string(),
                end: end.format(ISO_LOCAL).to_string(),
                color: registry.color(&event.location).to_string(),
                resource_id: registry.resource_id(&event.location),
            })
        })
        .collect()
}

/// Assemble the full calendar payload: initial anchor date, one resource
/// lane per registered location, and the projected events.
pub fn view(events: &[ClassEvent], anchor: NaiveDate, registry: &Registry) -> CalendarView {
    CalendarView {
        initial_date: anchor,
        resources: registry.calendar_resources(),
        events: project(events, registry),
    }
}
