use utoipa::OpenApi;

use crate::models::{CalendarEvent, CalendarResource, CalendarView, ClassEvent};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_months,
        crate::handlers::get_schedule,
        crate::handlers::get_ical,
        crate::handlers::get_calendar
    ),
    components(schemas(ClassEvent, CalendarEvent, CalendarResource, CalendarView)),
    tags(
        (name = "schedule", description = "Teaching schedule operations")
    ),
)]
pub struct ApiDoc;
