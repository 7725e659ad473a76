pub mod calendar;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod models;
pub mod months;
pub mod openapi;
pub mod registry;
pub mod schedule;
pub mod settings;
pub mod sheet;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use handlers::{get_calendar, get_ical, get_months, get_schedule, healthz_live, healthz_ready, root};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ical::ICalExporter;
use crate::openapi::ApiDoc;
use crate::registry::Registry;
use crate::settings::Settings;
use crate::sheet::SheetSource;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub registry: Arc<Registry>,
    pub source: Arc<SheetSource>,
    pub exporter: Arc<ICalExporter>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState {
        registry: Arc::new(Registry::nypl_default()),
        source: Arc::new(SheetSource::new(
            settings.sheet_base_url.clone(),
            Duration::from_secs(settings.cache_ttl_secs),
        )),
        exporter: Arc::new(ICalExporter::new()),
        settings,
    };

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Teaching Schedule API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/months", get(get_months))
        .route("/schedule", get(get_schedule))
        .route("/schedule.ics", get(get_ical))
        .route("/calendar", get(get_calendar))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
