use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use reportbot_activity::ActivityMonitor;
use reportbot_agent::ReportAgent;
use reportbot_core::config::ReportbotConfig;
use reportbot_scheduler::Scheduler;

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ReportbotConfig,
    pub scheduler: Arc<Scheduler>,
    pub activity: ActivityMonitor,
    pub agent: Arc<ReportAgent>,
}

impl AppState {
    pub fn new(
        config: ReportbotConfig,
        scheduler: Arc<Scheduler>,
        activity: ActivityMonitor,
        agent: Arc<ReportAgent>,
    ) -> Self {
        Self {
            config,
            scheduler,
            activity,
            agent,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/schedules",
            get(crate::http::schedules::list_schedules).post(crate::http::schedules::create_schedule),
        )
        .route(
            "/schedules/{id}",
            delete(crate::http::schedules::delete_schedule),
        )
        .route(
            "/schedules/{id}/toggle",
            patch(crate::http::schedules::toggle_schedule),
        )
        .route(
            "/activity/summary",
            get(crate::http::activity::activity_summary),
        )
        .route(
            "/activity/status",
            get(crate::http::activity::activity_status),
        )
        .route("/activity/start", post(crate::http::activity::start_monitoring))
        .route("/activity/stop", post(crate::http::activity::stop_monitoring))
        .route("/generate/report", post(crate::http::generate::generate_report))
        .route("/templates", get(crate::http::templates::list_templates))
        .route(
            "/templates/{name}",
            delete(crate::http::templates::delete_template),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // browser frontends talk to the gateway cross-origin
        .layer(tower_http::cors::CorsLayer::permissive())
}
