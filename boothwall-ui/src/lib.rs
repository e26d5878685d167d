//! boothwall-ui library - photo-booth coordinator service
//!
//! Sits between the capture application (webhook callbacks on /hook) and the
//! display front-end (session polling plus the 3-slot photo ring buffer).

use axum::Router;
use boothwall_common::config::BoothConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub mod api;
pub mod error;
pub mod launcher;
pub mod session;
pub mod slots;

use launcher::ScriptLauncher;
use session::SessionTracker;
use slots::SlotRing;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: Arc<BoothConfig>,
    /// Lifecycle of the single current capture session
    pub sessions: Arc<SessionTracker>,
    /// Three-slot display ring buffer
    pub slots: Arc<SlotRing>,
}

impl AppState {
    /// Create application state; the session tracker gets the script
    /// launcher capability, the slot ring its photos directory.
    pub fn new(config: BoothConfig) -> Self {
        let launcher = Arc::new(ScriptLauncher::from_config(&config));
        let slots = Arc::new(SlotRing::new(config.photos_dir()));
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionTracker::new(launcher)),
            slots,
        }
    }
}

/// Build application router
///
/// Published photos are served from `/static`; the permissive CORS layer
/// lets the display SPA poll from any origin.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let static_dir = state.config.static_dir();

    Router::new()
        .route("/session/start", post(api::start_session))
        .route("/session/reset", post(api::reset_session))
        .route("/session/status", get(api::session_status))
        .route("/session/asset", get(api::session_asset))
        .route("/api/slot/:slot_id", get(api::slot_state))
        .route("/api/photos/new", post(api::new_photo))
        .route("/hook", get(api::hook))
        .merge(api::health_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
