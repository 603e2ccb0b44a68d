//! fablier-web - companion web service for webnovel reading progress,
//! channel sync, and reader gamification
//!
//! Every route is a thin handler: validate input, call the db/services
//! layer, serialize to the `{success, data}` envelope.

use sqlx::SqlitePool;
use std::sync::Arc;

pub mod api;
pub mod db;
pub mod error;
pub mod platform;
pub mod services;

pub use error::{ApiError, ApiResult};
pub use platform::PlatformClients;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Video-platform clients used by channel sync
    pub platforms: Arc<PlatformClients>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, platforms: PlatformClients) -> Self {
        Self {
            db,
            platforms: Arc::new(platforms),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    axum::Router::new()
        // Progression & rewards cascade
        .route("/api/progression", post(api::progression::update_progress))
        .route(
            "/api/points",
            post(api::points::grant_points).get(api::points::query_points),
        )
        .route("/api/wiki/debloquer", post(api::wiki::unlock_wiki))
        .route("/api/wiki/:histoire_id", get(api::wiki::list_wiki_content))
        // Stories and chapters
        .route(
            "/api/histoires",
            get(api::histoires::list_stories).post(api::histoires::create_story),
        )
        .route(
            "/api/histoires/:id",
            get(api::histoires::get_story)
                .put(api::histoires::update_story)
                .delete(api::histoires::delete_story),
        )
        .route(
            "/api/histoires/:id/chapitres",
            get(api::histoires::list_chapters).post(api::histoires::create_chapter),
        )
        // Readers
        .route("/api/utilisateurs", post(api::utilisateurs::create_user))
        .route("/api/utilisateurs/:id", get(api::utilisateurs::get_user))
        // Channel sync
        .route("/api/chaines", get(api::chaines::list_channels))
        .route("/api/chaines/sync", post(api::chaines::sync_channels))
        .route(
            "/api/chaines/:id/videos",
            get(api::chaines::list_channel_videos),
        )
        // Votes and planning
        .route(
            "/api/votes",
            get(api::votes::poll_results).post(api::votes::cast_vote),
        )
        .route(
            "/api/planning",
            get(api::planning::list_planning).post(api::planning::create_entry),
        )
        // Debug / monitoring
        .route("/api/debug/tables", get(api::debug::list_tables))
        .route("/health", get(api::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
