//! synap-directory library
//!
//! Curated directory of links, articles and markdown posts. Public pages and
//! read endpoints are open; catalog management sits behind an admin session.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod pages;
pub mod pagination;
pub mod services;

pub use error::{ApiError, ApiResult};

use services::{ImageHost, MetadataScraper};
use synap_common::config::MAX_SESSION_TTL_HOURS;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Image host; `None` when no credentials are configured
    pub image_host: Option<Arc<dyn ImageHost>>,
    /// Page fetcher for bookmark metadata
    pub scraper: Arc<MetadataScraper>,
    /// Lifetime of new admin sessions
    pub session_ttl_hours: i64,
}

impl AppState {
    /// Create new application state
    ///
    /// `session_ttl_hours` is clamped to `1..=MAX_SESSION_TTL_HOURS`.
    pub fn new(
        db: SqlitePool,
        image_host: Option<Arc<dyn ImageHost>>,
        scraper: MetadataScraper,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            db,
            image_host,
            scraper: Arc::new(scraper),
            session_ttl_hours: session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS),
        }
    }
}

/// Build application router
///
/// Admin API routes require an admin session; everything else is public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    // Protected routes (require an admin session)
    let admin = api::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        api::require_admin,
    ));

    // Public routes (no authentication)
    let public = Router::new()
        .merge(api::public_routes())
        .merge(api::auth_routes())
        .merge(api::health_routes())
        .merge(pages::page_routes());

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
