//! HTTP API handlers for synap-directory

pub mod auth;
pub mod bookmarks;
pub mod catalog;
pub mod health;
pub mod markdown;
pub mod metadata;
pub mod sidebar;
pub mod tags;
pub mod ui;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::AppState;

pub use auth::{auth_routes, require_admin, CurrentUser};
pub use health::health_routes;

/// Read endpoints and community submissions
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(catalog::get_categories))
        .route("/api/resource-types", get(catalog::get_resource_types))
        .route("/api/sidebar", get(sidebar::get_sidebar))
        .route("/api/tags", get(tags::get_tags))
        .route(
            "/api/markdown-posts",
            get(markdown::list_posts).post(markdown::create_post),
        )
        .route("/api/markdown-posts/:id", get(markdown::get_post))
        .route("/static/synap.css", get(ui::serve_css))
}

/// Catalog management endpoints (admin session required)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/metadata", post(metadata::fetch_metadata))
        .route(
            "/api/bookmarks",
            get(bookmarks::get_bookmarks).post(bookmarks::create_bookmark),
        )
        .route("/api/bookmarks/:id", delete(bookmarks::delete_bookmark))
        .route("/api/bookmarks/:id/tags", put(bookmarks::put_bookmark_tags))
        .route("/api/categories", post(catalog::create_category))
        .route("/api/categories/:id", delete(catalog::delete_category))
        .route("/api/sidebar/sections", post(sidebar::create_section))
        .route("/api/sidebar/sections/:id", delete(sidebar::delete_section))
        .route("/api/tags", post(tags::create_tag))
        .route("/api/tags/:id", delete(tags::delete_tag))
        .route(
            "/api/uploads",
            post(uploads::upload_image)
                .layer(DefaultBodyLimit::max(uploads::REQUEST_BODY_LIMIT_BYTES)),
        )
}
