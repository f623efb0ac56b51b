//! Server-rendered HTML pages

pub mod admin;
pub mod layout;
pub mod public;

use axum::{routing::get, Router};

use crate::AppState;

/// Build page routes
///
/// `/:slug` is the catch-all section page; static paths take priority.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::explore_page))
        .route("/md", get(public::markdown_list_page))
        .route("/md/:id", get(public::markdown_detail_page))
        .route("/prompts", get(public::prompts_page))
        .route("/submit", get(public::submit_page))
        .route("/admin", get(admin::sign_in_page))
        .route("/admin/dashboard", get(admin::dashboard_page))
        .route("/:slug", get(public::section_page))
}
