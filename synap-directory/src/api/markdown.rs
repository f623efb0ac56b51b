//! Markdown post endpoints
//!
//! Creation is open to the public (community submissions); the form is
//! posted URL-encoded from the submit page.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use synap_common::api::{ApiSuccess, CreatedId};
use tracing::info;

use crate::db::posts::{self, MarkdownPost, NewMarkdownPost};
use crate::services::render_markdown;
use crate::{ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownPostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sidebar_option: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Post with its rendered HTML
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPost {
    #[serde(flatten)]
    pub post: MarkdownPost,
    pub html: String,
}

/// GET /api/markdown-posts?q=
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ApiSuccess<Vec<MarkdownPost>>>> {
    let posts = posts::search_prompts(&state.db, &query.q).await?;
    Ok(Json(ApiSuccess::new(posts)))
}

/// GET /api/markdown-posts/:id (post id or bookmark id)
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiSuccess<RenderedPost>>> {
    let post = posts::get_markdown_post(&state.db, &id).await?;
    let html = render_markdown(&post.content);
    Ok(Json(ApiSuccess::new(RenderedPost { post, html })))
}

/// POST /api/markdown-posts
pub async fn create_post(
    State(state): State<AppState>,
    Form(form): Form<MarkdownPostForm>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<CreatedId>>)> {
    let id = posts::create_markdown_post(
        &state.db,
        &NewMarkdownPost {
            title: form.title,
            description: form.description,
            content: form.content,
            sidebar_option: form.sidebar_option,
        },
    )
    .await?;

    info!(bookmark_id = %id, "Markdown post submitted");
    Ok((StatusCode::CREATED, Json(ApiSuccess::new(CreatedId { id }))))
}
