//! Bookmark management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use synap_common::api::{ApiSuccess, CreatedId};
use tracing::info;

use super::auth::CurrentUser;
use crate::db::bookmarks::{self, BookmarkSummary, NewBookmark};
use crate::db::tags;
use crate::pagination::{calculate_pagination, PageQuery, Pagination};
use crate::services::metadata_scraper::parse_page_url;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBookmarkRequest {
    pub url: String,
    pub category_id: String,
    #[serde(default)]
    pub sidebar_option: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkTagsRequest {
    pub tag_ids: Vec<String>,
}

/// One page of the bookmark table
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPage {
    pub bookmarks: Vec<BookmarkSummary>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// GET /api/bookmarks?page=N
pub async fn get_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiSuccess<BookmarkPage>>> {
    let total = bookmarks::count_bookmarks(&state.db).await?;
    let pagination = calculate_pagination(total, query.page.unwrap_or(1));

    let rows =
        bookmarks::list_bookmarks(&state.db, pagination.page_size, pagination.offset).await?;

    Ok(Json(ApiSuccess::new(BookmarkPage {
        bookmarks: rows,
        pagination,
    })))
}

/// POST /api/bookmarks
pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Json(request): Json<SaveBookmarkRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<CreatedId>>)> {
    parse_page_url(&request.url).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if request.category_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Category is required".to_string()));
    }

    let id = bookmarks::save_bookmark(
        &state.db,
        &NewBookmark {
            url: request.url,
            category_id: request.category_id,
            sidebar_option: request.sidebar_option,
            title: request.title,
            description: request.description,
            image_url: request.image_url,
            tag_ids: request.tag_ids,
        },
    )
    .await?;

    info!(bookmark_id = %id, admin = %admin.email, "Bookmark saved");
    Ok((StatusCode::CREATED, Json(ApiSuccess::new(CreatedId { id }))))
}

/// DELETE /api/bookmarks/:id
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiSuccess<()>>> {
    bookmarks::delete_bookmark(&state.db, &id).await?;
    info!(bookmark_id = %id, "Bookmark deleted");
    Ok(Json(ApiSuccess::empty()))
}

/// PUT /api/bookmarks/:id/tags
pub async fn put_bookmark_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<BookmarkTagsRequest>,
) -> ApiResult<Json<ApiSuccess<()>>> {
    tags::set_bookmark_tags(&state.db, &id, &request.tag_ids).await?;
    Ok(Json(ApiSuccess::empty()))
}
