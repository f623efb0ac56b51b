//! Sidebar navigation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use synap_common::api::{ApiSuccess, CreatedId};
use tracing::info;

use crate::db::sidebar::{self, SidebarEntry};
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    pub title: String,
    #[serde(default)]
    pub sort_order: i64,
}

/// GET /api/sidebar
pub async fn get_sidebar(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiSuccess<Vec<SidebarEntry>>>> {
    let entries = sidebar::get_sidebar_data(&state.db).await?;
    Ok(Json(ApiSuccess::new(entries)))
}

/// POST /api/sidebar/sections
pub async fn create_section(
    State(state): State<AppState>,
    Json(request): Json<CreateSectionRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<CreatedId>>)> {
    let id = sidebar::create_section(&state.db, &request.title, request.sort_order).await?;
    info!(section_id = %id, "Sidebar section created");
    Ok((StatusCode::CREATED, Json(ApiSuccess::new(CreatedId { id }))))
}

/// DELETE /api/sidebar/sections/:id
pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiSuccess<()>>> {
    sidebar::delete_section(&state.db, &id).await?;
    info!(section_id = %id, "Sidebar section deleted");
    Ok(Json(ApiSuccess::empty()))
}
