//! Tag endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use synap_common::api::ApiSuccess;
use synap_common::db::Tag;

use crate::db::tags;
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedTag {
    pub tag: Tag,
    pub created: bool,
}

/// GET /api/tags
pub async fn get_tags(State(state): State<AppState>) -> ApiResult<Json<ApiSuccess<Vec<Tag>>>> {
    let tags = tags::list_tags(&state.db).await?;
    Ok(Json(ApiSuccess::new(tags)))
}

/// POST /api/tags
///
/// 201 for a new tag, 200 when an equivalent tag already existed.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<CreatedTag>>)> {
    let (tag, created) = tags::create_tag(&state.db, &request.name).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiSuccess::new(CreatedTag { tag, created }))))
}

/// DELETE /api/tags/:id
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiSuccess<()>>> {
    tags::delete_tag(&state.db, &id).await?;
    Ok(Json(ApiSuccess::empty()))
}
