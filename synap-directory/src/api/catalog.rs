//! Category and resource type endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use synap_common::api::{ApiSuccess, CreatedId};
use synap_common::db::ResourceType;
use tracing::info;

use crate::db::catalog::{self, CategoryEntry, NewCategory};
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub section_id: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// GET /api/categories
pub async fn get_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiSuccess<Vec<CategoryEntry>>>> {
    let categories = catalog::list_categories(&state.db).await?;
    Ok(Json(ApiSuccess::new(categories)))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<ApiSuccess<CreatedId>>)> {
    let id = catalog::create_category(
        &state.db,
        &NewCategory {
            name: request.name,
            section_id: request.section_id,
            icon_url: request.icon_url,
        },
    )
    .await?;

    info!(category_id = %id, "Category created");
    Ok((StatusCode::CREATED, Json(ApiSuccess::new(CreatedId { id }))))
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiSuccess<()>>> {
    catalog::delete_category(&state.db, &id).await?;
    info!(category_id = %id, "Category deleted");
    Ok(Json(ApiSuccess::empty()))
}

/// GET /api/resource-types
pub async fn get_resource_types(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiSuccess<Vec<ResourceType>>>> {
    let types = catalog::list_resource_types(&state.db).await?;
    Ok(Json(ApiSuccess::new(types)))
}
