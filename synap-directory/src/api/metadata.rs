//! URL metadata endpoint

use axum::{extract::State, Json};
use serde::Deserialize;
use synap_common::api::ApiSuccess;

use crate::services::{fetch_url_metadata, ScrapeError, UrlMetadata};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    pub url: String,
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::InvalidUrl(_) => ApiError::BadRequest(err.to_string()),
            ScrapeError::Fetch(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

/// POST /api/metadata
pub async fn fetch_metadata(
    State(state): State<AppState>,
    Json(request): Json<MetadataRequest>,
) -> ApiResult<Json<ApiSuccess<UrlMetadata>>> {
    let metadata =
        fetch_url_metadata(&state.scraper, state.image_host.as_deref(), &request.url).await?;
    Ok(Json(ApiSuccess::new(metadata)))
}
