//! Image upload endpoint (category icons)

use axum::{
    extract::{Multipart, State},
    Json,
};
use synap_common::api::{ApiSuccess, UploadedUrl};
use tracing::{error, info};

use crate::{ApiError, ApiResult, AppState};

/// Largest accepted image
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request body cap: one image plus multipart framing
pub const REQUEST_BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Image host folder for uploaded category icons
pub const UPLOAD_FOLDER: &str = "synap_directory/categories";

/// POST /api/uploads (multipart field `file`)
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiSuccess<UploadedUrl>>> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
        file = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = file
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::BadRequest("File exceeds the 10 MiB limit".to_string()));
    }

    let host = state
        .image_host
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Image hosting is not configured".to_string()))?;

    let size = bytes.len();
    let url = host
        .upload_bytes(bytes, &file_name, UPLOAD_FOLDER)
        .await
        .map_err(|e| {
            error!(error = %e, "Image upload failed");
            ApiError::Upstream("Failed to upload image".to_string())
        })?;

    info!(file_name = %file_name, size, "Image uploaded");
    Ok(Json(ApiSuccess::new(UploadedUrl { url })))
}
