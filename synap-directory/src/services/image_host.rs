//! Hosted image storage
//!
//! Uploads go to Cloudinary's signed upload endpoint. The service holds the
//! host as `Option<Arc<dyn ImageHost>>`; `None` means no credentials were
//! configured.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use synap_common::config::ImageHostConfig;
use thiserror::Error;

const CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Image host errors
#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("Image hosting is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Upload rejected ({0}): {1}")]
    Rejected(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Destination for uploaded images
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Have the host fetch `url` itself; returns the hosted URL
    async fn upload_url(&self, url: &str, folder: &str) -> Result<String, ImageHostError>;

    /// Upload raw file bytes; returns the hosted URL
    async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<String, ImageHostError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary signed-upload client
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    upload_endpoint: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    /// Build a client from configured credentials
    pub fn from_config(config: &ImageHostConfig) -> Result<Self, ImageHostError> {
        Self::with_base_url(config, CLOUDINARY_BASE_URL)
    }

    /// Same as [`Self::from_config`] against a different API root
    pub fn with_base_url(config: &ImageHostConfig, base_url: &str) -> Result<Self, ImageHostError> {
        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            config.cloud_name.as_deref(),
            config.api_key.as_deref(),
            config.api_secret.as_deref(),
        ) else {
            return Err(ImageHostError::NotConfigured);
        };
        if !config.is_configured() {
            return Err(ImageHostError::NotConfigured);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ImageHostError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            upload_endpoint: format!(
                "{}/{}/image/upload",
                base_url.trim_end_matches('/'),
                cloud_name.trim()
            ),
            api_key: api_key.trim().to_string(),
            api_secret: api_secret.trim().to_string(),
        })
    }

    /// Signed form fields common to every upload
    fn signed_form(&self, folder: &str) -> reqwest::multipart::Form {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_params(folder, timestamp, &self.api_secret);

        reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn send(&self, form: reqwest::multipart::Form) -> Result<String, ImageHostError> {
        tracing::debug!(endpoint = %self.upload_endpoint, "Uploading image");

        let response = self
            .http_client
            .post(&self.upload_endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ImageHostError::Rejected(status.as_u16(), message));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::ParseError(e.to_string()))?;

        tracing::info!(url = %uploaded.secure_url, "Image uploaded");
        Ok(uploaded.secure_url)
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload_url(&self, url: &str, folder: &str) -> Result<String, ImageHostError> {
        let form = self.signed_form(folder).text("file", url.to_string());
        self.send(form).await
    }

    async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<String, ImageHostError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = self.signed_form(folder).part("file", part);
        self.send(form).await
    }
}

/// SHA-256 upload signature over the sorted signed parameters plus secret
pub fn sign_params(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = format!("folder={}&timestamp={}{}", folder, timestamp, api_secret);
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}
