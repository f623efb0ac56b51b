//! Shared API request/response types
//!
//! Every JSON response carries a `success` flag. Successful responses put
//! their payload under `data`; failures carry a human-readable `error`.

use serde::{Deserialize, Serialize};

// ========================================
// Envelope Types
// ========================================

/// Successful response envelope
///
/// # Examples
///
/// ```
/// use synap_common::api::types::ApiSuccess;
///
/// let body = serde_json::to_value(ApiSuccess::new(42)).unwrap();
/// assert_eq!(body["success"], true);
/// assert_eq!(body["data"], 42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl ApiSuccess<()> {
    /// Success without a payload
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

/// Failed response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
}

impl ApiFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ========================================
// Common Payloads
// ========================================

/// Identifier of a newly created row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedId {
    pub id: String,
}

/// Hosted URL of an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedUrl {
    pub url: String,
}

// ========================================
// Tests
// ========================================
