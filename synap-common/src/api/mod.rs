//! API module for shared HTTP API functionality
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Pure functions (no HTTP framework dependencies)
//! - Shared types
//!
//! The service crate wraps these with Axum extractors and middleware.

pub mod auth;
pub mod types;

pub use auth::{
    generate_session_token, hash_password, hash_session_token, verify_password, CredentialError,
};
pub use types::{ApiFailure, ApiSuccess, CreatedId, UploadedUrl};
