//! # SynapDirectory Common Library
//!
//! Shared code for the directory service and the admin CLI:
//! - Database bootstrap, migrations and default seed data
//! - Configuration resolution
//! - Credential hashing and shared API types
//! - Utility functions (slugs, timestamps)

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod slug;
pub mod time;

pub use error::{Error, Result};
