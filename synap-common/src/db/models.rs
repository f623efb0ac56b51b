//! Database models
//!
//! Row types shared by the service and the admin CLI. Serialized field
//! names are camelCase to match the JSON API.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sidebar navigation section
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SidebarSection {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub sort_order: i64,
    pub created_at: String,
}

/// Content category (optionally placed in a sidebar section)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub section_id: Option<String>,
    pub icon_url: Option<String>,
    pub created_at: String,
}

/// Resource type label (Link, Article, Tool, Post)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct ResourceType {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Free-form tag attached to bookmarks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Account row; `password_hash` never leaves the server
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
    pub password_hash: String,
}

/// Role value granting access to the admin surface
pub const ROLE_ADMIN: &str = "admin";

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
