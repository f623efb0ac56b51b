//! Sidebar sections and the navigation tree built from them

use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use synap_common::db::{Category, SidebarSection};
use synap_common::slug::slugify;
use synap_common::{Error, Result};
use uuid::Uuid;

use super::{conflict_on_reference, conflict_on_unique};

/// A section with the categories placed in it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    #[serde(flatten)]
    pub section: SidebarSection,
    pub categories: Vec<Category>,
}

/// Sections ordered by `sort_order`, then creation time
pub async fn list_sections(pool: &SqlitePool) -> Result<Vec<SidebarSection>> {
    let sections = sqlx::query_as::<_, SidebarSection>(
        r#"
        SELECT id, title, slug, sort_order, created_at
        FROM sidebar_sections
        ORDER BY sort_order ASC, created_at ASC, rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(sections)
}

/// Full navigation tree: every section with its categories (by name)
pub async fn get_sidebar_data(pool: &SqlitePool) -> Result<Vec<SidebarEntry>> {
    let sections = list_sections(pool).await?;

    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, section_id, icon_url, created_at
        FROM categories
        WHERE section_id IS NOT NULL
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_section: HashMap<String, Vec<Category>> = HashMap::new();
    for category in categories {
        if let Some(section_id) = category.section_id.clone() {
            by_section.entry(section_id).or_default().push(category);
        }
    }

    Ok(sections
        .into_iter()
        .map(|section| SidebarEntry {
            categories: by_section.remove(&section.id).unwrap_or_default(),
            section,
        })
        .collect())
}

/// Look up a section by slug
pub async fn find_section_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<SidebarSection>> {
    let section = sqlx::query_as::<_, SidebarSection>(
        "SELECT id, title, slug, sort_order, created_at FROM sidebar_sections WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(section)
}

/// Create a sidebar section, returning its id
pub async fn create_section(pool: &SqlitePool, title: &str, sort_order: i64) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Section title is required".to_string()));
    }

    let slug = slugify(title);
    if slug.is_empty() {
        return Err(Error::InvalidInput(
            "Section title must contain letters or digits".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sidebar_sections (id, title, slug, sort_order) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(title)
        .bind(&slug)
        .bind(sort_order)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A section with this title already exists"))?;

    Ok(id)
}

/// Delete a section and (by cascade) its categories
pub async fn delete_section(pool: &SqlitePool, id: &str) -> Result<()> {
    let affected = sqlx::query("DELETE FROM sidebar_sections WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_reference(e, "Section categories still have bookmarks"))?
        .rows_affected();

    if affected == 0 {
        return Err(Error::NotFound("Section not found".to_string()));
    }
    Ok(())
}
