//! Categories and resource types

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use synap_common::db::{ensure_default_categories, ensure_default_resource_types, ResourceType};
use synap_common::slug::slugify;
use synap_common::{Error, Result};
use uuid::Uuid;

use super::{conflict_on_reference, conflict_on_unique, non_empty};

/// Category with the title of the sidebar section it belongs to
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub section_id: Option<String>,
    pub section_title: Option<String>,
    pub icon_url: Option<String>,
    pub created_at: String,
}

/// Category creation input
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub section_id: String,
    pub icon_url: Option<String>,
}

/// All categories ordered by name (defaults are re-seeded first)
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategoryEntry>> {
    ensure_default_categories(pool).await?;

    let categories = sqlx::query_as::<_, CategoryEntry>(
        r#"
        SELECT c.id, c.name, c.slug, c.section_id, s.title AS section_title,
               c.icon_url, c.created_at
        FROM categories c
        LEFT JOIN sidebar_sections s ON s.id = c.section_id
        ORDER BY c.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Look up a category slug by id
pub async fn category_slug(pool: &SqlitePool, id: &str) -> Result<Option<String>> {
    let slug = sqlx::query_scalar("SELECT slug FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(slug)
}

/// Create a category inside a sidebar section, returning its id
pub async fn create_category(pool: &SqlitePool, input: &NewCategory) -> Result<String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Category name is required".to_string()));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(Error::InvalidInput(
            "Category name must contain letters or digits".to_string(),
        ));
    }

    let section_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sidebar_sections WHERE id = ?)")
            .bind(input.section_id.trim())
            .fetch_one(pool)
            .await?;
    if !section_exists {
        return Err(Error::InvalidInput("Invalid sidebar section".to_string()));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO categories (id, name, slug, section_id, icon_url) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(&slug)
    .bind(input.section_id.trim())
    .bind(non_empty(input.icon_url.as_deref()))
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "A category with this name already exists"))?;

    Ok(id)
}

/// Delete a category; rejected while bookmarks reference it
pub async fn delete_category(pool: &SqlitePool, id: &str) -> Result<()> {
    let affected = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_reference(e, "Category still has bookmarks"))?
        .rows_affected();

    if affected == 0 {
        return Err(Error::NotFound("Category not found".to_string()));
    }
    Ok(())
}

/// All resource types ordered by name (defaults are re-seeded first)
pub async fn list_resource_types(pool: &SqlitePool) -> Result<Vec<ResourceType>> {
    ensure_default_resource_types(pool).await?;

    let types = sqlx::query_as::<_, ResourceType>(
        "SELECT id, name, slug FROM resource_types ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(types)
}
