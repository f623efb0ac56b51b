//! Default catalog rows
//!
//! Both functions are idempotent: rows are keyed by slug and existing rows
//! are left untouched.

use crate::slug::slugify;
use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Categories the bookmark and markdown flows depend on (name, slug)
pub const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Apps & Tools", "apps-and-tools"),
    ("Articles", "articles"),
    ("YouTube", "youtube"),
    (".Md Files", "md"),
];

/// Default resource type names; slugs derive from the name
pub const DEFAULT_RESOURCE_TYPES: [&str; 4] = ["Link", "Article", "Tool", "Post"];

/// Insert any missing default category
pub async fn ensure_default_categories(pool: &SqlitePool) -> Result<()> {
    for (name, slug) in DEFAULT_CATEGORIES {
        let inserted = sqlx::query(
            "INSERT INTO categories (id, name, slug) VALUES (?, ?, ?) ON CONFLICT(slug) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            debug!(slug, "Seeded default category");
        }
    }

    Ok(())
}

/// Insert any missing default resource type
pub async fn ensure_default_resource_types(pool: &SqlitePool) -> Result<()> {
    for name in DEFAULT_RESOURCE_TYPES {
        sqlx::query(
            "INSERT INTO resource_types (id, name, slug) VALUES (?, ?, ?) ON CONFLICT(slug) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(slugify(name))
        .execute(pool)
        .await?;
    }

    Ok(())
}
