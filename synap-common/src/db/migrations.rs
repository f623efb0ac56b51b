//! Database schema migrations
//!
//! Versioned, idempotent migrations that bring databases created by older
//! builds up to the current schema without data loss.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - They must remain stable for users upgrading from older versions
//! 2. **Always add new migrations** - Create a new migration function for each schema change
//! 3. **Use ALTER TABLE** - Prefer ALTER TABLE over DROP/CREATE to preserve data

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("✓ Migration v2 completed");
    }

    Ok(())
}

async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

/// Migration v1: Add sidebar_option column to bookmarks
///
/// The first catalog builds attached bookmarks to categories only; the
/// sidebar placement column came later.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    if has_column(pool, "bookmarks", "sidebar_option").await? {
        info!("  sidebar_option column already exists - skipping");
        return Ok(());
    }

    sqlx::query("ALTER TABLE bookmarks ADD COLUMN sidebar_option TEXT")
        .execute(pool)
        .await?;

    info!("  ✓ Added sidebar_option column to bookmarks table");
    Ok(())
}

/// Migration v2: Attach categories to sidebar sections
///
/// Adds `section_id` and `icon_url` to categories.
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    if !has_column(pool, "categories", "section_id").await? {
        sqlx::query(
            "ALTER TABLE categories ADD COLUMN section_id TEXT REFERENCES sidebar_sections(id) ON DELETE CASCADE",
        )
        .execute(pool)
        .await?;
        info!("  ✓ Added section_id column to categories table");
    }

    if !has_column(pool, "categories", "icon_url").await? {
        sqlx::query("ALTER TABLE categories ADD COLUMN icon_url TEXT")
            .execute(pool)
            .await?;
        info!("  ✓ Added icon_url column to categories table");
    }

    Ok(())
}
