//! Tags and bookmark tag links

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use synap_common::db::Tag;
use synap_common::slug::slugify;
use synap_common::{Error, Result};
use uuid::Uuid;

/// All tags ordered by name
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

/// Create a tag, or return the existing one with the same name or slug
///
/// The flag is `true` when a new row was inserted.
pub async fn create_tag(pool: &SqlitePool, name: &str) -> Result<(Tag, bool)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Tag name is required".to_string()));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(Error::InvalidInput(
            "Tag name must contain letters or digits".to_string(),
        ));
    }

    let existing = sqlx::query_as::<_, Tag>(
        "SELECT id, name, slug FROM tags WHERE lower(name) = lower(?) OR slug = ? LIMIT 1",
    )
    .bind(name)
    .bind(&slug)
    .fetch_optional(pool)
    .await?;

    if let Some(tag) = existing {
        return Ok((tag, false));
    }

    let tag = Tag {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        slug,
    };
    sqlx::query("INSERT INTO tags (id, name, slug) VALUES (?, ?, ?)")
        .bind(&tag.id)
        .bind(&tag.name)
        .bind(&tag.slug)
        .execute(pool)
        .await?;

    Ok((tag, true))
}

/// Delete a tag; its bookmark links cascade
pub async fn delete_tag(pool: &SqlitePool, id: &str) -> Result<()> {
    let affected = sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(Error::NotFound("Tag not found".to_string()));
    }
    Ok(())
}

/// Replace a bookmark's tag set
pub async fn set_bookmark_tags(pool: &SqlitePool, bookmark_id: &str, tag_ids: &[String]) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE id = ? AND deleted_at IS NULL)",
    )
    .bind(bookmark_id)
    .fetch_one(&mut *tx)
    .await?;
    if !exists {
        return Err(Error::NotFound("Bookmark not found".to_string()));
    }

    sqlx::query("DELETE FROM bookmark_tags WHERE bookmark_id = ?")
        .bind(bookmark_id)
        .execute(&mut *tx)
        .await?;
    attach_tags(&mut *tx, bookmark_id, tag_ids).await?;

    tx.commit().await?;
    Ok(())
}

/// Link tags to a bookmark inside an open transaction
///
/// Unknown tag ids are rejected; duplicates in `tag_ids` are ignored.
pub(crate) async fn attach_tags(
    conn: &mut SqliteConnection,
    bookmark_id: &str,
    tag_ids: &[String],
) -> Result<()> {
    for tag_id in tag_ids {
        let known: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?)")
            .bind(tag_id)
            .fetch_one(&mut *conn)
            .await?;
        if !known {
            return Err(Error::InvalidInput(format!("Unknown tag: {}", tag_id)));
        }

        sqlx::query("INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) VALUES (?, ?)")
            .bind(bookmark_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Tags for each of the given bookmarks, keyed by bookmark id
pub async fn tags_for_bookmarks(
    pool: &SqlitePool,
    bookmark_ids: &[String],
) -> Result<HashMap<String, Vec<Tag>>> {
    let mut by_bookmark: HashMap<String, Vec<Tag>> = HashMap::new();
    if bookmark_ids.is_empty() {
        return Ok(by_bookmark);
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT bt.bookmark_id, t.id, t.name, t.slug FROM bookmark_tags bt \
         JOIN tags t ON t.id = bt.tag_id WHERE bt.bookmark_id IN (",
    );
    let mut ids = query.separated(", ");
    for id in bookmark_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(") ORDER BY t.name ASC");

    let rows: Vec<(String, String, String, String)> =
        query.build_query_as().fetch_all(pool).await?;

    for (bookmark_id, id, name, slug) in rows {
        by_bookmark
            .entry(bookmark_id)
            .or_default()
            .push(Tag { id, name, slug });
    }

    Ok(by_bookmark)
}
