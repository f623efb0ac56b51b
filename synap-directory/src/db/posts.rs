//! Markdown posts (community submissions in the `md` category)

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use synap_common::{Error, Result};
use uuid::Uuid;

use super::non_empty;

/// Slug of the category every markdown post belongs to
pub const MARKDOWN_CATEGORY_SLUG: &str = "md";

/// Markdown post submission
#[derive(Debug, Clone, Default)]
pub struct NewMarkdownPost {
    pub title: String,
    pub description: String,
    pub content: String,
    pub sidebar_option: Option<String>,
}

/// Stored markdown post; `id` is the owning bookmark id
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownPost {
    pub id: String,
    pub post_id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub sidebar_option: Option<String>,
    pub created_at: String,
}

const POST_COLUMNS: &str = r#"
    SELECT b.id, m.id AS post_id, m.title, m.description, m.content,
           b.sidebar_option, b.created_at
    FROM markdown_posts m
    JOIN bookmarks b ON b.id = m.bookmark_id
    JOIN categories c ON c.id = b.category_id
    WHERE b.deleted_at IS NULL AND c.slug = 'md'
"#;

/// Store a post and its bookmark in one transaction, returning the bookmark id
pub async fn create_markdown_post(pool: &SqlitePool, input: &NewMarkdownPost) -> Result<String> {
    let title = input.title.trim();
    let description = input.description.trim();
    if title.is_empty() || description.is_empty() || input.content.trim().is_empty() {
        return Err(Error::InvalidInput("All fields are required".to_string()));
    }

    let category_id: Option<String> = sqlx::query_scalar("SELECT id FROM categories WHERE slug = ?")
        .bind(MARKDOWN_CATEGORY_SLUG)
        .fetch_optional(pool)
        .await?;
    let category_id =
        category_id.ok_or_else(|| Error::Internal("Category 'md' not found".to_string()))?;

    let bookmark_id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO bookmarks (id, category_id, sidebar_option) VALUES (?, ?, ?)")
        .bind(&bookmark_id)
        .bind(&category_id)
        .bind(non_empty(input.sidebar_option.as_deref()))
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO markdown_posts (id, bookmark_id, title, description, content) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&bookmark_id)
    .bind(title)
    .bind(description)
    .bind(&input.content)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(bookmark_id)
}

/// All markdown posts, newest first
pub async fn list_markdown_posts(pool: &SqlitePool) -> Result<Vec<MarkdownPost>> {
    let sql = format!("{} ORDER BY b.created_at DESC, b.rowid DESC", POST_COLUMNS);
    let posts = sqlx::query_as::<_, MarkdownPost>(&sql).fetch_all(pool).await?;
    Ok(posts)
}

/// Posts whose title, description or content contain `query`
///
/// Matching is case-insensitive over full Unicode (SQLite's `lower()` only
/// folds ASCII), so it runs here rather than in SQL. An empty query returns
/// every post.
pub async fn search_prompts(pool: &SqlitePool, query: &str) -> Result<Vec<MarkdownPost>> {
    let needle = query.trim().to_lowercase();
    let posts = list_markdown_posts(pool).await?;
    if needle.is_empty() {
        return Ok(posts);
    }

    Ok(posts
        .into_iter()
        .filter(|post| {
            [&post.title, &post.description, &post.content]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect())
}

/// Look up a post by post id or bookmark id
pub async fn get_markdown_post(pool: &SqlitePool, id: &str) -> Result<MarkdownPost> {
    let sql = format!("{} AND (m.id = ? OR b.id = ?)", POST_COLUMNS);

    sqlx::query_as::<_, MarkdownPost>(&sql)
        .bind(id)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound("Post not found".to_string()))
}
