//! Bookmarks and their per-category extension rows
//!
//! A bookmark row carries only its category and sidebar placement. The
//! content lives in exactly one extension table chosen by category slug:
//!
//! | category slug              | extension table  |
//! |----------------------------|------------------|
//! | `apps-and-tools`, `youtube`| `apps_and_tools` |
//! | `articles`                 | `articles`       |
//! | `md`                       | `markdown_posts` |

use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use synap_common::db::Tag;
use synap_common::{Error, Result};
use uuid::Uuid;

use super::non_empty;
use super::tags::{attach_tags, tags_for_bookmarks};

/// Extension table a link bookmark is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkExtension {
    Tool,
    Article,
}

impl LinkExtension {
    /// Extension for a category slug; `None` when links cannot be saved there
    pub fn for_category(slug: &str) -> Option<Self> {
        match slug {
            "apps-and-tools" | "youtube" => Some(LinkExtension::Tool),
            "articles" => Some(LinkExtension::Article),
            _ => None,
        }
    }
}

/// Link bookmark creation input
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub url: String,
    pub category_id: String,
    pub sidebar_option: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub tag_ids: Vec<String>,
}

/// Flattened bookmark row for the admin table
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkSummary {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub sidebar_option: Option<String>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: String,
    sidebar_option: Option<String>,
    created_at: String,
    category_name: String,
    tool_name: Option<String>,
    tool_url: Option<String>,
    article_title: Option<String>,
    article_url: Option<String>,
    post_title: Option<String>,
}

impl SummaryRow {
    fn into_summary(self, tags: Vec<Tag>) -> BookmarkSummary {
        let (title, url) = if let Some(tool_name) = self.tool_name {
            (tool_name, self.tool_url.unwrap_or_default())
        } else if let Some(article_title) = self.article_title {
            (article_title, self.article_url.unwrap_or_default())
        } else if let Some(post_title) = self.post_title {
            (post_title, format!("/md/{}", self.id))
        } else {
            ("Untitled".to_string(), String::new())
        };

        BookmarkSummary {
            title,
            url,
            kind: self.category_name,
            created_at: self.created_at,
            sidebar_option: self.sidebar_option,
            tags,
            id: self.id,
        }
    }
}

/// Resource shown on a sidebar section page
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionResource {
    pub id: String,
    pub category_slug: String,
    pub category_name: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub content: Option<String>,
    pub post_id: Option<String>,
    pub created_at: String,
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
}

/// Save a link bookmark and its extension row in one transaction
///
/// Returns the new bookmark id.
pub async fn save_bookmark(pool: &SqlitePool, input: &NewBookmark) -> Result<String> {
    let category_slug: Option<String> =
        sqlx::query_scalar("SELECT slug FROM categories WHERE id = ?")
            .bind(&input.category_id)
            .fetch_optional(pool)
            .await?;
    let category_slug =
        category_slug.ok_or_else(|| Error::InvalidInput("Invalid category selection".to_string()))?;

    let extension = LinkExtension::for_category(&category_slug).ok_or_else(|| {
        Error::InvalidInput(format!("No handler for category type: {}", category_slug))
    })?;

    let bookmark_id = Uuid::new_v4().to_string();
    let description = non_empty(input.description.as_deref());
    let image_url = non_empty(input.image_url.as_deref());

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO bookmarks (id, category_id, sidebar_option) VALUES (?, ?, ?)")
        .bind(&bookmark_id)
        .bind(&input.category_id)
        .bind(non_empty(input.sidebar_option.as_deref()))
        .execute(&mut *tx)
        .await?;

    let extension_sql = match extension {
        LinkExtension::Tool => {
            "INSERT INTO apps_and_tools (id, bookmark_id, url, tool_name, description, image_url) VALUES (?, ?, ?, ?, ?, ?)"
        }
        LinkExtension::Article => {
            "INSERT INTO articles (id, bookmark_id, url, title, description, image_url) VALUES (?, ?, ?, ?, ?, ?)"
        }
    };
    sqlx::query(extension_sql)
        .bind(Uuid::new_v4().to_string())
        .bind(&bookmark_id)
        .bind(input.url.trim())
        .bind(input.title.trim())
        .bind(description)
        .bind(image_url)
        .execute(&mut *tx)
        .await?;

    attach_tags(&mut *tx, &bookmark_id, &input.tag_ids).await?;

    tx.commit().await?;
    Ok(bookmark_id)
}

/// Number of live bookmarks
pub async fn count_bookmarks(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// One page of bookmarks, newest first, flattened for display
pub async fn list_bookmarks(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<BookmarkSummary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT b.id, b.sidebar_option, b.created_at, c.name AS category_name,
               t.tool_name, t.url AS tool_url,
               a.title AS article_title, a.url AS article_url,
               m.title AS post_title
        FROM bookmarks b
        JOIN categories c ON c.id = b.category_id
        LEFT JOIN apps_and_tools t ON t.bookmark_id = b.id
        LEFT JOIN articles a ON a.bookmark_id = b.id
        LEFT JOIN markdown_posts m ON m.bookmark_id = b.id
        WHERE b.deleted_at IS NULL
        ORDER BY b.created_at DESC, b.rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut tags = tags_for_bookmarks(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let row_tags = tags.remove(&row.id).unwrap_or_default();
            row.into_summary(row_tags)
        })
        .collect())
}

/// Hard-delete a bookmark; extension rows and tag links cascade
pub async fn delete_bookmark(pool: &SqlitePool, id: &str) -> Result<()> {
    let affected = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(Error::NotFound("Bookmark not found".to_string()));
    }
    Ok(())
}

/// Resources placed in a sidebar section, newest first
///
/// With `tag_ids` only resources carrying every listed tag are returned.
pub async fn list_section_resources(
    pool: &SqlitePool,
    sidebar_option: &str,
    tag_ids: &[String],
) -> Result<Vec<SectionResource>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT b.id, c.slug AS category_slug, c.name AS category_name,
               COALESCE(t.tool_name, a.title, m.title, 'Untitled') AS title,
               COALESCE(t.description, a.description, m.description) AS description,
               COALESCE(t.url, a.url) AS url,
               COALESCE(t.image_url, a.image_url) AS image_url,
               m.content AS content,
               m.id AS post_id,
               b.created_at
        FROM bookmarks b
        JOIN categories c ON c.id = b.category_id
        LEFT JOIN apps_and_tools t ON t.bookmark_id = b.id
        LEFT JOIN articles a ON a.bookmark_id = b.id
        LEFT JOIN markdown_posts m ON m.bookmark_id = b.id
        WHERE b.deleted_at IS NULL AND b.sidebar_option = "#,
    );
    query.push_bind(sidebar_option);

    for tag_id in tag_ids {
        query.push(
            " AND EXISTS (SELECT 1 FROM bookmark_tags bt WHERE bt.bookmark_id = b.id AND bt.tag_id = ",
        );
        query.push_bind(tag_id);
        query.push(")");
    }
    query.push(" ORDER BY b.created_at DESC, b.rowid DESC");

    let mut resources: Vec<SectionResource> = query.build_query_as().fetch_all(pool).await?;

    let ids: Vec<String> = resources.iter().map(|r| r.id.clone()).collect();
    let mut tags = tags_for_bookmarks(pool, &ids).await?;
    for resource in &mut resources {
        resource.tags = tags.remove(&resource.id).unwrap_or_default();
    }

    Ok(resources)
}

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tools: i64,
    pub articles: i64,
    pub markdown_posts: i64,
    pub categories: i64,
}

pub async fn dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM apps_and_tools x JOIN bookmarks b ON b.id = x.bookmark_id
                WHERE b.deleted_at IS NULL) AS tools,
            (SELECT COUNT(*) FROM articles x JOIN bookmarks b ON b.id = x.bookmark_id
                WHERE b.deleted_at IS NULL) AS articles,
            (SELECT COUNT(*) FROM markdown_posts x JOIN bookmarks b ON b.id = x.bookmark_id
                WHERE b.deleted_at IS NULL) AS markdown_posts,
            (SELECT COUNT(*) FROM categories) AS categories
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tags::create_tag;
    use synap_common::db::init_memory_database;

    async fn category_id(pool: &SqlitePool, slug: &str) -> String {
        sqlx::query_scalar("SELECT id FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn link(category_id: String, title: &str) -> NewBookmark {
        NewBookmark {
            url: format!("https://example.com/{}", title.to_lowercase()),
            category_id,
            sidebar_option: Some("tools".to_string()),
            title: title.to_string(),
            description: Some("desc".to_string()),
            image_url: Some(String::new()),
            tag_ids: Vec::new(),
        }
    }

    #[test]
    fn test_extension_for_category() {
        assert_eq!(LinkExtension::for_category("apps-and-tools"), Some(LinkExtension::Tool));
        assert_eq!(LinkExtension::for_category("youtube"), Some(LinkExtension::Tool));
        assert_eq!(LinkExtension::for_category("articles"), Some(LinkExtension::Article));
        assert_eq!(LinkExtension::for_category("md"), None);
    }

    #[tokio::test]
    async fn test_save_tool_bookmark() {
        let pool = init_memory_database().await.unwrap();
        let id = save_bookmark(&pool, &link(category_id(&pool, "youtube").await, "Channel"))
            .await
            .unwrap();

        let (tool_name, image_url): (String, Option<String>) =
            sqlx::query_as("SELECT tool_name, image_url FROM apps_and_tools WHERE bookmark_id = ?")
                .bind(&id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(tool_name, "Channel");
        assert_eq!(image_url, None);

        let listed = list_bookmarks(&pool, 100, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, "YouTube");
        assert_eq!(listed[0].url, "https://example.com/channel");
        assert_eq!(listed[0].sidebar_option.as_deref(), Some("tools"));
    }

    #[tokio::test]
    async fn test_save_bookmark_rejects_unknown_category() {
        let pool = init_memory_database().await.unwrap();
        let err = save_bookmark(&pool, &link("missing".to_string(), "X")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid category selection");
    }

    #[tokio::test]
    async fn test_save_bookmark_rejects_unhandled_category() {
        let pool = init_memory_database().await.unwrap();
        let err = save_bookmark(&pool, &link(category_id(&pool, "md").await, "X"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: No handler for category type: md");
    }

    #[tokio::test]
    async fn test_failed_tag_attach_rolls_back() {
        let pool = init_memory_database().await.unwrap();
        let mut input = link(category_id(&pool, "articles").await, "Post");
        input.tag_ids = vec!["ghost".to_string()];

        assert!(matches!(save_bookmark(&pool, &input).await, Err(Error::InvalidInput(_))));
        assert_eq!(count_bookmarks(&pool).await.unwrap(), 0);

        let articles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(articles, 0);
    }

    #[tokio::test]
    async fn test_list_bookmarks_newest_first_with_markdown_url() {
        let pool = init_memory_database().await.unwrap();
        let first = save_bookmark(&pool, &link(category_id(&pool, "articles").await, "Old"))
            .await
            .unwrap();

        let md = category_id(&pool, "md").await;
        sqlx::query("INSERT INTO bookmarks (id, category_id) VALUES ('post-bm', ?)")
            .bind(&md)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO markdown_posts (id, bookmark_id, title, description, content) VALUES ('p1', 'post-bm', 'Prompt', 'd', 'c')")
            .execute(&pool)
            .await
            .unwrap();

        let listed = list_bookmarks(&pool, 100, 0).await.unwrap();
        assert_eq!(listed[0].id, "post-bm");
        assert_eq!(listed[0].url, "/md/post-bm");
        assert_eq!(listed[0].title, "Prompt");
        assert_eq!(listed[1].id, first);

        let page_two = list_bookmarks(&pool, 1, 1).await.unwrap();
        assert_eq!(page_two.len(), 1);
        assert_eq!(page_two[0].id, first);
    }

    #[tokio::test]
    async fn test_delete_bookmark_cascades() {
        let pool = init_memory_database().await.unwrap();
        let (tag, _) = create_tag(&pool, "Rust").await.unwrap();
        let mut input = link(category_id(&pool, "articles").await, "Gone");
        input.tag_ids = vec![tag.id];
        let id = save_bookmark(&pool, &input).await.unwrap();

        delete_bookmark(&pool, &id).await.unwrap();

        for table in ["articles", "bookmark_tags", "bookmarks"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0, "{} not emptied", table);
        }

        let err = delete_bookmark(&pool, &id).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: Bookmark not found");
    }

    #[tokio::test]
    async fn test_section_resources_filter_by_all_tags() {
        let pool = init_memory_database().await.unwrap();
        let (a, _) = create_tag(&pool, "Alpha").await.unwrap();
        let (b, _) = create_tag(&pool, "Beta").await.unwrap();
        let articles = category_id(&pool, "articles").await;

        let mut both = link(articles.clone(), "Both");
        both.tag_ids = vec![a.id.clone(), b.id.clone()];
        let both_id = save_bookmark(&pool, &both).await.unwrap();

        let mut only_a = link(articles.clone(), "OnlyA");
        only_a.tag_ids = vec![a.id.clone()];
        save_bookmark(&pool, &only_a).await.unwrap();

        let mut elsewhere = link(articles, "Elsewhere");
        elsewhere.sidebar_option = Some("other".to_string());
        save_bookmark(&pool, &elsewhere).await.unwrap();

        let all = list_section_resources(&pool, "tools", &[]).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = list_section_resources(&pool, "tools", &[a.id.clone(), b.id.clone()])
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, both_id);
        assert_eq!(filtered[0].category_slug, "articles");
        assert_eq!(filtered[0].tags.len(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_stats_are_counted() {
        let pool = init_memory_database().await.unwrap();
        save_bookmark(&pool, &link(category_id(&pool, "apps-and-tools").await, "Tool"))
            .await
            .unwrap();
        save_bookmark(&pool, &link(category_id(&pool, "articles").await, "Article"))
            .await
            .unwrap();

        let stats = dashboard_stats(&pool).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                tools: 1,
                articles: 1,
                markdown_posts: 0,
                categories: 4,
            }
        );
    }
}
