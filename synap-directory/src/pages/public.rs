//! Public browsing pages

use axum::{
    extract::{Path, Query, RawQuery, State},
    response::Html,
};
use std::collections::HashSet;
use synap_common::db::Tag;
use synap_common::time::display_date;

use super::layout::{empty_state, escape_html, page_header, render_page, safe_href, PageResult};
use crate::api::markdown::SearchQuery;
use crate::db::bookmarks::{self, SectionResource};
use crate::db::sidebar::{self, SidebarEntry};
use crate::db::{posts, tags};
use crate::services::render_markdown;
use crate::AppState;

/// GET /
pub async fn explore_page(State(state): State<AppState>) -> PageResult<Html<String>> {
    let sidebar = sidebar::get_sidebar_data(&state.db).await?;

    let mut body = page_header(
        "The Archive",
        "Boundless Intelligence",
        "Journey through the curated landscape of synthetic creativity. From cutting-edge model registries to advanced operational blueprints.",
    );
    body.push_str(
        r#"<section class="panel"><h2>Explore Content</h2><p class="muted">Welcome to SynapDirectory. Select a category from the sidebar to begin.</p></section>"#,
    );

    if !sidebar.is_empty() {
        body.push_str(r#"<section class="grid">"#);
        for entry in &sidebar {
            let links: String = entry
                .categories
                .iter()
                .map(|c| {
                    format!(
                        r#"<li><a href="/{}">{}</a></li>"#,
                        escape_html(&c.slug),
                        escape_html(&c.name)
                    )
                })
                .collect();
            body.push_str(&format!(
                r#"<article class="card"><h3>{}</h3><ul class="link-list">{}</ul></article>"#,
                escape_html(&entry.section.title),
                links
            ));
        }
        body.push_str("</section>");
    }

    Ok(Html(render_page("Explore", "/", &sidebar, &body)))
}

/// GET /md
pub async fn markdown_list_page(State(state): State<AppState>) -> PageResult<Html<String>> {
    let sidebar = sidebar::get_sidebar_data(&state.db).await?;
    let posts = posts::list_markdown_posts(&state.db).await?;

    let mut body = page_header(
        "Community",
        "Markdown Files",
        "Guides, prompts and notes shared by the community.",
    );

    if posts.is_empty() {
        body.push_str(&empty_state(
            "No Posts Yet",
            "Be the first to share a markdown file with the community.",
        ));
    } else {
        body.push_str(r#"<section class="grid">"#);
        for post in &posts {
            body.push_str(&markdown_card(
                &post.id,
                &post.title,
                &post.description,
                &post.created_at,
                &[],
            ));
        }
        body.push_str("</section>");
    }

    Ok(Html(render_page("Markdown", "/md", &sidebar, &body)))
}

/// GET /md/:id
pub async fn markdown_detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let post = posts::get_markdown_post(&state.db, &id).await?;
    let sidebar = sidebar::get_sidebar_data(&state.db).await?;

    let body = format!(
        r#"{header}<p class="muted">{date}</p><article class="markdown-body">{content}</article><p><a href="/md">&larr; All posts</a></p>"#,
        header = page_header("Markdown", &post.title, &post.description),
        date = escape_html(&display_date(&post.created_at)),
        content = render_markdown(&post.content),
    );

    Ok(Html(render_page(&post.title, "/md", &sidebar, &body)))
}

/// GET /prompts?q=
pub async fn prompts_page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> PageResult<Html<String>> {
    let sidebar = sidebar::get_sidebar_data(&state.db).await?;
    let q = query.q.trim();
    let results = posts::search_prompts(&state.db, q).await?;

    let mut body = page_header(
        "Prompt Base",
        "Prompts",
        "Search the community prompt library by title, description or content.",
    );
    body.push_str(&format!(
        r#"<form class="search" method="get" action="/prompts"><input type="search" name="q" value="{}" placeholder="Search prompts..."><button type="submit">Search</button></form>"#,
        escape_html(q)
    ));

    if results.is_empty() {
        if q.is_empty() {
            body.push_str(&empty_state("No prompts established yet.", "Submit one from the Submit page."));
        } else {
            body.push_str(&empty_state(
                "No prompts match your search.",
                &format!("Nothing found for \"{}\".", q),
            ));
        }
    } else {
        body.push_str(r#"<section class="prompt-list">"#);
        for post in &results {
            body.push_str(&format!(
                r#"<article class="card prompt"><h3><a href="/md/{id}">{title}</a></h3><p class="muted">{description}</p><pre>{content}</pre></article>"#,
                id = escape_html(&post.id),
                title = escape_html(&post.title),
                description = escape_html(&post.description),
                content = escape_html(&post.content),
            ));
        }
        body.push_str("</section>");
    }

    Ok(Html(render_page("Prompts", "/prompts", &sidebar, &body)))
}

const SUBMIT_SCRIPT: &str = r#"<script>
document.getElementById('submit-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const status = document.getElementById('submit-status');
    const response = await fetch('/api/markdown-posts', {
        method: 'POST',
        body: new URLSearchParams(new FormData(event.target)),
    });
    const result = await response.json();
    if (result.success) {
        window.location.href = '/md/' + result.data.id;
    } else {
        status.textContent = result.error;
    }
});
</script>"#;

/// GET /submit
pub async fn submit_page(State(state): State<AppState>) -> PageResult<Html<String>> {
    let sidebar = sidebar::get_sidebar_data(&state.db).await?;

    let options: String = sidebar
        .iter()
        .flat_map(|entry| entry.categories.iter())
        .map(|c| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(&c.slug),
                escape_html(&c.name)
            )
        })
        .collect();

    let body = format!(
        r#"{header}
<form id="submit-form" class="panel form">
    <label>Title<input name="title" required></label>
    <label>Description<input name="description" required></label>
    <label>Section<select name="sidebarOption"><option value="">None</option>{options}</select></label>
    <label>Content (Markdown)<textarea name="content" rows="14" required></textarea></label>
    <button type="submit">Publish</button>
    <p id="submit-status" class="error"></p>
</form>
{script}"#,
        header = page_header("Contribute", "Submit", "Share a markdown guide or prompt with the directory."),
        options = options,
        script = SUBMIT_SCRIPT,
    );

    Ok(Html(render_page("Submit", "/submit", &sidebar, &body)))
}

/// Tag ids from repeated `tag=` query parameters
fn selected_tags(raw_query: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    url::form_urlencoded::parse(raw_query.unwrap_or_default().as_bytes())
        .filter(|(key, value)| key == "tag" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Query string selecting `tags`
fn tag_query(path: &str, tags: &[&str]) -> String {
    if tags.is_empty() {
        return path.to_string();
    }
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(tags.iter().map(|id| ("tag", *id)))
        .finish();
    format!("{}?{}", path, query)
}

/// Heading copy for the built-in sections: (slug, title, subtitle)
const SECTION_COPY: [(&str, &str, &str); 12] = [
    ("apps-and-tools", "Apps and Tools", "Curated collection of essential tools, frameworks, and applications for the synthetic age."),
    ("articles", "Articles", "In-depth analysis, tutorials, and insights into the world of synthetic intelligence."),
    ("backend", "Backend Tools", "Infrastructure, databases, and server-side utilities."),
    ("design", "Design", "Curated design resources, UI kits, and inspiration for the synthetic age."),
    ("gen-ai", "Gen AI Tools", "The latest generation of artificial intelligence tools and frameworks."),
    ("github", "GitHub", "This section is currently under development. Check back soon for curated resources."),
    ("libraries", "Libraries", "Essential code libraries, packages, and SDKs for development."),
    ("mcp", "MCP", "This section is currently under development. Check back soon for curated resources."),
    ("portfolios", "Portfolios", "Showcase of exceptional portfolios and creative works."),
    ("tools", "Tools", "Useful software, utilities, and applications to boost productivity."),
    ("workflows", "Workflows", "Optimized workflows, pipelines, and automation strategies."),
    ("youtube", "YouTube Resources", "Curated collection of high-quality YouTube channels and videos for developers."),
];

const DEFAULT_SECTION_SUBTITLE: &str = "Curated resources for this section.";

/// Title and subtitle for a section page; built-in copy wins over catalog names
fn section_heading(slug: &str, sidebar: &[SidebarEntry]) -> (String, &'static str) {
    match SECTION_COPY.iter().find(|(known, _, _)| *known == slug) {
        Some((_, title, subtitle)) => (title.to_string(), *subtitle),
        None => (section_title(slug, sidebar), DEFAULT_SECTION_SUBTITLE),
    }
}

fn section_title(slug: &str, sidebar: &[SidebarEntry]) -> String {
    sidebar
        .iter()
        .flat_map(|entry| entry.categories.iter())
        .find(|c| c.slug == slug)
        .map(|c| c.name.clone())
        .or_else(|| {
            sidebar
                .iter()
                .find(|entry| entry.section.slug == slug)
                .map(|entry| entry.section.title.clone())
        })
        .unwrap_or_else(|| {
            slug.split('-')
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    chars
                        .next()
                        .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
}

fn tag_chips(resource_tags: &[Tag]) -> String {
    if resource_tags.is_empty() {
        return String::new();
    }
    let chips: String = resource_tags
        .iter()
        .map(|t| format!(r#"<span class="chip">{}</span>"#, escape_html(&t.name)))
        .collect();
    format!(r#"<div class="chips">{}</div>"#, chips)
}

fn markdown_card(id: &str, title: &str, description: &str, created_at: &str, tags: &[Tag]) -> String {
    format!(
        r#"<article class="card markdown-card"><p class="eyebrow">Markdown &middot; {date}</p><h3><a href="/md/{id}">{title}</a></h3><p class="muted">{description}</p>{tags}</article>"#,
        date = escape_html(&display_date(created_at)),
        id = escape_html(id),
        title = escape_html(title),
        description = escape_html(description),
        tags = tag_chips(tags),
    )
}

fn link_card(class: &str, label: &str, resource: &SectionResource) -> String {
    let image = resource
        .image_url
        .as_deref()
        .and_then(safe_href)
        .map(|src| format!(r#"<img class="card-image" src="{}" alt="" loading="lazy">"#, src))
        .unwrap_or_default();
    let title = escape_html(&resource.title);
    let heading = match resource.url.as_deref().and_then(safe_href) {
        Some(href) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            href, title
        ),
        None => title,
    };

    format!(
        r#"<article class="card {class}">{image}<p class="eyebrow">{label}</p><h3>{heading}</h3><p class="muted">{description}</p>{tags}</article>"#,
        class = class,
        image = image,
        label = escape_html(label),
        heading = heading,
        description = escape_html(resource.description.as_deref().unwrap_or_default()),
        tags = tag_chips(&resource.tags),
    )
}

/// Card for a section resource, chosen by category slug
fn resource_card(resource: &SectionResource) -> String {
    match resource.category_slug.as_str() {
        "apps-and-tools" | "youtube" => link_card("tool-card", &resource.category_name, resource),
        "articles" => link_card("article-card", "Article", resource),
        "md" => markdown_card(
            resource.post_id.as_deref().unwrap_or(&resource.id),
            &resource.title,
            resource.description.as_deref().unwrap_or_default(),
            &resource.created_at,
            &resource.tags,
        ),
        _ => link_card("resource-card", &resource.category_name, resource),
    }
}

/// GET /:slug?tag=<id>&tag=<id>
pub async fn section_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> PageResult<Html<String>> {
    let sidebar = sidebar::get_sidebar_data(&state.db).await?;
    let selected = selected_tags(raw_query.as_deref());
    let all_tags = tags::list_tags(&state.db).await?;

    let unfiltered = bookmarks::list_section_resources(&state.db, &slug, &[]).await?;
    let resources = if selected.is_empty() {
        unfiltered.clone()
    } else {
        bookmarks::list_section_resources(&state.db, &slug, &selected).await?
    };

    let path = format!("/{}", slug);
    let (title, subtitle) = section_heading(&slug, &sidebar);
    let mut body = page_header("Collection", &title, subtitle);

    // Only offer tags that appear in this section
    let present: HashSet<&str> = unfiltered
        .iter()
        .flat_map(|r| r.tags.iter().map(|t| t.id.as_str()))
        .collect();
    let filter_tags: Vec<&Tag> = all_tags
        .iter()
        .filter(|t| present.contains(t.id.as_str()))
        .collect();

    if !filter_tags.is_empty() {
        body.push_str(r#"<div class="chips filters">"#);
        for tag in filter_tags {
            let active = selected.iter().any(|id| *id == tag.id);
            let toggled: Vec<&str> = if active {
                selected.iter().map(String::as_str).filter(|id| *id != tag.id).collect()
            } else {
                selected
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(tag.id.as_str()))
                    .collect()
            };
            body.push_str(&format!(
                r#"<a class="chip{}" href="{}">{}</a>"#,
                if active { " active" } else { "" },
                escape_html(&tag_query(&path, &toggled)),
                escape_html(&tag.name)
            ));
        }
        if !selected.is_empty() {
            body.push_str(&format!(
                r#"<a class="chip clear" href="{}">Clear filters</a>"#,
                escape_html(&path)
            ));
        }
        body.push_str("</div>");
    }

    if unfiltered.is_empty() {
        body.push_str(&empty_state(
            "Nothing here yet",
            "This section is waiting for its first submission.",
        ));
    } else if resources.is_empty() {
        body.push_str(&empty_state(
            "No matches",
            "No resources match the selected filters.",
        ));
    } else {
        body.push_str(r#"<section class="grid">"#);
        for resource in &resources {
            body.push_str(&resource_card(resource));
        }
        body.push_str("</section>");
    }

    Ok(Html(render_page(&title, &path, &sidebar, &body)))
}
