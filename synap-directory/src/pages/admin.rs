//! Admin sign-in and dashboard pages
//!
//! The dashboard is rendered server-side for admin sessions only; every
//! mutation it offers goes through the guarded JSON API.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use synap_common::time::display_date;
use tracing::debug;

use super::layout::{empty_state, escape_html, page_header, render_page, safe_href, PageResult};
use crate::api::auth::session_user;
use crate::db::bookmarks::{self, BookmarkSummary, DashboardStats};
use crate::db::{catalog, sidebar, tags};
use crate::pagination::{calculate_pagination, PageQuery, Pagination};
use crate::AppState;

const SIGN_IN_SCRIPT: &str = r#"<script>
document.getElementById('sign-in-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const form = new FormData(event.target);
    const response = await fetch('/api/auth/sign-in', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ email: form.get('email'), password: form.get('password') }),
    });
    const result = await response.json();
    if (result.success) {
        window.location.href = '/admin/dashboard';
    } else {
        document.getElementById('sign-in-status').textContent = result.error;
    }
});
</script>"#;

const DASHBOARD_SCRIPT: &str = r#"<script>
async function api(method, url, body) {
    const response = await fetch(url, {
        method,
        headers: body ? { 'Content-Type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined,
    });
    return response.json();
}
document.getElementById('fetch-metadata').addEventListener('click', async () => {
    const form = document.getElementById('bookmark-form');
    const status = document.getElementById('bookmark-status');
    status.textContent = 'Fetching...';
    const result = await api('POST', '/api/metadata', { url: form.url.value });
    if (result.success) {
        form.title.value = result.data.title;
        form.description.value = result.data.description;
        form.imageUrl.value = result.data.imageUrl;
        status.textContent = '';
    } else {
        status.textContent = result.error;
    }
});
document.getElementById('bookmark-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const form = event.target;
    const tagIds = Array.from(form.querySelectorAll('input[name=tag]:checked')).map((el) => el.value);
    const result = await api('POST', '/api/bookmarks', {
        url: form.url.value,
        categoryId: form.categoryId.value,
        sidebarOption: form.sidebarOption.value || null,
        title: form.title.value,
        description: form.description.value || null,
        imageUrl: form.imageUrl.value || null,
        tagIds,
    });
    if (result.success) {
        window.location.reload();
    } else {
        document.getElementById('bookmark-status').textContent = result.error;
    }
});
document.querySelectorAll('[data-delete]').forEach((button) => {
    button.addEventListener('click', async () => {
        if (!confirm('Delete this bookmark?')) return;
        const result = await api('DELETE', '/api/bookmarks/' + button.dataset.delete);
        if (result.success) button.closest('tr').remove();
        else alert(result.error);
    });
});
document.getElementById('sign-out').addEventListener('click', async () => {
    await api('POST', '/api/auth/sign-out');
    window.location.href = '/admin';
});
</script>"#;

/// GET /admin
pub async fn sign_in_page(State(state): State<AppState>, headers: HeaderMap) -> PageResult<Response> {
    if session_user(&state, &headers).await?.is_some_and(|u| u.is_admin()) {
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }

    let body = format!(
        r#"{header}
<form id="sign-in-form" class="panel form narrow">
    <label>Email<input type="email" name="email" autocomplete="username" required></label>
    <label>Password<input type="password" name="password" autocomplete="current-password" required></label>
    <button type="submit">Sign in</button>
    <p id="sign-in-status" class="error"></p>
</form>
{script}"#,
        header = page_header("Admin", "Sign in", "Curators only."),
        script = SIGN_IN_SCRIPT,
    );

    Ok(Html(render_page("Admin", "/admin", &[], &body)).into_response())
}

fn stat_tiles(stats: &DashboardStats) -> String {
    let tiles = [
        ("Total Tools", stats.tools),
        ("Total Articles", stats.articles),
        ("Markdown Posts", stats.markdown_posts),
        ("Categories", stats.categories),
    ];
    let inner: String = tiles
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="stat"><p class="stat-value">{}</p><p class="stat-label">{}</p></div>"#,
                value, label
            )
        })
        .collect();
    format!(r#"<section class="stats">{}</section>"#, inner)
}

fn bookmark_table(rows: &[BookmarkSummary], pagination: &Pagination) -> String {
    if rows.is_empty() {
        return empty_state("No bookmarks yet", "Add the first one with the form above.");
    }

    let mut html = String::from(
        r#"<table class="bookmarks"><thead><tr><th>Title</th><th>Type</th><th>Section</th><th>Tags</th><th>Added</th><th></th></tr></thead><tbody>"#,
    );
    for row in rows {
        let title = match safe_href(&row.url) {
            Some(href) => format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                href,
                escape_html(&row.title)
            ),
            None => escape_html(&row.title),
        };
        let tag_names: Vec<String> = row.tags.iter().map(|t| escape_html(&t.name)).collect();
        html.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><button class="danger" data-delete="{}">Delete</button></td></tr>"#,
            title,
            escape_html(&row.kind),
            escape_html(row.sidebar_option.as_deref().unwrap_or("-")),
            tag_names.join(", "),
            escape_html(&display_date(&row.created_at)),
            escape_html(&row.id),
        ));
    }
    html.push_str("</tbody></table>");

    if pagination.total_pages > 1 {
        html.push_str(r#"<nav class="pager">"#);
        if pagination.page > 1 {
            html.push_str(&format!(
                r#"<a href="/admin/dashboard?page={}">&larr; Previous</a>"#,
                pagination.page - 1
            ));
        }
        html.push_str(&format!(
            r#"<span>Page {} of {}</span>"#,
            pagination.page, pagination.total_pages
        ));
        if pagination.page < pagination.total_pages {
            html.push_str(&format!(
                r#"<a href="/admin/dashboard?page={}">Next &rarr;</a>"#,
                pagination.page + 1
            ));
        }
        html.push_str("</nav>");
    }

    html
}

/// GET /admin/dashboard?page=N
///
/// Anything but an admin session is sent back to the sign-in page.
pub async fn dashboard_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> PageResult<Response> {
    let Some(admin) = session_user(&state, &headers).await?.filter(|u| u.is_admin()) else {
        debug!("Dashboard requested without an admin session");
        return Ok(Redirect::to("/admin").into_response());
    };

    let sidebar = sidebar::get_sidebar_data(&state.db).await?;
    let stats = bookmarks::dashboard_stats(&state.db).await?;
    let categories = catalog::list_categories(&state.db).await?;
    let all_tags = tags::list_tags(&state.db).await?;

    let total = bookmarks::count_bookmarks(&state.db).await?;
    let pagination = calculate_pagination(total, query.page.unwrap_or(1));
    let rows = bookmarks::list_bookmarks(&state.db, pagination.page_size, pagination.offset).await?;

    let category_options: String = categories
        .iter()
        .map(|c| format!(r#"<option value="{}">{}</option>"#, escape_html(&c.id), escape_html(&c.name)))
        .collect();
    let sidebar_options: String = sidebar
        .iter()
        .flat_map(|entry| entry.categories.iter())
        .map(|c| format!(r#"<option value="{}">{}</option>"#, escape_html(&c.slug), escape_html(&c.name)))
        .collect();
    let tag_boxes: String = all_tags
        .iter()
        .map(|t| {
            format!(
                r#"<label class="chip"><input type="checkbox" name="tag" value="{}">{}</label>"#,
                escape_html(&t.id),
                escape_html(&t.name)
            )
        })
        .collect();

    let body = format!(
        r#"{header}
<p class="muted">Signed in as {email} <button id="sign-out" class="link">Sign out</button></p>
{stats}
<section class="panel">
<h2>Add bookmark</h2>
<form id="bookmark-form" class="form">
    <label>URL<input type="url" name="url" required></label>
    <button type="button" id="fetch-metadata">Fetch metadata</button>
    <label>Title<input name="title" required></label>
    <label>Description<textarea name="description" rows="3"></textarea></label>
    <label>Image URL<input name="imageUrl"></label>
    <label>Category<select name="categoryId" required>{category_options}</select></label>
    <label>Sidebar placement<select name="sidebarOption"><option value="">None</option>{sidebar_options}</select></label>
    <div class="chips">{tag_boxes}</div>
    <button type="submit">Save bookmark</button>
    <p id="bookmark-status" class="error"></p>
</form>
</section>
<section class="panel">
<h2>Bookmarks ({total})</h2>
{table}
</section>
{script}"#,
        header = page_header("Admin", "Dashboard", "Manage the directory catalog."),
        email = escape_html(&admin.email),
        stats = stat_tiles(&stats),
        category_options = category_options,
        sidebar_options = sidebar_options,
        tag_boxes = tag_boxes,
        total = pagination.total_items,
        table = bookmark_table(&rows, &pagination),
        script = DASHBOARD_SCRIPT,
    );

    Ok(Html(render_page("Dashboard", "/admin", &sidebar, &body)).into_response())
}
