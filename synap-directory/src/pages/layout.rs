//! Shared page chrome: document shell, sidebar navigation, error pages

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::db::sidebar::SidebarEntry;
use crate::services::markdown::is_safe_url;
use crate::ApiError;

/// Fixed navigation items shown above the sidebar sections
const FIXED_NAV: [(&str, &str); 4] = [
    ("Explore", "/"),
    ("Prompts", "/prompts"),
    ("Markdown", "/md"),
    ("Submit", "/submit"),
];

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only http(s) and site-relative links are rendered as `href`s
pub fn safe_href(raw: &str) -> Option<String> {
    is_safe_url(raw).then(|| escape_html(raw.trim()))
}

fn nav_link(label: &str, href: &str, active_path: &str) -> String {
    let class = if href == active_path { "nav-link active" } else { "nav-link" };
    format!(
        r#"<a class="{}" href="{}">{}</a>"#,
        class,
        escape_html(href),
        escape_html(label)
    )
}

fn render_sidebar(sidebar: &[SidebarEntry], active_path: &str) -> String {
    let mut html = String::from(r#"<nav class="sidebar"><a class="brand" href="/">SynapDirectory</a>"#);

    html.push_str(r#"<div class="nav-group">"#);
    for (label, href) in FIXED_NAV {
        html.push_str(&nav_link(label, href, active_path));
    }
    html.push_str("</div>");

    for entry in sidebar {
        html.push_str(&format!(
            r#"<div class="nav-group"><p class="nav-title">{}</p>"#,
            escape_html(&entry.section.title)
        ));
        for category in &entry.categories {
            let icon = category
                .icon_url
                .as_deref()
                .and_then(safe_href)
                .map(|src| format!(r#"<img class="nav-icon" src="{}" alt="">"#, src))
                .unwrap_or_default();
            let href = format!("/{}", category.slug);
            let class = if href == active_path { "nav-link active" } else { "nav-link" };
            html.push_str(&format!(
                r#"<a class="{}" href="{}">{}{}</a>"#,
                class,
                escape_html(&href),
                icon,
                escape_html(&category.name)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(r#"<a class="nav-link nav-admin" href="/admin">Admin</a></nav>"#);
    html
}

/// Full HTML document with sidebar navigation around `body`
pub fn render_page(title: &str, active_path: &str, sidebar: &[SidebarEntry], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | SynapDirectory</title>
    <link rel="stylesheet" href="/static/synap.css">
</head>
<body>
    <div class="shell">
        {sidebar}
        <main class="content">
{body}
        </main>
    </div>
</body>
</html>"#,
        title = escape_html(title),
        sidebar = render_sidebar(sidebar, active_path),
        body = body,
    )
}

/// Page header block
pub fn page_header(eyebrow: &str, title: &str, subtitle: &str) -> String {
    format!(
        r#"<header class="page-header"><p class="eyebrow">{}</p><h1>{}</h1><p class="subtitle">{}</p></header>"#,
        escape_html(eyebrow),
        escape_html(title),
        escape_html(subtitle)
    )
}

/// Empty-state panel
pub fn empty_state(title: &str, detail: &str) -> String {
    format!(
        r#"<div class="empty-state"><h3>{}</h3><p>{}</p></div>"#,
        escape_html(title),
        escape_html(detail)
    )
}

/// Error rendered as a standalone HTML page
#[derive(Debug)]
pub struct PageError(pub ApiError);

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        PageError(err)
    }
}

impl From<synap_common::Error> for PageError {
    fn from(err: synap_common::Error) -> Self {
        PageError(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let heading = match status {
            StatusCode::NOT_FOUND => "Page not found",
            _ => "Something went wrong",
        };
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Page rendering failed");
        }

        let body = format!(
            r#"<header class="page-header"><h1>{}</h1><p class="subtitle">{}</p><p><a href="/">Back to Explore</a></p></header>"#,
            heading,
            escape_html(&self.0.to_string())
        );
        (status, Html(render_page(heading, "", &[], &body))).into_response()
    }
}

/// Result type for page handlers
pub type PageResult<T> = Result<T, PageError>;
