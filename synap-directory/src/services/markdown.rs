//! Markdown rendering for community posts

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Replacement destination for links with a disallowed scheme
const BLOCKED_LINK: &str = "#";

/// True for `http(s)://` URLs and site-relative paths (not `//host`)
pub fn is_safe_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    let lowered = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
    lowered.starts_with("https://")
        || lowered.starts_with("http://")
        || (trimmed.starts_with('/') && !trimmed.starts_with("//"))
}

fn guard_destination(dest_url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&dest_url) {
        dest_url
    } else {
        CowStr::Borrowed(BLOCKED_LINK)
    }
}

/// Render CommonMark (with tables and strikethrough) to HTML
///
/// Raw HTML in the source is emitted as escaped text. Link and image
/// destinations outside `http(s)` and site-relative paths become `#`.
///
/// # Examples
///
/// ```
/// use synap_directory::services::render_markdown;
///
/// assert_eq!(render_markdown("**hi**"), "<p><strong>hi</strong></p>\n");
/// assert!(render_markdown("<script>x</script>").contains("&lt;script&gt;"));
/// ```
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: guard_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: guard_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
