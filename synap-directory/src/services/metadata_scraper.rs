//! URL metadata scraping
//!
//! Fetches a page with a desktop browser user agent and extracts the title,
//! description and preview image from OpenGraph, Twitter and plain HTML
//! tags. The preview image is re-hosted when an image host is available.

use scraper::{Html, Selector};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::image_host::ImageHost;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 15;
/// Bodies past this size are truncated; metadata lives in `<head>`
const MAX_PAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image host folder for scraped preview images
pub const METADATA_IMAGE_FOLDER: &str = "synap_directory";

/// Scraper errors
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch URL: {0}")]
    Fetch(String),
}

/// Metadata returned to the admin bookmark form
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadata {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Values extracted from a page before image resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub raw_image: Option<String>,
}

/// HTTP client for page fetches
pub struct MetadataScraper {
    http_client: reqwest::Client,
}

impl MetadataScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// GET the page body; non-2xx statuses are errors
    ///
    /// At most `MAX_PAGE_BYTES` are read. The body is decoded as UTF-8 with
    /// invalid sequences replaced.
    pub async fn fetch_page(&self, url: &Url) -> Result<String, ScrapeError> {
        debug!(url = %url, "Fetching page for metadata");

        let mut response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Fetch(status.to_string()));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?
        {
            let room = MAX_PAGE_BYTES - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(url = %url, limit = MAX_PAGE_BYTES, "Page body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Parse an absolute http(s) URL
pub fn parse_page_url(raw: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(raw.trim()).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScrapeError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}

/// First non-empty attribute value among elements matching `selector`
///
/// Matches are taken in document order and blank values are skipped, so
/// `<meta property="og:image" content="">` followed by a filled one yields
/// the second element's value.
fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Extract title, description and raw preview image from page HTML
pub fn parse_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = select_attr(&document, r#"meta[property="og:title"]"#, "content")
        .or_else(|| select_text(&document, "title"))
        .unwrap_or_else(|| "Untitled".to_string());

    let description = select_attr(&document, r#"meta[property="og:description"]"#, "content")
        .or_else(|| select_attr(&document, r#"meta[name="description"]"#, "content"))
        .unwrap_or_default();

    let raw_image = select_attr(&document, r#"meta[property="og:image"]"#, "content")
        .or_else(|| select_attr(&document, r#"meta[name="twitter:image"]"#, "content"))
        .or_else(|| select_attr(&document, r#"link[rel="icon"]"#, "href"));

    PageMetadata {
        title,
        description,
        raw_image,
    }
}

/// Resolve a non-absolute image reference against the page origin
///
/// Values already starting with `http` are returned unchanged; on a
/// resolution failure the raw value is kept.
pub fn resolve_image_url(raw: &str, page: &Url) -> String {
    if raw.starts_with("http") {
        return raw.to_string();
    }

    let origin = format!("{}/", page.origin().ascii_serialization());
    match Url::parse(&origin).and_then(|base| base.join(raw)) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            warn!(raw = %raw, error = %e, "Failed to resolve relative image URL");
            raw.to_string()
        }
    }
}

/// Fetch a page and build its bookmark metadata
///
/// Upload failures never fail the request: the resolved image URL is used
/// when it is absolute, otherwise the image is dropped.
pub async fn fetch_url_metadata(
    scraper: &MetadataScraper,
    image_host: Option<&dyn ImageHost>,
    raw_url: &str,
) -> Result<UrlMetadata, ScrapeError> {
    let url = parse_page_url(raw_url)?;
    let html = scraper.fetch_page(&url).await?;
    let page = parse_metadata(&html);

    let image_url = match page.raw_image {
        Some(raw) => {
            let resolved = resolve_image_url(&raw, &url);
            rehost_image(image_host, resolved).await
        }
        None => String::new(),
    };

    Ok(UrlMetadata {
        title: page.title,
        description: page.description,
        image_url,
    })
}

async fn rehost_image(image_host: Option<&dyn ImageHost>, resolved: String) -> String {
    let uploaded = match image_host {
        Some(host) => host
            .upload_url(&resolved, METADATA_IMAGE_FOLDER)
            .await
            .map_err(|e| e.to_string()),
        None => Err("image hosting is not configured".to_string()),
    };

    match uploaded {
        Ok(hosted) => hosted,
        Err(reason) => {
            warn!(image = %resolved, reason = %reason, "Image upload failed, using source URL");
            if resolved.starts_with("http") {
                resolved
            } else {
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::image_host::ImageHostError;
    use async_trait::async_trait;
    use axum::{http::StatusCode, response::Html as HtmlResponse, routing::get, Router};

    struct FixedHost(Result<&'static str, ()>);

    #[async_trait]
    impl ImageHost for FixedHost {
        async fn upload_url(&self, _url: &str, folder: &str) -> Result<String, ImageHostError> {
            assert_eq!(folder, METADATA_IMAGE_FOLDER);
            self.0
                .map(str::to_string)
                .map_err(|_| ImageHostError::Rejected(400, "bad image".to_string()))
        }

        async fn upload_bytes(
            &self,
            _bytes: Vec<u8>,
            _file_name: &str,
            _folder: &str,
        ) -> Result<String, ImageHostError> {
            unreachable!("metadata scraping uploads by URL")
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_opengraph_preferred() {
        let page = parse_metadata(
            r#"<html><head>
                <title>Plain</title>
                <meta property="og:title" content=" OG Title ">
                <meta property="og:description" content="OG desc">
                <meta name="description" content="Plain desc">
                <meta property="og:image" content="https://img/og.png">
                <meta name="twitter:image" content="https://img/tw.png">
            </head></html>"#,
        );
        assert_eq!(page.title, "OG Title");
        assert_eq!(page.description, "OG desc");
        assert_eq!(page.raw_image.as_deref(), Some("https://img/og.png"));
    }

    #[test]
    fn test_fallbacks() {
        let page = parse_metadata(
            r#"<html><head>
                <title> Plain Title </title>
                <meta property="og:title" content="">
                <meta name="description" content="Plain desc">
                <link rel="icon" href="/favicon.ico">
            </head></html>"#,
        );
        assert_eq!(page.title, "Plain Title");
        assert_eq!(page.description, "Plain desc");
        assert_eq!(page.raw_image.as_deref(), Some("/favicon.ico"));
    }

    #[test]
    fn test_blank_match_skipped_for_later_element() {
        let page = parse_metadata(
            r#"<html><head>
                <meta property="og:image" content="  ">
                <meta property="og:image" content="https://img/second.png">
                <meta property="og:image" content="https://img/third.png">
            </head></html>"#,
        );
        assert_eq!(page.raw_image.as_deref(), Some("https://img/second.png"));
    }

    #[test]
    fn test_empty_document() {
        let page = parse_metadata("<html><body>nothing</body></html>");
        assert_eq!(page.title, "Untitled");
        assert_eq!(page.description, "");
        assert_eq!(page.raw_image, None);
    }

    #[test]
    fn test_resolve_image_against_origin() {
        let page = Url::parse("https://example.com:8443/blog/post?x=1").unwrap();
        assert_eq!(
            resolve_image_url("/img/a.png", &page),
            "https://example.com:8443/img/a.png"
        );
        assert_eq!(
            resolve_image_url("img/a.png", &page),
            "https://example.com:8443/img/a.png"
        );
        assert_eq!(
            resolve_image_url("//cdn.example.com/a.png", &page),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(resolve_image_url("https://x/y.png", &page), "https://x/y.png");
    }

    #[test]
    fn test_page_url_must_be_http() {
        assert!(parse_page_url("https://example.com").is_ok());
        assert!(matches!(parse_page_url("ftp://example.com"), Err(ScrapeError::InvalidUrl(_))));
        assert!(matches!(parse_page_url("not a url"), Err(ScrapeError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_uses_hosted_image() {
        let base = serve(Router::new().route(
            "/page",
            get(|| async {
                HtmlResponse(r#"<head><title>T</title><meta property="og:image" content="/p.png"></head>"#)
            }),
        ))
        .await;

        let scraper = MetadataScraper::new().unwrap();
        let host = FixedHost(Ok("https://cdn/hosted.png"));
        let meta = fetch_url_metadata(&scraper, Some(&host as &dyn ImageHost), &format!("{}/page", base))
            .await
            .unwrap();

        assert_eq!(meta.title, "T");
        assert_eq!(meta.image_url, "https://cdn/hosted.png");
    }

    #[tokio::test]
    async fn test_failed_upload_falls_back_to_resolved_url() {
        let base = serve(Router::new().route(
            "/page",
            get(|| async { HtmlResponse(r#"<head><link rel="icon" href="/favicon.ico"></head>"#) }),
        ))
        .await;

        let scraper = MetadataScraper::new().unwrap();
        let host = FixedHost(Err(()));
        let meta = fetch_url_metadata(&scraper, Some(&host as &dyn ImageHost), &format!("{}/page", base))
            .await
            .unwrap();
        assert_eq!(meta.image_url, format!("{}/favicon.ico", base));

        let without_host = fetch_url_metadata(&scraper, None, &format!("{}/page", base))
            .await
            .unwrap();
        assert_eq!(without_host.image_url, format!("{}/favicon.ico", base));
        assert_eq!(without_host.title, "Untitled");
    }

    #[tokio::test]
    async fn test_large_page_is_truncated() {
        let base = serve(Router::new().route(
            "/big",
            get(|| async {
                let mut page = String::from("<head><title>Big</title></head><body>");
                page.push_str(&"x".repeat(MAX_PAGE_BYTES + 1024 * 1024));
                HtmlResponse(page)
            }),
        ))
        .await;

        let scraper = MetadataScraper::new().unwrap();
        let url = Url::parse(&format!("{}/big", base)).unwrap();
        let body = scraper.fetch_page(&url).await.unwrap();
        assert_eq!(body.len(), MAX_PAGE_BYTES);

        let meta = fetch_url_metadata(&scraper, None, url.as_str()).await.unwrap();
        assert_eq!(meta.title, "Big");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = serve(Router::new().route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        ))
        .await;

        let scraper = MetadataScraper::new().unwrap();
        let err = fetch_url_metadata(&scraper, None, &format!("{}/missing", base))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch URL: 404 Not Found");
    }
}
