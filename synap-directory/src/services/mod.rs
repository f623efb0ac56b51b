//! Outbound integrations and content rendering

pub mod image_host;
pub mod markdown;
pub mod metadata_scraper;

pub use image_host::{CloudinaryClient, ImageHost, ImageHostError};
pub use markdown::render_markdown;
pub use metadata_scraper::{fetch_url_metadata, MetadataScraper, ScrapeError, UrlMetadata};
