//! Page arithmetic for the admin bookmark listing

use serde::{Deserialize, Serialize};

/// Bookmarks per page
pub const PAGE_SIZE: i64 = 100;

/// `?page=` query parameter (1-indexed, defaults to the first page)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Resolved page window plus the totals echoed back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    #[serde(skip)]
    pub offset: i64,
}

/// Clamp `requested_page` into `[1, total_pages]` and compute the offset
///
/// # Examples
/// ```
/// use synap_directory::pagination::calculate_pagination;
///
/// let p = calculate_pagination(250, 99);
/// assert_eq!((p.page, p.total_pages, p.offset), (3, 3, 200));
/// ```
pub fn calculate_pagination(total_items: i64, requested_page: i64) -> Pagination {
    let total_pages = (total_items + PAGE_SIZE - 1) / PAGE_SIZE;
    let page = requested_page.clamp(1, total_pages.max(1));

    Pagination {
        page,
        page_size: PAGE_SIZE,
        total_items,
        total_pages,
        offset: (page - 1) * PAGE_SIZE,
    }
}
