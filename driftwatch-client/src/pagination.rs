//! Paginated collection
//!
//! GitLab list endpoints return at most `per_page` items per request. The
//! collector walks pages until one comes back short.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::fetcher::Fetcher;

/// Items requested per page, and the threshold for "last page"
pub const PAGE_SIZE: usize = 100;

/// Index of the first page in GitLab's pagination
pub const FIRST_PAGE: u32 = 1;

/// Collects every item of a paginated listing, in received order
///
/// `page_url` maps a page index to the URL of that page. Collection stops at
/// the first page holding fewer than [`PAGE_SIZE`] items, so an exactly full
/// last page costs one extra (empty) round trip. Any failure aborts the
/// whole collection; nothing gathered so far is returned.
///
/// `max_pages` bounds the walk for endpoints that never return a short
/// page; `None` means unbounded.
pub async fn collect_all<T, F>(fetcher: &Fetcher, page_url: F, max_pages: Option<u32>) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(u32) -> String,
{
    let mut items = Vec::new();
    let mut page = FIRST_PAGE;

    loop {
        let url = page_url(page);

        if let Some(max_pages) = max_pages {
            if page - FIRST_PAGE >= max_pages {
                return Err(ClientError::PageLimit { url, max_pages });
            }
        }

        let batch: Vec<T> = fetcher.get(&url).await?;
        let received = batch.len();
        items.extend(batch);

        debug!("Page {} of {} held {} item(s)", page, url, received);

        if received < PAGE_SIZE {
            return Ok(items);
        }
        page += 1;
    }
}
