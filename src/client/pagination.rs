//! Explicit pagination over `total`-counted collection endpoints.
//!
//! Paged endpoints report a `total` count alongside each page of results.
//! [`fetch_all_pages`] derives the page count from the first page, fetches
//! the remainder, and concatenates by page index so the assembled collection
//! is in page order regardless of completion order.

use std::future::Future;

use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::Result;

/// Page size used by the orders collection endpoint.
pub const ORDERS_PAGE_SIZE: u32 = 20;

/// One page of a `total`-counted collection.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub total: u32,
    /// The items on this page
    pub results: Vec<T>,
}

/// Fetch every page of a collection and return the concatenated items.
///
/// `fetch` is invoked with 1-based page numbers. The first page is awaited
/// up front to learn `total`; the remaining pages are issued together and
/// joined in page order, so out-of-order completion cannot reorder results.
pub(crate) async fn fetch_all_pages<T, F, Fut>(page_size: u32, fetch: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let first = fetch(1).await?;
    let pages = first.total.div_ceil(page_size.max(1));

    let mut items = first.results;
    if pages > 1 {
        let rest = try_join_all((2..=pages).map(&fetch)).await?;
        for page in rest {
            items.extend(page.results);
        }
    }
    Ok(items)
}
