//! Cursor-style page walking.
//!
//! A provider page carries its items plus an optional continuation URL.
//! The walk stops only when the continuation is absent; an empty page with
//! a continuation is followed like any other.

use crate::error::AppError;
use std::future::Future;

/// One page of a paginated listing.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Fetch every page starting at `first`, concatenating items in page order.
///
/// Pages are inherently sequential (each URL comes from the previous
/// response). The first error aborts the walk and discards collected items.
pub async fn collect_pages<T, F, Fut>(first: String, mut fetch: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut next = Some(first);
    let mut pages = 0usize;

    while let Some(url) = next.take() {
        let page = fetch(url).await?;
        pages += 1;
        items.extend(page.items);
        next = page.next;
    }

    tracing::trace!(pages, items = items.len(), "Pagination complete");
    Ok(items)
}
