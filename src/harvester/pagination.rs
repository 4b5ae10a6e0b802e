//! Page traversal over the query API's numbered connections
//!
//! Two strategies live here. `collect_pages` walks a bounded connection to
//! completion, one page at a time. `WatermarkPager` handles the tournament
//! listing, which grows while it is being read and is too large to walk in
//! one pass: each pass is capped at a window of pages, and the pass boundary
//! is re-based on the start-timestamp watermark so later passes resume where
//! the previous one stopped without re-emitting boundary ties.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, warn};

use crate::constants::paging::LISTING_WINDOW_PAGES;
use crate::error::AppError;

/// One fetched page of a connection, with the server-reported page count.
#[derive(Debug)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub total_pages: u32,
}

/// Collects the union of all items across pages `1..=totalPages`.
///
/// The total page count is only known after the first fetch, so page 1 is
/// requested speculatively and the loop condition re-evaluated after every
/// page. Pages are fetched strictly in increasing order, never in parallel.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut page = 1u32;
    loop {
        let batch = fetch_page(page).await?;
        let total_pages = batch.total_pages;
        items.extend(batch.nodes);
        if page >= total_pages {
            break;
        }
        page += 1;
    }
    Ok(items)
}

/// Items traversable by `WatermarkPager`: ordered by a timestamp key, with a
/// unique identity for duplicate suppression across passes.
pub trait Watermarked {
    fn ordering_key(&self) -> i64;
    fn identity(&self) -> &str;
}

/// Windowed traversal of a live, growing, timestamp-ordered listing.
///
/// Each `run_pass` walks a window of pages. When the window fills before
/// the listing is exhausted, the pager remembers the identities of the
/// maximal trailing run of items sharing the last item's start timestamp
/// (tracked across page boundaries) and re-bases the next pass's
/// lower-bound filter to that timestamp. The remembered identities keep the
/// boundary ties from being emitted twice when the next pass re-fetches
/// them.
pub struct WatermarkPager {
    since: i64,
    window_pages: u32,
    seen: HashSet<String>,
}

impl WatermarkPager {
    pub fn new(since: i64) -> Self {
        Self::with_window(since, LISTING_WINDOW_PAGES)
    }

    pub fn with_window(since: i64, window_pages: u32) -> Self {
        Self {
            since,
            window_pages: window_pages.max(1),
            seen: HashSet::new(),
        }
    }

    /// Current lower-bound filter value (unix seconds).
    pub fn since(&self) -> i64 {
        self.since
    }

    /// Whether an item identity has been recorded at a pass boundary.
    pub fn is_seen(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    /// Runs one windowed pass. `fetch_page` receives the page number and the
    /// current watermark lower bound. Returns the pass's fresh items and
    /// whether the listing was exhausted (page index passed the server's
    /// total page count) rather than merely window-capped.
    ///
    /// The boundary run may span pages, so the maximal trailing run of
    /// identical ordering keys is tracked across the whole pass. When the
    /// window fills while the trailing key still equals the watermark (a tie
    /// run longer than the window, or empty pages), capping could never make
    /// progress, so the pass keeps fetching past the window until the key
    /// moves or the listing ends.
    pub async fn run_pass<T, F, Fut>(&mut self, mut fetch_page: F) -> Result<(Vec<T>, bool), AppError>
    where
        T: Watermarked,
        F: FnMut(u32, i64) -> Fut,
        Fut: Future<Output = Result<Page<T>, AppError>>,
    {
        let mut items = Vec::new();
        let mut run_key: Option<i64> = None;
        let mut run_ids: Vec<String> = Vec::new();
        let mut page = 1u32;
        loop {
            let batch = fetch_page(page, self.since).await?;
            let total_pages = batch.total_pages;

            for item in batch.nodes {
                if run_key != Some(item.ordering_key()) {
                    run_key = Some(item.ordering_key());
                    run_ids.clear();
                }
                run_ids.push(item.identity().to_string());

                if self.seen.contains(item.identity()) {
                    debug!("Skipping already-seen item {}", item.identity());
                    continue;
                }
                items.push(item);
            }

            if page >= total_pages {
                return Ok((items, true));
            }
            if page >= self.window_pages {
                match run_key {
                    Some(boundary) if boundary != self.since => {
                        // Remembered after emission, so the ties were still
                        // processed in this pass
                        self.since = boundary;
                        for identity in run_ids {
                            self.seen.insert(identity);
                        }
                        return Ok((items, false));
                    }
                    _ => warn!(
                        "Window filled at page {page} without advancing the watermark ({}); extending the pass",
                        self.since
                    ),
                }
            }
            page += 1;
        }
    }
}
