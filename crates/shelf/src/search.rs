#![forbid(unsafe_code)]

//! Debounced listing search.
//!
//! [`BookSearch`] sits between the filter input and the listing request:
//! keystrokes go through a [`DebouncedValueCell`], and only the settled
//! filter ever reaches the query. A settled filter change also resets the
//! listing to its first page.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use shelf_core::{Scheduler, ShelfConfig};
use shelf_runtime::{DebouncedValueCell, Subscription};
use tracing::debug;

/// Response header carrying the total number of matching records.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Page size used when none is configured.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Parameters of one listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    #[serde(rename = "_page")]
    pub page: u32,
    #[serde(rename = "_limit")]
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl SearchQuery {
    /// Query-string pairs, in request order.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("_page", self.page.to_string()),
            ("_limit", self.limit.to_string()),
        ];
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        params
    }

    /// Number of pages needed for `total` records.
    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        total.div_ceil(u64::from(self.limit))
    }
}

/// Parse the total-count header of a listing response.
///
/// Returns `None` when the header is absent or not a non-negative integer.
#[must_use]
pub fn parse_total_count(header: Option<&str>) -> Option<u64> {
    header?.trim().parse().ok()
}

/// Filter input and pagination state of the book listing.
pub struct BookSearch {
    filter: DebouncedValueCell<String>,
    page: Rc<Cell<u32>>,
    limit: Rc<Cell<u32>>,
    _reset_page: Subscription,
}

impl std::fmt::Debug for BookSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookSearch")
            .field("filter", &self.filter)
            .field("page", &self.page.get())
            .field("limit", &self.limit.get())
            .finish()
    }
}

impl BookSearch {
    /// Create a search with an empty filter on page 1.
    pub fn new(delay: Duration, scheduler: &Scheduler) -> Self {
        let filter = DebouncedValueCell::new(String::new(), delay, scheduler);
        let page = Rc::new(Cell::new(1));
        let reset = Rc::clone(&page);
        let reset_page = filter.subscribe(move |q: &String| {
            debug!(filter_len = q.len() as u64, "search filter settled");
            reset.set(1);
        });
        Self {
            filter,
            page,
            limit: Rc::new(Cell::new(DEFAULT_PAGE_LIMIT)),
            _reset_page: reset_page,
        }
    }

    /// Create a search using the configured debounce delay.
    pub fn with_config(config: &ShelfConfig, scheduler: &Scheduler) -> Self {
        Self::new(config.debounce_delay, scheduler)
    }

    /// Set the page size. Zero is treated as one.
    #[must_use]
    pub fn with_limit(self, limit: u32) -> Self {
        self.set_limit(limit);
        self
    }

    /// Change the page size. Zero is treated as one.
    pub fn set_limit(&self, limit: u32) {
        self.limit.set(limit.max(1));
    }

    /// Feed a keystroke's worth of filter text.
    pub fn input(&self, text: impl Into<String>) {
        self.filter.set(text.into());
    }

    /// The settled filter text.
    #[must_use]
    pub fn filter(&self) -> String {
        self.filter.get()
    }

    /// Whether typed text is still waiting to settle.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.filter.has_pending()
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.get()
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Jump to `page`. Pages are 1-based; zero is treated as one.
    pub fn set_page(&self, page: u32) {
        self.page.set(page.max(1));
    }

    /// Parameters for the listing request, built from settled state only.
    #[must_use]
    pub fn query(&self) -> SearchQuery {
        self.filter
            .with(|text| build_query(text, self.page.get(), self.limit.get()))
    }

    /// Register a callback invoked with the new query each time the filter settles.
    ///
    /// The page has already been reset when the callback runs.
    pub fn subscribe(&self, callback: impl Fn(&SearchQuery) + 'static) -> Subscription {
        let page = Rc::clone(&self.page);
        let limit = Rc::clone(&self.limit);
        self.filter.subscribe(move |text: &String| {
            callback(&build_query(text, page.get(), limit.get()));
        })
    }
}

fn build_query(filter: &str, page: u32, limit: u32) -> SearchQuery {
    let trimmed = filter.trim();
    SearchQuery {
        page,
        limit,
        q: (!trimmed.is_empty()).then(|| trimmed.to_string()),
    }
}
