//! List screen state: a growing, append-only sequence of catalog pages.

use tracing::{debug, warn};

use crate::error::{FetchError, Notice};
use crate::models::{ListItem, Page};

/// Load the next page once the selection is within this fraction of a
/// viewport from the last row.
pub const END_REACHED_THRESHOLD: f64 = 0.5;

/// A page load the runtime should perform. Handed back to `apply_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct ListScreen {
    items: Vec<ListItem>,
    page_size: usize,
    /// Offset of the next page to request.
    offset: usize,
    loading: bool,
    has_more: bool,
    selected: usize,
}

impl ListScreen {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_size,
            offset: 0,
            loading: false,
            has_more: true,
            selected: 0,
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.items.get(self.selected)
    }

    /// The explicit "load" action. Only offered while nothing is shown yet.
    pub fn request_initial(&mut self) -> Option<PageRequest> {
        if !self.items.is_empty() {
            return None;
        }
        self.begin(0)
    }

    /// Ask for the page after the last one applied.
    ///
    /// Returns `None` while a load is in flight or once upstream reported the
    /// end of the catalog.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        self.begin(self.offset)
    }

    fn begin(&mut self, offset: usize) -> Option<PageRequest> {
        if self.loading {
            debug!(offset, "page load suppressed, another load is in flight");
            return None;
        }
        self.loading = true;
        Some(PageRequest { offset })
    }

    /// Whether the selection sits within half a viewport (in rows) of the end.
    pub fn near_end(&self, viewport: usize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let remaining = self.items.len() - 1 - self.selected.min(self.items.len() - 1);
        remaining as f64 <= viewport as f64 * END_REACHED_THRESHOLD
    }

    /// Move down one row; returns a page request when that brings the end close.
    pub fn select_next(&mut self, viewport: usize) -> Option<PageRequest> {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
        if self.near_end(viewport) {
            self.request_more()
        } else {
            None
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Merge a completed page. A request at offset 0 replaces what is shown,
    /// anything else is appended after the current items.
    pub fn apply_page(&mut self, request: PageRequest, page: Page) {
        debug!(
            offset = request.offset,
            count = page.items.len(),
            has_next = page.has_next,
            "applying catalog page"
        );
        if request.offset == 0 {
            self.items = page.items;
            self.selected = 0;
        } else {
            self.items.extend(page.items);
        }
        self.offset = request.offset + self.page_size;
        if !page.has_next {
            self.has_more = false;
        }
        self.loading = false;
    }

    /// Record a failed load. Items already shown stay as they are.
    pub fn fail(&mut self, request: PageRequest, err: &FetchError) -> Notice {
        warn!(offset = request.offset, error = %err, "failed to load catalog page");
        self.loading = false;
        Notice::list_failed()
    }
}
