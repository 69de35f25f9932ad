//! # Client-side pagination
//!
//! Directory lists are fetched whole and sliced in memory. [`Paginator`] keeps the
//! current page (1-based) and the page size; the visible window is recomputed from those
//! and the current list length on every call, so it follows the list as it changes.

/// Default number of rows per directory page.
pub const DEFAULT_PAGE_SIZE: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A paginator on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total` rows; at least 1.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Index of the first visible row.
    pub fn start(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Index one past the last visible row. The last page may be a remainder, so the end
    /// is clamped to the list length.
    pub fn end(&self, total: usize) -> usize {
        (self.start() + self.page_size).min(total)
    }

    /// The rows visible on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start().min(items.len());
        &items[start..self.end(items.len())]
    }

    pub fn set_page(&mut self, page: usize, total: usize) {
        self.page = page.clamp(1, self.page_count(total));
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Move forward if there is a next page. Returns whether the page changed.
    pub fn next(&mut self, total: usize) -> bool {
        if self.page < self.page_count(total) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Keep the current page in range after the list shrank.
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.page_count(total));
    }
}
