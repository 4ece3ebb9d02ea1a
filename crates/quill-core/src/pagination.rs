//! Page arithmetic shared by every listing.

use serde::{Deserialize, Serialize};

/// Number of posts per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest offset a storage backend is asked to skip (Postgres `BIGINT`).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A 1-based page number plus the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: u64, per_page: u64) -> Self {
        Self { number, per_page }
    }

    /// Page `number` with the default page size.
    pub fn page(number: u64) -> Self {
        Self::new(number, DEFAULT_PAGE_SIZE)
    }

    /// Index of the first record on this page, saturating at `u64::MAX`.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Whether the first record of this page lies within [`MAX_OFFSET`].
    ///
    /// Pages beyond it cannot hold any record, so they need not be queried.
    pub fn is_addressable(&self) -> bool {
        self.number
            .saturating_sub(1)
            .checked_mul(self.per_page)
            .is_some_and(|offset| offset <= MAX_OFFSET)
    }

    /// A page is addressable when both numbers are at least 1.
    pub fn is_valid(&self) -> bool {
        self.number >= 1 && self.per_page >= 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::page(1)
    }
}

/// One page of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: request.per_page,
            total_items,
        }
    }

    /// Total number of pages. An empty sequence still has one (empty) page.
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_items, self.per_page)
    }

    /// Whether this page lies past the last one.
    pub fn is_out_of_range(&self) -> bool {
        self.number > self.total_pages()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}

/// Pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 1;
    }
    total_items.div_ceil(per_page).max(1)
}
