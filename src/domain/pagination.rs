//! Page-based pagination shared by the listing operations

use super::DomainError;

/// A validated 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Create a page request, rejecting a page or page size below 1
    pub fn new(page: u32, page_size: u32) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::validation("page must be at least 1"));
        }

        if page_size < 1 {
            return Err(DomainError::validation("page size must be at least 1"));
        }

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items to skip before this page, saturating at `usize::MAX`
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// One page of results plus the total number of matching items
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }

    /// Total number of pages for the given page size
    pub fn total_pages(&self, page_size: u32) -> usize {
        self.total.div_ceil(page_size.max(1) as usize)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
