/// Pagination support for remote reads
///
/// Offset/limit model shared by search and catalog listings
use serde::{Deserialize, Serialize};

/// Pagination parameters for queries (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// Calculate offset for store queries
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.page_size as u64
    }

    /// Get limit for store queries
    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Parameters for the page after this one
    pub fn next(&self) -> Self {
        Self::new(self.page + 1, self.page_size)
    }

    /// A page is full when it returned exactly `page_size` rows; anything
    /// shorter marks the end of the result set.
    pub fn is_full_page(&self, returned: usize) -> bool {
        self.page_size > 0 && returned == self.page_size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_page_cursor() {
        let first = PaginationParams::new(1, 20);
        assert_eq!(first.offset(), 0);
        assert_eq!(first.next().offset(), 20);
        assert_eq!(first.next().next().offset(), 40);
        assert_eq!(first.limit(), 20);
    }

    #[test]
    fn page_zero_is_clamped() {
        assert_eq!(PaginationParams::new(0, 10).page, 1);
    }

    #[test]
    fn short_page_means_end() {
        let params = PaginationParams::default();
        assert!(params.is_full_page(20));
        assert!(!params.is_full_page(5));
        assert!(!params.is_full_page(0));
    }
}
