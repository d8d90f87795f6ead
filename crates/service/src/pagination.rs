//! Page parameters for booking listings.

use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based; 0 reads as the first page.
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Zero-based page index and a page size clamped to `1..=MAX_PER_PAGE`.
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        (u64::from(page - 1), u64::from(per_page))
    }

    /// Rows to skip and rows to take, for stores that slice in memory.
    pub fn window(self) -> (usize, usize) {
        let (idx, per_page) = self.normalize();
        ((idx * per_page) as usize, per_page as usize)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
