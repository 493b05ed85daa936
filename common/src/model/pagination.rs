use serde::{Deserialize, Serialize};

/// Pagination block returned alongside a page of verses by `GET /api/quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Builds the block for `page` (1-based) of `limit` items out of `total_items`.
    pub fn new(page: u64, limit: u64, total_items: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(limit)
        };
        Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: page.saturating_mul(limit) < total_items,
            has_prev_page: page > 1,
        }
    }
}
