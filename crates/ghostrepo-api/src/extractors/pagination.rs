//! `?page=&per_page=` query for the owner dashboard listing.

use serde::Deserialize;

use ghostrepo_core::types::pagination::PageRequest;

/// Dashboard rows per page when the query leaves it out.
const DASHBOARD_PAGE_SIZE: u64 = 25;

/// Page selector; out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: u64,
    pub per_page: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DASHBOARD_PAGE_SIZE,
        }
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page, query.per_page)
    }
}
