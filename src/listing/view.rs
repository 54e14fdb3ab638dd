use crate::listing::eligibility::is_eligible;
use crate::listing::matcher::{matches_name, matches_stock, matches_vin, normalize_vin_query};
use crate::listing::sort::sort_records;
use crate::model::{SearchMode, SearchQuery, SortOrder, VehicleRecord};
use crate::normalizer::normalize;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Filters and orders the fetched records for display.
///
/// Ineligible records are dropped first, then the search filter applies (skipped for
/// an empty query), then the stable sort. The input is only borrowed.
pub fn build_view<'a>(
    records: &'a [VehicleRecord],
    search: &SearchQuery,
    sort: SortOrder,
) -> Vec<&'a VehicleRecord> {
    let query = search.query.trim();
    let vin_query = normalize_vin_query(query);

    let mut view: Vec<&VehicleRecord> = records
        .iter()
        .filter(|r| is_eligible(r))
        .filter(|r| {
            if query.is_empty() {
                return true;
            }
            match search.mode {
                SearchMode::Stock => matches_stock(r, query),
                SearchMode::Vin => matches_vin(r, &normalize(r), &vin_query),
                SearchMode::Name => matches_name(r, &normalize(r), query),
            }
        })
        .collect();

    sort_records(&mut view, sort);
    debug!(
        "Built view: {} of {} records (mode={}, query='{}', sort={})",
        view.len(),
        records.len(),
        search.mode,
        query,
        sort
    );
    view
}

/// Incremental "load more" paging over a built view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    pages_revealed: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A zero page size is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            pages_revealed: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn pages_revealed(&self) -> usize {
        self.pages_revealed
    }

    fn limit(&self) -> usize {
        self.page_size.saturating_mul(self.pages_revealed)
    }

    pub fn visible<'v, T>(&self, result: &'v [T]) -> &'v [T] {
        &result[..result.len().min(self.limit())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.limit() < total
    }

    /// Reveals one more page while anything is still hidden. Returns whether it grew.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.pages_revealed += 1;
        true
    }

    /// Back to the first page, as after a new search or sort.
    pub fn reset(&mut self) {
        self.pages_revealed = 1;
    }
}
