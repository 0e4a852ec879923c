//! Filter and pagination state for the list views on each dashboard.
//!
//! Every list keeps two copies of its filters. The pending copy tracks what
//! the user is typing; the committed copy is what the next list request is
//! built from. Edits only reach the request once [ListView::apply] is called,
//! and both [ListView::apply] and [ListView::reset] send the user back to the
//! first page.

mod filters;
mod quick_filter;

pub use filters::{MyTransactionFilters, Role, TransactionFilters, UserFilters, WalletFilters};
pub use quick_filter::quick_filter;

/// The filters of the admin transaction list.
pub type AdminTransactionFilters = TransactionFilters;

use serde::Serialize;

use crate::{
    Error,
    pagination::{PaginationIndicator, clamp_page, create_pagination_indicators, total_pages},
};

/// A set of optional criteria for narrowing a list request.
///
/// The default value must mean "no filtering".
pub trait FilterSet: Clone + Default + PartialEq + Serialize {
    /// The same filters without criteria that cannot narrow a list, such as
    /// blank search text.
    fn normalized(self) -> Self {
        self
    }

    /// Whether no criterion is set.
    fn is_empty(&self) -> bool {
        self.clone().normalized() == Self::default()
    }
}

/// What to ask the data-fetching layer for: one page of rows matching the
/// committed filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRequest<F> {
    /// The 1-based page number.
    pub page: u64,
    /// The page size.
    pub limit: u64,
    /// The committed filters.
    #[serde(flatten)]
    pub filters: F,
}

impl<F: Serialize> PageRequest<F> {
    /// Encode the request as URL query parameters, leaving out unset filters.
    ///
    /// # Errors
    /// Returns [Error::QueryEncodingError] if a filter value cannot be encoded.
    pub fn to_query_string(&self) -> Result<String, Error> {
        serde_urlencoded::to_string(self)
            .inspect_err(|error| tracing::error!("could not encode list request: {error}"))
            .map_err(|error| Error::QueryEncodingError(error.to_string()))
    }
}

/// The filter and page state of one list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<F> {
    page: u64,
    limit: u64,
    total: u64,
    pending: F,
    committed: F,
}

impl<F: FilterSet> ListView<F> {
    /// A list on page 1 with no filters, showing `limit` rows per page.
    pub fn new(limit: u64) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            pending: F::default(),
            committed: F::default(),
        }
    }

    /// The filter values being edited.
    pub fn pending(&self) -> &F {
        &self.pending
    }

    /// Edit the pending filter values. The request does not change until
    /// [ListView::apply] is called.
    pub fn pending_mut(&mut self) -> &mut F {
        &mut self.pending
    }

    /// The filter values the current request is built from.
    pub fn committed(&self) -> &F {
        &self.committed
    }

    /// Whether the committed filters narrow the list at all.
    pub fn has_active_filters(&self) -> bool {
        !self.committed.is_empty()
    }

    /// Commit the pending filter values and go back to the first page.
    pub fn apply(&mut self) {
        self.committed = self.pending.clone().normalized();
        self.page = 1;
    }

    /// Clear all filters and go back to the first page.
    pub fn reset(&mut self) {
        self.pending = F::default();
        self.committed = F::default();
        self.page = 1;
    }

    /// The current 1-based page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The page size.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The total row count reported with the last response.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Record the total row count reported with a response.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    /// The number of pages for the last known total, never less than one.
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.limit)
    }

    /// Go to `page`, clamped to the known pages.
    pub fn go_to(&mut self, page: u64) {
        self.page = clamp_page(page, self.total_pages());
    }

    /// Go to the previous page, staying on page 1 if already there.
    pub fn previous(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    /// Go to the next page, staying on the last page if already there.
    pub fn next(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    /// Whether there is a page before the current one.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// The request for the current page and committed filters.
    pub fn request(&self) -> PageRequest<F> {
        PageRequest {
            page: self.page,
            limit: self.limit,
            filters: self.committed.clone(),
        }
    }

    /// A short caption such as "Page 2 of 3 (25 items)".
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {} ({} items)",
            self.page,
            self.total_pages(),
            self.total
        )
    }

    /// The page strip for the current page.
    pub fn indicators(&self, max_pages: u64) -> Vec<PaginationIndicator> {
        create_pagination_indicators(self.page, self.total_pages(), max_pages)
    }
}
