//! Offset/limit pagination over list endpoints.

use thiserror::Error;

use crate::sdk::Metadata;

/// Pagination failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// There is no page after the current one.
    #[error(
        "cannot increment pagination from offset {offset} to {next_offset}: total count is {total_count}"
    )]
    CannotIncrementPagination {
        /// Offset of the current page.
        offset: i64,
        /// Offset the caller tried to move to.
        next_offset: i64,
        /// Total number of items.
        total_count: i64,
    },
}

/// A list request that can be pointed at another offset.
pub trait PageRequest: Clone {
    /// The same request at `offset`.
    fn with_offset(self, offset: i64) -> Self;
}

/// Walks the pages of a list endpoint.
#[derive(Debug, Clone)]
pub struct Pagination<R> {
    offset: i64,
    limit: i64,
    total_count: i64,
    request: R,
}

impl<R: PageRequest> Pagination<R> {
    /// Start from the metadata of the page just fetched with `request`.
    pub fn new(metadata: Metadata, request: R) -> Self {
        Self {
            offset: metadata.offset,
            // a zero limit would never advance
            limit: metadata.limit.max(1),
            total_count: metadata.total_count,
            request,
        }
    }

    /// Whether another page exists.
    pub fn can_increment(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total_count
    }

    /// Advance by one page and return the request for it.
    pub fn next_page(&mut self) -> Result<R, PaginationError> {
        let next_offset = self.offset.saturating_add(self.limit);
        if !self.can_increment() {
            return Err(PaginationError::CannotIncrementPagination {
                offset: self.offset,
                next_offset,
                total_count: self.total_count,
            });
        }
        self.offset = next_offset;
        Ok(self.request.clone().with_offset(self.offset))
    }

    /// Offset of the current page.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Page size.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Total number of items.
    pub fn total_count(&self) -> i64 {
        self.total_count
    }
}
