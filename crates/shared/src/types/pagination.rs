//! Offset/limit pagination types for list endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 100;

/// Request parameters for paginated list queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of rows to skip.
    #[serde(default)]
    pub offset: u64,
    /// Maximum number of rows to return, clamped to [`MAX_LIMIT`].
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// The offset to pass to the database query.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// The limit to pass to the database query, capped at [`MAX_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT).max(1)
    }
}

/// Response wrapper for a paginated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Offset that produced this page.
    pub offset: u64,
    /// Limit that produced this page.
    pub limit: u64,
    /// Total number of rows matching the query, across all pages.
    pub total: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, offset: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta {
                offset,
                limit,
                total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_uses_zero_offset_and_default_limit() {
        let request = PageRequest::default();
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_clamped_to_max() {
        let request = PageRequest {
            offset: 0,
            limit: 10_000,
        };
        assert_eq!(request.limit(), MAX_LIMIT);
    }

    #[test]
    fn limit_of_zero_is_raised_to_one() {
        let request = PageRequest { offset: 0, limit: 0 };
        assert_eq!(request.limit(), 1);
    }

    #[test]
    fn response_carries_totals() {
        let response = PageResponse::new(vec![1, 2, 3], 0, 50, 3);
        assert_eq!(response.data, vec![1, 2, 3]);
        assert_eq!(response.meta.total, 3);
        assert_eq!(response.meta.offset, 0);
    }
}
