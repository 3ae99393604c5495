//! Server-driven pagination.
//!
//! The inventory service pages with `page` / `per_page` query parameters and
//! returns a bare array: no total count and no cursor. Whether another page
//! exists can only be guessed from how full the current one is.

use super::validation::ValidationError;

/// Which page of results to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Page size used when none is given.
    pub const DEFAULT_PER_PAGE: u32 = 10;

    /// Create a page request. Pages are numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPage`] if `page` or `per_page` is 0.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage {
                field: "page",
                value: page,
            });
        }
        if per_page == 0 {
            return Err(ValidationError::InvalidPage {
                field: "per_page",
                value: per_page,
            });
        }
        Ok(Self { page, per_page })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Maximum number of items on a page.
    #[must_use]
    pub const fn per_page(self) -> u32 {
        self.per_page
    }

    /// The following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }

    /// The preceding page, staying on page 1 when already there.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self {
            page: if self.page > 1 { self.page - 1 } else { 1 },
            per_page: self.per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results together with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap the items returned for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest) -> Self {
        Self { items, request }
    }

    /// The items on this page, in service order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The request this page answers.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a further page *may* exist.
    ///
    /// True when this page is full-sized. This is a heuristic: the service
    /// reports neither a total nor a cursor, so a last page that happens to
    /// be exactly full is indistinguishable from one with more behind it,
    /// and the next request will come back empty.
    #[must_use]
    pub fn has_more(&self) -> bool {
        u32::try_from(self.items.len()).map_or(true, |len| len >= self.request.per_page)
    }
}
