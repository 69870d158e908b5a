//! Page arithmetic for list views.
//!
//! A [`PageDescriptor`] is derived per request from the requested page
//! number, the configured page size and the number of matching records.
//! A page size of `0` disables pagination.
//!
//! # Examples
//!
//! ```
//! use viewkit_views::pagination::PageDescriptor;
//!
//! let page = PageDescriptor::new(4, 3, 11);
//! assert_eq!(page.page_count(), Some(4));
//! assert_eq!(page.slice_range(), Some(9..12));
//! assert!(!page.has_next());
//! assert!(page.has_previous());
//! ```

use std::ops::Range;

/// The position of one page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDescriptor {
    number: usize,
    per_page: usize,
    total: usize,
}

impl PageDescriptor {
    /// Creates a descriptor. Page numbers below 1 are raised to 1.
    pub fn new(number: usize, per_page: usize, total: usize) -> Self {
        Self {
            number: number.max(1),
            per_page,
            total,
        }
    }

    /// The 1-based page number.
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Records per page, `0` when not paginated.
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of matching records.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` when a page size is set.
    pub const fn is_paginated(&self) -> bool {
        self.per_page > 0
    }

    /// `ceil(total / per_page)`, or `None` when not paginated.
    pub const fn page_count(&self) -> Option<usize> {
        if self.per_page == 0 {
            None
        } else {
            Some(self.total.div_ceil(self.per_page))
        }
    }

    /// The record range `[(n-1)*size, n*size)` for this page.
    ///
    /// `None` when not paginated or when the bounds overflow.
    pub fn slice_range(&self) -> Option<Range<usize>> {
        if self.per_page == 0 {
            return None;
        }
        let start = (self.number - 1).checked_mul(self.per_page)?;
        let end = self.number.checked_mul(self.per_page)?;
        Some(start..end)
    }

    /// Returns `true` when a later page holds records.
    pub fn has_next(&self) -> bool {
        self.page_count().is_some_and(|count| self.number < count)
    }

    /// Returns `true` when this is not the first page of a paginated set.
    pub const fn has_previous(&self) -> bool {
        self.is_paginated() && self.number > 1
    }

    /// The next page number, if there is one.
    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    /// The previous page number, if there is one.
    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then_some(self.number - 1)
    }
}
