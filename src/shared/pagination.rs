//! Seek Pagination
//!
//! Cursor-based "slice" pagination shared by the room-list and
//! message-history queries. Cursors are exclusive ids, so pages stay stable
//! under concurrent inserts; a slice never carries a total count.

use serde::Serialize;

/// Default page size when the caller does not request one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size to prevent excessive queries.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A page of results plus a has-more flag.
#[derive(Debug, Clone, Serialize)]
pub struct Slice<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Slice<T> {
    /// Build a slice from rows fetched with a one-row lookahead.
    ///
    /// The query fetches `page_size + 1` rows; the extra row only signals
    /// that another page exists and is trimmed from the result.
    pub fn from_lookahead(mut rows: Vec<T>, page_size: usize) -> Self {
        let has_more = rows.len() > page_size;
        rows.truncate(page_size);
        Self {
            items: rows,
            has_more,
        }
    }

    /// Map the items of the slice, keeping the has-more flag.
    pub fn map<U, F>(self, f: F) -> Slice<U>
    where
        F: FnMut(T) -> U,
    {
        Slice {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
        }
    }
}

/// Clamp a requested page size into the allowed range, applying the default
/// when absent.
pub fn clamp_page_size(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}
