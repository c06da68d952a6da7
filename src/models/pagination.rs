//! Pagination request and response types

use serde::Serialize;
use utoipa::ToSchema;

use super::{author::Author, book::Book};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// A validated page request (see `validation::validate_pagination`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of a listing
#[derive(Debug, Serialize, ToSchema)]
#[aliases(BookPage = Page<Book>, AuthorPage = Page<Author>)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    /// Number of matching records across all pages
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    /// Number of pages (0 when nothing matches)
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + pagination.per_page - 1) / pagination.per_page
        };

        Self {
            items,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            pages,
            has_next: pagination.page < pages,
            has_prev: pagination.page > 1,
        }
    }
}
