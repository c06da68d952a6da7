//! Collection statistics

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book-side aggregates computed by the book repository
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct BookAggregates {
    pub total_books: i64,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
    /// Distinct authors referenced by at least one book
    pub unique_authors: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorBookCount {
    pub author_id: i32,
    pub name: String,
    pub book_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryBookCount {
    pub category_id: i32,
    pub name: String,
    pub book_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryStats {
    pub total_books: i64,
    pub total_authors: i64,
    pub total_categories: i64,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
    /// Authors with at least one book
    pub unique_authors: i64,
    /// Books divided by authors with at least one book, 0 when empty
    pub average_books_per_author: f64,
    /// Sorted by book count, highest first
    pub books_per_author: Vec<AuthorBookCount>,
    pub books_per_category: Vec<CategoryBookCount>,
}
