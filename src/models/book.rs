//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::category::CategoryRef;

/// Full book record, with its author name and categories materialized
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    /// Name of the referenced author (joined on read)
    pub author_name: Option<String>,
    /// ISBN-10 or ISBN-13, digits only
    pub isbn: String,
    /// Publication year
    pub year: i32,
    pub description: Option<String>,
    /// Page count
    pub pages: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub categories: Vec<CategoryRef>,
}

/// Short book representation used inside author and category details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub year: i32,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            year: book.year,
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(max = 300, message = "Title must be 300 characters or less"))]
    pub title: String,
    /// ID of an existing author
    pub author_id: i32,
    /// 10 or 13 digits, hyphens and spaces allowed
    pub isbn: String,
    pub year: i32,
    #[validate(length(max = 5000, message = "Description must be 5000 characters or less"))]
    pub description: Option<String>,
    pub pages: Option<i32>,
    /// IDs of existing categories
    pub category_ids: Option<Vec<i32>>,
}

/// Update book request. Absent fields are left untouched; `null` clears
/// `description` and `pages`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(max = 300, message = "Title must be 300 characters or less"))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub isbn: Option<String>,
    pub year: Option<i32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub pages: Option<Option<i32>>,
    /// Replaces the whole category set when present
    pub category_ids: Option<Vec<i32>>,
}

/// Book list query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 10, max: 100)
    pub per_page: Option<i64>,
    /// Case-insensitive match against title or author name
    pub search: Option<String>,
    /// Case-insensitive match against a category name
    pub category: Option<String>,
    /// Publication year
    pub year: Option<i32>,
    pub author_id: Option<i32>,
}

/// Normalized filter handed to the repository; every present predicate must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub author_id: Option<i32>,
}

impl BookFilter {
    /// Blank search/category terms mean "no filter"
    pub fn from_query(query: &BookQuery) -> Self {
        fn term(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            search: term(&query.search),
            category: term(&query.category),
            year: query.year,
            author_id: query.author_id,
        }
    }
}
