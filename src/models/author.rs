//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::book::BookSummary;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Number of books referencing this author
    #[sqlx(default)]
    pub book_count: i64,
    /// Only filled in on detail requests with `include_books`
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookSummary>>,
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(max = 200, message = "Author name must be 200 characters or less"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Biography must be 2000 characters or less"))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "Country name must be 100 characters or less"))]
    pub country: Option<String>,
}

/// Update author request; `null` clears `bio` and `country`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(max = 200, message = "Author name must be 200 characters or less"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub country: Option<Option<String>>,
}

/// Author list query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Author detail query parameters
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorDetailQuery {
    /// Include the author's books (default: true)
    #[serde(default = "include_books_default")]
    pub include_books: bool,
}

fn include_books_default() -> bool {
    true
}
