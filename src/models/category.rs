//! Category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::book::BookSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(default)]
    pub book_count: i64,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookSummary>>,
}

/// Category reference embedded in a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

/// Create category request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(max = 100, message = "Category name must be 100 characters or less"))]
    pub name: String,
    #[validate(length(max = 500, message = "Category description must be 500 characters or less"))]
    pub description: Option<String>,
}

/// Update category request; `null` clears `description`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(max = 100, message = "Category name must be 100 characters or less"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Category detail query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CategoryDetailQuery {
    /// Include the books tagged with this category (default: false)
    #[serde(default)]
    pub include_books: bool,
}
