//! Repository layer.
//!
//! One async trait per entity defines the storage contract. Two backends
//! implement all three traits: [`memory::MemoryStore`] (process lifetime) and
//! the PostgreSQL repositories in [`books`], [`authors`] and [`categories`].
//! Relations are never loaded lazily: every method states what it returns,
//! and `Book` values always come back with their author name and categories.

pub mod authors;
pub mod books;
pub mod categories;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorBookCount, Book, BookAggregates, BookFilter, BookSummary, Category,
        CategoryBookCount, CreateAuthor, CreateBook, CreateCategory, Pagination, UpdateAuthor,
        UpdateBook, UpdateCategory,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Books matching every predicate of `filter`, ordered by id, plus the total match count
    async fn list(&self, filter: &BookFilter, pagination: Pagination) -> AppResult<(Vec<Book>, i64)>;

    async fn get(&self, id: i32) -> AppResult<Option<Book>>;

    /// Exact match on the normalized ISBN, optionally ignoring one book
    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    /// Insert a book and its category associations atomically
    async fn create(&self, data: &CreateBook) -> AppResult<Book>;

    /// Apply the supplied fields and stamp `updated_at`; `None` if the book does not exist
    async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Option<Book>>;

    /// Remove a book and its association rows; `false` if it did not exist
    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn aggregates(&self) -> AppResult<BookAggregates>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Authors ordered by name then id, plus the total count
    async fn list(&self, pagination: Pagination) -> AppResult<(Vec<Author>, i64)>;

    async fn get(&self, id: i32) -> AppResult<Option<Author>>;

    async fn books(&self, author_id: i32) -> AppResult<Vec<BookSummary>>;

    async fn create(&self, data: &CreateAuthor) -> AppResult<Author>;

    async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Option<Author>>;

    /// Fails with `Conflict` while any book references the author
    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;

    async fn book_counts(&self) -> AppResult<Vec<AuthorBookCount>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name then id
    async fn list(&self) -> AppResult<Vec<Category>>;

    async fn get(&self, id: i32) -> AppResult<Option<Category>>;

    async fn books(&self, category_id: i32) -> AppResult<Vec<BookSummary>>;

    /// The subset of `ids` with no stored category, ascending
    async fn missing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>>;

    /// Exact (case-sensitive) name match, optionally ignoring one category
    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    async fn create(&self, data: &CreateCategory) -> AppResult<Category>;

    async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<Option<Category>>;

    /// Remove a category and its association rows, never the books
    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;

    async fn book_counts(&self) -> AppResult<Vec<CategoryBookCount>>;
}

/// Storage handles shared by all services
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Repositories backed by the given database pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::PgBookRepository::new(pool.clone())),
            authors: Arc::new(authors::PgAuthorRepository::new(pool.clone())),
            categories: Arc::new(categories::PgCategoryRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repositories sharing one in-memory store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            books: Arc::new(store.clone()),
            authors: Arc::new(store.clone()),
            categories: Arc::new(store),
            pool: None,
        }
    }

    pub fn from_parts(
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            books,
            authors,
            categories,
            pool: None,
        }
    }

    /// Check that the storage backend answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(ref pool) = self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

pub(crate) fn author_has_books(book_count: i64) -> AppError {
    AppError::Conflict(format!(
        "Cannot delete author with existing books. Delete {} book(s) first.",
        book_count
    ))
}

pub(crate) fn missing_categories(ids: &[i32]) -> AppError {
    let list = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    AppError::NotFound(format!("Category IDs not found: {}", list))
}

/// Name of the constraint a database error violated, if any
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    err.as_database_error().and_then(|db_err| db_err.constraint())
}

/// Escape LIKE wildcards and wrap the term for a substring match
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("clean"), "%clean%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }

    #[test]
    fn test_missing_categories_message() {
        let err = missing_categories(&[3, 7]);
        assert_eq!(err.to_string(), "Category IDs not found: 3, 7");
    }
}
