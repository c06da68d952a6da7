//! Data models for Booklib

pub mod author;
pub mod book;
pub mod category;
pub mod pagination;
pub mod stats;

// Re-export commonly used types
pub use author::{Author, AuthorDetailQuery, AuthorQuery, CreateAuthor, UpdateAuthor};
pub use book::{Book, BookFilter, BookQuery, BookSummary, CreateBook, UpdateBook};
pub use category::{Category, CategoryDetailQuery, CategoryRef, CreateCategory, UpdateCategory};
pub use pagination::{AuthorPage, BookPage, Page, Pagination};
pub use stats::{AuthorBookCount, BookAggregates, CategoryBookCount, LibraryStats};
