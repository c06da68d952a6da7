//! Statistics service

use crate::{error::AppResult, models::LibraryStats, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Collection-wide counts and per-author / per-category breakdowns
    pub async fn get_stats(&self) -> AppResult<LibraryStats> {
        let aggregates = self.repository.books.aggregates().await?;
        let total_authors = self.repository.authors.count().await?;
        let total_categories = self.repository.categories.count().await?;
        let books_per_author = self.repository.authors.book_counts().await?;
        let books_per_category = self.repository.categories.book_counts().await?;

        let average_books_per_author = if aggregates.unique_authors > 0 {
            let average = aggregates.total_books as f64 / aggregates.unique_authors as f64;
            (average * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(LibraryStats {
            total_books: aggregates.total_books,
            total_authors,
            total_categories,
            earliest_year: aggregates.earliest_year,
            latest_year: aggregates.latest_year,
            unique_authors: aggregates.unique_authors,
            average_books_per_author,
            books_per_author,
            books_per_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::{AppError, ErrorKind},
        models::{BookAggregates, CreateAuthor, CreateBook},
        repository::{MockAuthorRepository, MockBookRepository, MockCategoryRepository},
        services::Services,
    };

    #[tokio::test]
    async fn test_empty_collection() {
        let services = Services::new(Repository::in_memory());
        let stats = services.stats.get_stats().await.unwrap();

        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.earliest_year, None);
        assert_eq!(stats.average_books_per_author, 0.0);
        assert!(stats.books_per_author.is_empty());
    }

    #[tokio::test]
    async fn test_average_counts_only_authors_with_books() {
        let services = Services::new(Repository::in_memory());
        let mut author_ids = Vec::new();
        for name in ["Kent Beck", "Martin Fowler", "Eric Evans"] {
            let author = services
                .authors
                .create(&CreateAuthor {
                    name: name.into(),
                    bio: None,
                    country: None,
                })
                .await
                .unwrap();
            author_ids.push(author.id);
        }

        let books = [
            (author_ids[0], "0321146530", 2002),
            (author_ids[0], "0201616416", 1999),
            (author_ids[0], "0321278658", 2004),
            (author_ids[1], "0201485672", 1999),
        ];
        for (i, (author_id, isbn, year)) in books.into_iter().enumerate() {
            services
                .books
                .create(&CreateBook {
                    title: format!("Book {}", i + 1),
                    author_id,
                    isbn: isbn.into(),
                    year,
                    description: None,
                    pages: None,
                    category_ids: None,
                })
                .await
                .unwrap();
        }

        let stats = services.stats.get_stats().await.unwrap();
        assert_eq!(stats.total_books, 4);
        assert_eq!(stats.total_authors, 3);
        assert_eq!(stats.unique_authors, 2);
        assert_eq!(stats.average_books_per_author, 2.0);
        assert_eq!(stats.earliest_year, Some(1999));
        assert_eq!(stats.latest_year, Some(2004));
        assert_eq!(stats.books_per_author[0].name, "Kent Beck");
        assert_eq!(stats.books_per_author[0].book_count, 3);
        assert_eq!(stats.books_per_author.len(), 3);
    }

    #[tokio::test]
    async fn test_average_is_rounded() {
        let mut books = MockBookRepository::new();
        books.expect_aggregates().returning(|| {
            Ok(BookAggregates {
                total_books: 10,
                earliest_year: Some(1990),
                latest_year: Some(2020),
                unique_authors: 3,
            })
        });
        let mut authors = MockAuthorRepository::new();
        authors.expect_count().returning(|| Ok(3));
        authors.expect_book_counts().returning(|| Ok(Vec::new()));
        let mut categories = MockCategoryRepository::new();
        categories.expect_count().returning(|| Ok(0));
        categories.expect_book_counts().returning(|| Ok(Vec::new()));

        let service = StatsService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(authors),
            Arc::new(categories),
        ));

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.average_books_per_author, 3.33);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut books = MockBookRepository::new();
        books
            .expect_aggregates()
            .returning(|| Err(AppError::Internal("boom".into())));

        let service = StatsService::new(Repository::from_parts(
            Arc::new(books),
            Arc::new(MockAuthorRepository::new()),
            Arc::new(MockCategoryRepository::new()),
        ));

        let err = service.get_stats().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
    }
}
