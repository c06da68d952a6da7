//! Business logic services

pub mod authors;
pub mod books;
pub mod categories;
pub mod stats;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub authors: authors::AuthorsService,
    pub categories: categories::CategoriesService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Storage readiness check used by the health endpoint
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}

/// Trim a required string
pub(crate) fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional string; blank values become absent
pub(crate) fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Same as [`clean_optional`] for clearable update fields, keeping the
/// absent / explicit null distinction
pub(crate) fn clean_clearable(value: &Option<Option<String>>) -> Option<Option<String>> {
    value.as_ref().map(clean_optional)
}
