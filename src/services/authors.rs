//! Authors service

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorQuery, CreateAuthor, Page, UpdateAuthor},
    repository::Repository,
    validation::{validate_author_changes, validate_new_author, validate_pagination},
};

use super::{clean, clean_clearable, clean_optional};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &AuthorQuery) -> AppResult<Page<Author>> {
        let pagination = validate_pagination(query.page, query.per_page)?;
        let (authors, total) = self.repository.authors.list(pagination).await?;
        Ok(Page::new(authors, total, pagination))
    }

    /// Get an author, with their books when `include_books` is set
    pub async fn get(&self, id: i32, include_books: bool) -> AppResult<Author> {
        let mut author = self
            .repository
            .authors
            .get(id)
            .await?
            .ok_or_else(|| AppError::author_not_found(id))?;

        if include_books {
            author.books = Some(self.repository.authors.books(id).await?);
        }
        Ok(author)
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        validate_new_author(data)?;

        let data = CreateAuthor {
            name: clean(&data.name),
            bio: clean_optional(&data.bio),
            country: clean_optional(&data.country),
        };

        let author = self.repository.authors.create(&data).await?;
        tracing::info!("Created author {} ({})", author.id, author.name);
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        self.get(id, false).await?;
        validate_author_changes(data)?;

        let data = UpdateAuthor {
            name: data.name.as_deref().map(clean),
            bio: clean_clearable(&data.bio),
            country: clean_clearable(&data.country),
        };

        let author = self
            .repository
            .authors
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::author_not_found(id))?;
        tracing::info!("Updated author {}", id);
        Ok(author)
    }

    /// Delete an author without books and return it as it was before removal
    pub async fn delete(&self, id: i32) -> AppResult<Author> {
        let author = self.get(id, false).await?;

        match self.repository.authors.delete(id).await {
            Ok(true) => {
                tracing::info!("Deleted author {} ({})", id, author.name);
                Ok(author)
            }
            Ok(false) => Err(AppError::author_not_found(id)),
            Err(e @ AppError::Conflict(_)) => {
                tracing::warn!("Refused to delete author {}: {}", id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
