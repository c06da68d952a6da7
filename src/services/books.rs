//! Books service

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookQuery, CreateBook, Page, UpdateBook},
    repository::{missing_categories, Repository},
    validation::{validate_book_changes, validate_isbn, validate_new_book, validate_pagination},
};

use super::{clean, clean_clearable, clean_optional};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books matching the query filters, one page at a time
    pub async fn list(&self, query: &BookQuery) -> AppResult<Page<Book>> {
        let pagination = validate_pagination(query.page, query.per_page)?;
        let filter = BookFilter::from_query(query);

        let (books, total) = self.repository.books.list(&filter, pagination).await?;
        Ok(Page::new(books, total, pagination))
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get(id)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))
    }

    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        validate_new_book(data)?;

        let data = CreateBook {
            title: clean(&data.title),
            isbn: validate_isbn(&data.isbn)?,
            description: clean_optional(&data.description),
            ..data.clone()
        };

        self.ensure_author(data.author_id).await?;
        if let Some(ref ids) = data.category_ids {
            self.ensure_categories(ids).await?;
        }
        if self.repository.books.isbn_exists(&data.isbn, None).await? {
            tracing::warn!("Rejected book with duplicate ISBN {}", data.isbn);
            return Err(AppError::DuplicateIsbn(data.isbn));
        }

        let book = self.repository.books.create(&data).await?;
        tracing::info!("Created book {} ({})", book.id, book.isbn);
        Ok(book)
    }

    /// Apply a partial update. `category_ids`, when present, replaces the whole set.
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let existing = self.get(id).await?;
        validate_book_changes(data)?;

        let data = UpdateBook {
            title: data.title.as_deref().map(clean),
            isbn: data.isbn.as_deref().map(validate_isbn).transpose()?,
            description: clean_clearable(&data.description),
            ..data.clone()
        };

        if let Some(ref isbn) = data.isbn {
            if *isbn != existing.isbn && self.repository.books.isbn_exists(isbn, Some(id)).await? {
                tracing::warn!("Rejected ISBN change of book {} to duplicate {}", id, isbn);
                return Err(AppError::DuplicateIsbn(isbn.clone()));
            }
        }
        if let Some(author_id) = data.author_id {
            if author_id != existing.author_id {
                self.ensure_author(author_id).await?;
            }
        }
        if let Some(ref ids) = data.category_ids {
            self.ensure_categories(ids).await?;
        }

        let book = self
            .repository
            .books
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))?;
        tracing::info!("Updated book {}", id);
        Ok(book)
    }

    /// Delete a book and return it as it was before removal
    pub async fn delete(&self, id: i32) -> AppResult<Book> {
        let book = self.get(id).await?;
        if !self.repository.books.delete(id).await? {
            return Err(AppError::book_not_found(id));
        }
        tracing::info!("Deleted book {} ({})", id, book.title);
        Ok(book)
    }

    async fn ensure_author(&self, author_id: i32) -> AppResult<()> {
        match self.repository.authors.get(author_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::author_not_found(author_id)),
        }
    }

    async fn ensure_categories(&self, ids: &[i32]) -> AppResult<()> {
        let missing = self.repository.categories.missing_ids(ids).await?;
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing_categories(&missing))
        }
    }
}
