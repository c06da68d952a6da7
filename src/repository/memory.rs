//! In-memory store implementing all repository traits.
//!
//! The whole state lives behind one `RwLock`; every write takes the write
//! guard for its full check-then-mutate sequence, which gives the same
//! guarantees the unique and foreign-key constraints give in PostgreSQL.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    author_has_books, missing_categories, AuthorRepository, BookRepository, CategoryRepository,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorBookCount, Book, BookAggregates, BookFilter, BookSummary, Category,
        CategoryBookCount, CategoryRef, CreateAuthor, CreateBook, CreateCategory, Pagination,
        UpdateAuthor, UpdateBook, UpdateCategory,
    },
};

#[derive(Debug, Clone)]
struct BookRecord {
    id: i32,
    title: String,
    author_id: i32,
    isbn: String,
    year: i32,
    description: Option<String>,
    pages: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct AuthorRecord {
    id: i32,
    name: String,
    bio: Option<String>,
    country: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CategoryRecord {
    id: i32,
    name: String,
    description: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    books: HashMap<i32, BookRecord>,
    authors: HashMap<i32, AuthorRecord>,
    categories: HashMap<i32, CategoryRecord>,
    /// (book_id, category_id) association rows
    book_categories: BTreeSet<(i32, i32)>,
    isbn_index: HashMap<String, i32>,
    category_names: HashMap<String, i32>,
    last_book_id: i32,
    last_author_id: i32,
    last_category_id: i32,
}

impl State {
    fn category_ids_of(&self, book_id: i32) -> impl Iterator<Item = i32> + '_ {
        self.book_categories
            .range((book_id, i32::MIN)..=(book_id, i32::MAX))
            .map(|(_, category_id)| *category_id)
    }

    fn book(&self, record: &BookRecord) -> Book {
        let mut categories: Vec<CategoryRef> = self
            .category_ids_of(record.id)
            .filter_map(|id| self.categories.get(&id))
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name.clone(),
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Book {
            id: record.id,
            title: record.title.clone(),
            author_id: record.author_id,
            author_name: self.authors.get(&record.author_id).map(|a| a.name.clone()),
            isbn: record.isbn.clone(),
            year: record.year,
            description: record.description.clone(),
            pages: record.pages,
            created_at: record.created_at,
            updated_at: record.updated_at,
            categories,
        }
    }

    fn author(&self, record: &AuthorRecord) -> Author {
        Author {
            id: record.id,
            name: record.name.clone(),
            bio: record.bio.clone(),
            country: record.country.clone(),
            created_at: record.created_at,
            book_count: self.author_book_count(record.id),
            books: None,
        }
    }

    fn category(&self, record: &CategoryRecord) -> Category {
        Category {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            book_count: self.category_book_count(record.id),
            books: None,
        }
    }

    fn author_book_count(&self, author_id: i32) -> i64 {
        self.books
            .values()
            .filter(|b| b.author_id == author_id)
            .count() as i64
    }

    fn category_book_count(&self, category_id: i32) -> i64 {
        self.book_categories
            .iter()
            .filter(|(_, c)| *c == category_id)
            .count() as i64
    }

    fn matches(&self, record: &BookRecord, filter: &BookFilter) -> bool {
        if let Some(year) = filter.year {
            if record.year != year {
                return false;
            }
        }
        if let Some(author_id) = filter.author_id {
            if record.author_id != author_id {
                return false;
            }
        }
        if let Some(ref search) = filter.search {
            let term = search.to_lowercase();
            let author_match = self
                .authors
                .get(&record.author_id)
                .is_some_and(|a| a.name.to_lowercase().contains(&term));
            if !record.title.to_lowercase().contains(&term) && !author_match {
                return false;
            }
        }
        if let Some(ref category) = filter.category {
            let term = category.to_lowercase();
            let tagged = self
                .category_ids_of(record.id)
                .filter_map(|id| self.categories.get(&id))
                .any(|c| c.name.to_lowercase().contains(&term));
            if !tagged {
                return false;
            }
        }
        true
    }

    fn summaries<'a>(&self, records: impl Iterator<Item = &'a BookRecord>) -> Vec<BookSummary> {
        let mut books: Vec<BookSummary> = records
            .map(|b| BookSummary {
                id: b.id,
                title: b.title.clone(),
                isbn: b.isbn.clone(),
                year: b.year,
            })
            .collect();
        books.sort_by_key(|b| b.id);
        books
    }

    fn check_categories(&self, ids: &[i32]) -> AppResult<()> {
        let mut missing: Vec<i32> = ids
            .iter()
            .copied()
            .filter(|id| !self.categories.contains_key(id))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        missing.dedup();
        Err(missing_categories(&missing))
    }

    fn replace_categories(&mut self, book_id: i32, ids: &[i32]) {
        self.book_categories.retain(|(b, _)| *b != book_id);
        self.book_categories
            .extend(ids.iter().map(|category_id| (book_id, *category_id)));
    }
}

/// Cheaply clonable handle; clones share the same state
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .collect()
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn list(&self, filter: &BookFilter, pagination: Pagination) -> AppResult<(Vec<Book>, i64)> {
        let state = self.state.read().await;
        let mut matching: Vec<&BookRecord> = state
            .books
            .values()
            .filter(|b| state.matches(b, filter))
            .collect();
        matching.sort_by_key(|b| b.id);

        let total = matching.len() as i64;
        let books = paginate(matching, pagination)
            .into_iter()
            .map(|b| state.book(b))
            .collect();
        Ok((books, total))
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let state = self.state.read().await;
        Ok(state.books.get(&id).map(|b| state.book(b)))
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .isbn_index
            .get(isbn)
            .is_some_and(|id| Some(*id) != exclude_id))
    }

    async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut state = self.state.write().await;

        if state.isbn_index.contains_key(&data.isbn) {
            return Err(AppError::DuplicateIsbn(data.isbn.clone()));
        }
        if !state.authors.contains_key(&data.author_id) {
            return Err(AppError::author_not_found(data.author_id));
        }
        let category_ids = data.category_ids.clone().unwrap_or_default();
        state.check_categories(&category_ids)?;

        state.last_book_id += 1;
        let record = BookRecord {
            id: state.last_book_id,
            title: data.title.clone(),
            author_id: data.author_id,
            isbn: data.isbn.clone(),
            year: data.year,
            description: data.description.clone(),
            pages: data.pages,
            created_at: Utc::now(),
            updated_at: None,
        };
        state.isbn_index.insert(record.isbn.clone(), record.id);
        state.replace_categories(record.id, &category_ids);
        state.books.insert(record.id, record.clone());

        Ok(state.book(&record))
    }

    async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Option<Book>> {
        let mut state = self.state.write().await;

        let Some(mut record) = state.books.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(ref isbn) = data.isbn {
            if state.isbn_index.get(isbn).is_some_and(|owner| *owner != id) {
                return Err(AppError::DuplicateIsbn(isbn.clone()));
            }
        }
        if let Some(author_id) = data.author_id {
            if !state.authors.contains_key(&author_id) {
                return Err(AppError::author_not_found(author_id));
            }
        }
        if let Some(ref ids) = data.category_ids {
            state.check_categories(ids)?;
        }

        if let Some(ref title) = data.title {
            record.title = title.clone();
        }
        if let Some(author_id) = data.author_id {
            record.author_id = author_id;
        }
        if let Some(ref isbn) = data.isbn {
            state.isbn_index.remove(&record.isbn);
            state.isbn_index.insert(isbn.clone(), id);
            record.isbn = isbn.clone();
        }
        if let Some(year) = data.year {
            record.year = year;
        }
        if let Some(ref description) = data.description {
            record.description = description.clone();
        }
        if let Some(pages) = data.pages {
            record.pages = pages;
        }
        if let Some(ref ids) = data.category_ids {
            state.replace_categories(id, ids);
        }
        record.updated_at = Some(Utc::now());
        state.books.insert(id, record.clone());

        Ok(Some(state.book(&record)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(record) = state.books.remove(&id) else {
            return Ok(false);
        };
        state.isbn_index.remove(&record.isbn);
        state.book_categories.retain(|(b, _)| *b != id);
        Ok(true)
    }

    async fn aggregates(&self) -> AppResult<BookAggregates> {
        let state = self.state.read().await;
        let years = state.books.values().map(|b| b.year);
        let authors: BTreeSet<i32> = state.books.values().map(|b| b.author_id).collect();

        Ok(BookAggregates {
            total_books: state.books.len() as i64,
            earliest_year: years.clone().min(),
            latest_year: years.max(),
            unique_authors: authors.len() as i64,
        })
    }
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn list(&self, pagination: Pagination) -> AppResult<(Vec<Author>, i64)> {
        let state = self.state.read().await;
        let mut authors: Vec<&AuthorRecord> = state.authors.values().collect();
        authors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let total = authors.len() as i64;
        let page = paginate(authors, pagination)
            .into_iter()
            .map(|a| state.author(a))
            .collect();
        Ok((page, total))
    }

    async fn get(&self, id: i32) -> AppResult<Option<Author>> {
        let state = self.state.read().await;
        Ok(state.authors.get(&id).map(|a| state.author(a)))
    }

    async fn books(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let state = self.state.read().await;
        Ok(state.summaries(state.books.values().filter(|b| b.author_id == author_id)))
    }

    async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let mut state = self.state.write().await;
        state.last_author_id += 1;
        let record = AuthorRecord {
            id: state.last_author_id,
            name: data.name.clone(),
            bio: data.bio.clone(),
            country: data.country.clone(),
            created_at: Utc::now(),
        };
        state.authors.insert(record.id, record.clone());
        Ok(state.author(&record))
    }

    async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Option<Author>> {
        let mut state = self.state.write().await;
        let Some(record) = state.authors.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(ref name) = data.name {
            record.name = name.clone();
        }
        if let Some(ref bio) = data.bio {
            record.bio = bio.clone();
        }
        if let Some(ref country) = data.country {
            record.country = country.clone();
        }

        let record = record.clone();
        Ok(Some(state.author(&record)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if !state.authors.contains_key(&id) {
            return Ok(false);
        }
        let book_count = state.author_book_count(id);
        if book_count > 0 {
            return Err(author_has_books(book_count));
        }
        state.authors.remove(&id);
        Ok(true)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.authors.len() as i64)
    }

    async fn book_counts(&self) -> AppResult<Vec<AuthorBookCount>> {
        let state = self.state.read().await;
        let mut counts: Vec<AuthorBookCount> = state
            .authors
            .values()
            .map(|a| AuthorBookCount {
                author_id: a.id,
                name: a.name.clone(),
                book_count: state.author_book_count(a.id),
            })
            .collect();
        counts.sort_by(|a, b| {
            b.book_count
                .cmp(&a.book_count)
                .then(a.author_id.cmp(&b.author_id))
        });
        Ok(counts)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<&CategoryRecord> = state.categories.values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories.into_iter().map(|c| state.category(c)).collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).map(|c| state.category(c)))
    }

    async fn books(&self, category_id: i32) -> AppResult<Vec<BookSummary>> {
        let state = self.state.read().await;
        let tagged = state
            .book_categories
            .iter()
            .filter(|(_, c)| *c == category_id)
            .filter_map(|(b, _)| state.books.get(b));
        Ok(state.summaries(tagged))
    }

    async fn missing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let state = self.state.read().await;
        let mut missing: Vec<i32> = ids
            .iter()
            .copied()
            .filter(|id| !state.categories.contains_key(id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .category_names
            .get(name)
            .is_some_and(|id| Some(*id) != exclude_id))
    }

    async fn create(&self, data: &CreateCategory) -> AppResult<Category> {
        let mut state = self.state.write().await;
        if state.category_names.contains_key(&data.name) {
            return Err(AppError::DuplicateName(data.name.clone()));
        }

        state.last_category_id += 1;
        let record = CategoryRecord {
            id: state.last_category_id,
            name: data.name.clone(),
            description: data.description.clone(),
        };
        state.category_names.insert(record.name.clone(), record.id);
        state.categories.insert(record.id, record.clone());
        Ok(state.category(&record))
    }

    async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<Option<Category>> {
        let mut state = self.state.write().await;
        let Some(mut record) = state.categories.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(ref name) = data.name {
            if state.category_names.get(name).is_some_and(|owner| *owner != id) {
                return Err(AppError::DuplicateName(name.clone()));
            }
            state.category_names.remove(&record.name);
            state.category_names.insert(name.clone(), id);
            record.name = name.clone();
        }
        if let Some(ref description) = data.description {
            record.description = description.clone();
        }

        state.categories.insert(id, record.clone());
        Ok(Some(state.category(&record)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(record) = state.categories.remove(&id) else {
            return Ok(false);
        };
        state.category_names.remove(&record.name);
        state.book_categories.retain(|(_, c)| *c != id);
        Ok(true)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.categories.len() as i64)
    }

    async fn book_counts(&self) -> AppResult<Vec<CategoryBookCount>> {
        let state = self.state.read().await;
        let mut counts: Vec<CategoryBookCount> = state
            .categories
            .values()
            .map(|c| CategoryBookCount {
                category_id: c.id,
                name: c.name.clone(),
                book_count: state.category_book_count(c.id),
            })
            .collect();
        counts.sort_by(|a, b| b.book_count.cmp(&a.book_count).then(a.name.cmp(&b.name)));
        Ok(counts)
    }
}
