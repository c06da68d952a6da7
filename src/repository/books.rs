//! Books repository for PostgreSQL

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{like_pattern, missing_categories, violated_constraint, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookAggregates, BookFilter, CategoryRef, CreateBook, Pagination, UpdateBook},
};

const SELECT_BOOK: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name, b.isbn, b.year,
           b.description, b.pages, b.created_at, b.updated_at
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

/// Translate constraint violations raised by book writes into domain errors
fn map_write_error(err: sqlx::Error, isbn: Option<&str>, author_id: Option<i32>) -> AppError {
    match violated_constraint(&err) {
        Some("books_isbn_key") => AppError::DuplicateIsbn(isbn.unwrap_or_default().to_string()),
        Some("books_author_id_fkey") => match author_id {
            Some(id) => AppError::author_not_found(id),
            None => AppError::NotFound("Author not found".to_string()),
        },
        Some("book_categories_category_id_fkey") => {
            AppError::NotFound("Category not found".to_string())
        }
        _ => AppError::Database(err),
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    qb.push(" WHERE 1=1");

    if let Some(ref search) = filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (b.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(ref category) = filter.category {
        qb.push(
            " AND EXISTS (SELECT 1 FROM book_categories bc \
             JOIN categories c ON c.id = bc.category_id \
             WHERE bc.book_id = b.id AND c.name ILIKE ",
        )
        .push_bind(like_pattern(category))
        .push(")");
    }

    if let Some(year) = filter.year {
        qb.push(" AND b.year = ").push_bind(year);
    }

    if let Some(author_id) = filter.author_id {
        qb.push(" AND b.author_id = ").push_bind(author_id);
    }
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load the categories of every given book with one association query
    async fn attach_categories(&self, books: &mut [Book]) -> AppResult<()> {
        if books.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let rows = sqlx::query_as::<_, (i32, i32, String)>(
            r#"
            SELECT bc.book_id, c.id, c.name
            FROM book_categories bc
            JOIN categories c ON c.id = bc.category_id
            WHERE bc.book_id = ANY($1)
            ORDER BY c.name, c.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<CategoryRef>> = HashMap::new();
        for (book_id, id, name) in rows {
            by_book.entry(book_id).or_default().push(CategoryRef { id, name });
        }
        for book in books.iter_mut() {
            book.categories = by_book.remove(&book.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn fetch_required(&self, id: i32) -> AppResult<Book> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after write", id)))
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self, filter: &BookFilter, pagination: Pagination) -> AppResult<(Vec<Book>, i64)> {
        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM books b JOIN authors a ON a.id = b.author_id",
        );
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut select_query = QueryBuilder::new(SELECT_BOOK);
        push_filters(&mut select_query, filter);
        select_query
            .push(" ORDER BY b.id LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let mut books = select_query
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        self.attach_categories(&mut books).await?;

        Ok((books, total))
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!("{} WHERE b.id = $1", SELECT_BOOK);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match book {
            Some(book) => {
                let mut books = [book];
                self.attach_categories(&mut books).await?;
                let [book] = books;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, isbn, year, description, pages, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.isbn)
        .bind(data.year)
        .bind(&data.description)
        .bind(data.pages)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, Some(data.isbn.as_str()), Some(data.author_id)))?;

        if let Some(ref category_ids) = data.category_ids {
            if !category_ids.is_empty() {
                sqlx::query(
                    "INSERT INTO book_categories (book_id, category_id) SELECT $1, UNNEST($2::int[])",
                )
                .bind(id)
                .bind(category_ids)
                .execute(&mut *tx)
                .await
                .map_err(|e| match violated_constraint(&e) {
                    Some("book_categories_category_id_fkey") => missing_categories(category_ids),
                    _ => AppError::Database(e),
                })?;
            }
        }

        tx.commit().await?;
        self.fetch_required(id).await
    }

    async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE books SET updated_at = ");
        qb.push_bind(Utc::now());

        macro_rules! set_field {
            ($field:expr, $column:literal) => {
                if let Some(ref value) = $field {
                    qb.push(concat!(", ", $column, " = ")).push_bind(value.clone());
                }
            };
        }

        set_field!(data.title, "title");
        set_field!(data.author_id, "author_id");
        set_field!(data.isbn, "isbn");
        set_field!(data.year, "year");
        set_field!(data.description, "description");
        set_field!(data.pages, "pages");

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<i32> = qb
            .build_query_scalar()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, data.isbn.as_deref(), data.author_id))?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(ref category_ids) = data.category_ids {
            sqlx::query("DELETE FROM book_categories WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if !category_ids.is_empty() {
                sqlx::query(
                    "INSERT INTO book_categories (book_id, category_id) SELECT $1, UNNEST($2::int[])",
                )
                .bind(id)
                .bind(category_ids)
                .execute(&mut *tx)
                .await
                .map_err(|e| match violated_constraint(&e) {
                    Some("book_categories_category_id_fkey") => missing_categories(category_ids),
                    _ => AppError::Database(e),
                })?;
            }
        }

        tx.commit().await?;
        self.fetch_required(id).await.map(Some)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM book_categories WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn aggregates(&self) -> AppResult<BookAggregates> {
        let row = sqlx::query_as::<_, BookAggregates>(
            r#"
            SELECT COUNT(*) AS total_books,
                   MIN(year) AS earliest_year,
                   MAX(year) AS latest_year,
                   COUNT(DISTINCT author_id) AS unique_authors
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
