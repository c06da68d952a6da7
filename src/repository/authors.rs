//! Authors repository for PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{author_has_books, violated_constraint, AuthorRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorBookCount, BookSummary, CreateAuthor, Pagination, UpdateAuthor},
};

const SELECT_AUTHOR: &str = r#"
    SELECT a.id, a.name, a.bio, a.country, a.created_at,
           (SELECT COUNT(*) FROM books b WHERE b.author_id = a.id) AS book_count
    FROM authors a
"#;

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn list(&self, pagination: Pagination) -> AppResult<(Vec<Author>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("{} ORDER BY a.name, a.id LIMIT $1 OFFSET $2", SELECT_AUTHOR);
        let authors = sqlx::query_as::<_, Author>(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((authors, total))
    }

    async fn get(&self, id: i32) -> AppResult<Option<Author>> {
        let query = format!("{} WHERE a.id = $1", SELECT_AUTHOR);
        let author = sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn books(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, isbn, year FROM books WHERE author_id = $1 ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, bio, country, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, bio, country, created_at, 0::bigint AS book_count
            "#,
        )
        .bind(&data.name)
        .bind(&data.bio)
        .bind(&data.country)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Option<Author>> {
        if data.name.is_none() && data.bio.is_none() && data.country.is_none() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE authors SET ");
        let mut sets = qb.separated(", ");

        if let Some(ref name) = data.name {
            sets.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(ref bio) = data.bio {
            sets.push("bio = ").push_bind_unseparated(bio.clone());
        }
        if let Some(ref country) = data.country {
            sets.push("country = ").push_bind_unseparated(country.clone());
        }

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<i32> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let book_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if book_count > 0 {
            return Err(author_has_books(book_count));
        }

        // The RESTRICT foreign key still guards against a book inserted concurrently
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("books_author_id_fkey") => author_has_books(1),
                _ => AppError::Database(e),
            })?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn book_counts(&self) -> AppResult<Vec<AuthorBookCount>> {
        let rows = sqlx::query_as::<_, AuthorBookCount>(
            r#"
            SELECT a.id AS author_id, a.name, COUNT(b.id) AS book_count
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name
            ORDER BY book_count DESC, a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
