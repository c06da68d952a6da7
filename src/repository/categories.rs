//! Categories repository for PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{violated_constraint, CategoryRepository};
use crate::{
    error::{AppError, AppResult},
    models::{BookSummary, Category, CategoryBookCount, CreateCategory, UpdateCategory},
};

const SELECT_CATEGORY: &str = r#"
    SELECT c.id, c.name, c.description,
           (SELECT COUNT(*) FROM book_categories bc WHERE bc.category_id = c.id) AS book_count
    FROM categories c
"#;

fn map_write_error(err: sqlx::Error, name: Option<&str>) -> AppError {
    match violated_constraint(&err) {
        Some("categories_name_key") => AppError::DuplicateName(name.unwrap_or_default().to_string()),
        _ => AppError::Database(err),
    }
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let query = format!("{} ORDER BY c.name, c.id", SELECT_CATEGORY);
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Category>> {
        let query = format!("{} WHERE c.id = $1", SELECT_CATEGORY);
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn books(&self, category_id: i32) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.isbn, b.year
            FROM books b
            JOIN book_categories bc ON bc.book_id = b.id
            WHERE bc.category_id = $1
            ORDER BY b.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn missing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let missing: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT requested.id
            FROM UNNEST($1::int[]) AS requested(id)
            WHERE NOT EXISTS (SELECT 1 FROM categories c WHERE c.id = requested.id)
            ORDER BY requested.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(missing)
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, data: &CreateCategory) -> AppResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, 0::bigint AS book_count
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(data.name.as_str())))?;
        Ok(category)
    }

    async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<Option<Category>> {
        if data.name.is_none() && data.description.is_none() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE categories SET ");
        let mut sets = qb.separated(", ");

        if let Some(ref name) = data.name {
            sets.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(ref description) = data.description {
            sets.push("description = ").push_bind_unseparated(description.clone());
        }

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<i32> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, data.name.as_deref()))?;

        match updated {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM book_categories WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn book_counts(&self) -> AppResult<Vec<CategoryBookCount>> {
        let rows = sqlx::query_as::<_, CategoryBookCount>(
            r#"
            SELECT c.id AS category_id, c.name, COUNT(bc.book_id) AS book_count
            FROM categories c
            LEFT JOIN book_categories bc ON bc.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY book_count DESC, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
