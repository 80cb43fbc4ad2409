//! PostgreSQL repository implementation

use std::time::Instant;

use async_trait::async_trait;
use catalog_bootstrap::record_db_query;
use catalog_errors::{AppError, AppResult};
use sqlx::PgPool;

use super::rows::CategoryRow;
use crate::domain::entities::Category;
use crate::domain::repositories::CategoryRepository;
use crate::domain::value_objects::CategoryId;

pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, name: &str, description: &str) -> AppResult<Category> {
        let category = Category::new(name, description);

        let started = Instant::now();
        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(category.id.0)
        .bind(&category.name)
        .bind(&category.description)
        .execute(&self.pool)
        .await;
        record_db_query(
            "insert",
            "categories",
            started.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );

        result.map_err(|e| AppError::database(format!("Failed to insert category: {}", e)))?;
        Ok(category)
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, description, created_at, updated_at, deleted_at
            FROM categories
            WHERE deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        record_db_query(
            "select",
            "categories",
            started.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );

        let rows =
            result.map_err(|e| AppError::database(format!("Failed to list categories: {}", e)))?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, description, created_at, updated_at, deleted_at
            FROM categories
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await;
        record_db_query(
            "select",
            "categories",
            started.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );

        let row =
            result.map_err(|e| AppError::database(format!("Failed to fetch category: {}", e)))?;
        Ok(row.map(Category::from))
    }
}
