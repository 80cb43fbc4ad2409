//! Business logic handler

use std::sync::Arc;

use catalog_errors::{AppError, AppResult};
use tracing::debug;

use crate::application::commands::CreateCategoryCommand;
use crate::application::queries::{GetCategoryQuery, ListCategoriesQuery};
use crate::domain::entities::Category;
use crate::domain::repositories::CategoryRepository;

/// Translates commands and queries into repository calls.
///
/// Holds no state beyond the repository reference; store errors are
/// surfaced verbatim, never retried.
pub struct ServiceHandler {
    repo: Arc<dyn CategoryRepository>,
}

impl ServiceHandler {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_category(&self, cmd: CreateCategoryCommand) -> AppResult<Category> {
        if cmd.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let category = self.repo.create(&cmd.name, &cmd.description).await?;
        debug!(category_id = %category.id, "Category created");
        Ok(category)
    }

    pub async fn list_categories(&self, _query: ListCategoriesQuery) -> AppResult<Vec<Category>> {
        self.repo.find_all().await
    }

    pub async fn get_category(&self, query: GetCategoryQuery) -> AppResult<Category> {
        self.repo
            .find_by_id(&query.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {} not found", query.id)))
    }
}
