//! In-memory repository
//!
//! Fulfills the same contract as the PostgreSQL implementation and backs
//! the test suite; anything implementing [`CategoryRepository`] can stand
//! in behind the service.

use async_trait::async_trait;
use catalog_errors::AppResult;
use tokio::sync::RwLock;

use crate::domain::entities::Category;
use crate::domain::repositories::CategoryRepository;
use crate::domain::value_objects::CategoryId;

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<Vec<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, name: &str, description: &str) -> AppResult<Category> {
        let category = Category::new(name, description);
        self.categories.write().await.push(category.clone());
        Ok(category)
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        Ok(self.categories.read().await.clone())
    }

    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == *id)
            .cloned())
    }
}
