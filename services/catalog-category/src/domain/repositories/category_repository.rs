//! Category repository trait

use async_trait::async_trait;
use catalog_errors::AppResult;

use crate::domain::entities::Category;
use crate::domain::value_objects::CategoryId;

/// Durable storage for categories.
///
/// Implementations must be safe for concurrent use; every RPC invocation
/// shares the same instance behind an `Arc`.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Persist a new category, assigning its id, and return the stored
    /// entity.
    async fn create(&self, name: &str, description: &str) -> AppResult<Category>;

    /// All stored categories in storage order. Empty store yields an empty
    /// vec, not an error.
    async fn find_all(&self) -> AppResult<Vec<Category>>;

    /// Exact-id lookup. `Ok(None)` when no row matches.
    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>>;
}
