//! Category queries

use crate::domain::value_objects::CategoryId;

/// Fetch one category by id
#[derive(Debug, Clone)]
pub struct GetCategoryQuery {
    pub id: CategoryId,
}

/// List every category
#[derive(Debug, Clone, Default)]
pub struct ListCategoriesQuery;
