mod category_queries;

pub use category_queries::{GetCategoryQuery, ListCategoriesQuery};
