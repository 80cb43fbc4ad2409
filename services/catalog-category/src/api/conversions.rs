//! Proto <-> domain conversions

use catalog_errors::{AppError, AppResult};

use crate::domain::entities::Category;
use crate::domain::value_objects::CategoryId;
use crate::proto;

pub fn category_to_proto(category: &Category) -> proto::Category {
    proto::Category {
        id: category.id.to_string(),
        name: category.name.clone(),
        description: category.description.clone(),
    }
}

pub fn parse_category_id(s: &str) -> AppResult<CategoryId> {
    CategoryId::from_string(s).map_err(|_| AppError::validation("Invalid category ID"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_to_proto_maps_all_fields() {
        let category = Category::new("test name", "test description");
        let message = category_to_proto(&category);

        assert_eq!(message.id, category.id.to_string());
        assert_eq!(message.name, "test name");
        assert_eq!(message.description, "test description");
    }

    #[test]
    fn test_parse_category_id_rejects_garbage() {
        let err = parse_category_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
