//! Category entity

use crate::domain::value_objects::CategoryId;

/// A category in the catalog.
///
/// This is the wire-facing shape: persistence bookkeeping (timestamps,
/// soft delete marker) lives in the storage row, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

impl Category {
    /// Create a new category with a freshly assigned id
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description: description.into(),
        }
    }
}
