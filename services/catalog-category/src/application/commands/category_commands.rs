//! Category commands

/// Create a new category
#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub description: String,
}
