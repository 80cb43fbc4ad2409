mod category_commands;

pub use category_commands::CreateCategoryCommand;
