//! Persistence adapters

mod memory;
mod migrations;
mod postgres;
mod rows;

pub use memory::InMemoryCategoryRepository;
pub use migrations::migrations;
pub use postgres::PostgresCategoryRepository;
