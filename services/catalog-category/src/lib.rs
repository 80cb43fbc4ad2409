//! catalog-category - gRPC category service
//!
//! CRUD and streaming operations over the Category entity, backed by
//! PostgreSQL behind a swappable repository trait.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

// Proto generated code
pub mod catalog_category {
    pub mod v1 {
        tonic::include_proto!("catalog.category.v1");
    }
}

pub use catalog_category::v1 as proto;

/// File descriptor set for gRPC reflection
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("catalog_category_descriptor");
