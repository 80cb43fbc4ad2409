//! API layer - gRPC service implementation

mod conversions;
mod grpc_service;

pub use grpc_service::CategoryServiceImpl;
