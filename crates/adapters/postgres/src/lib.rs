//! catalog-adapter-postgres - PostgreSQL adapter

mod connection;
mod migration;

pub use connection::*;
pub use migration::*;
