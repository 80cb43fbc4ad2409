//! catalog-bootstrap - shared service startup
//!
//! Startup logic reused by every service binary: configuration loading,
//! tracing, infrastructure construction with retry, health endpoints,
//! metrics, and the gRPC server lifecycle.

mod health;
mod infrastructure;
mod metrics;
mod retry;
mod runtime;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use metrics::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
