//! service-core: Shared infrastructure for tourmate microservices.
pub mod error;
pub mod grpc;
pub mod observability;
pub mod retry;

pub use async_trait;
pub use axum;
pub use prost;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tonic;
pub use tracing;
pub use validator;
