//! HTTP API boundary.

pub mod app;
pub mod error;
pub mod routes;

pub use app::{build_app, build_provider_registry, AppState};
pub use error::ApiError;
