//! Shared types for the salon platform
//!
//! Domain models and the unified error system used by `salon-access`,
//! `salon-server` and API clients.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
