//! Staff API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Staff router - requires `view_staff`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/staff", get(handler::list))
        .layer(middleware::from_fn(require_permission("view_staff")))
}
