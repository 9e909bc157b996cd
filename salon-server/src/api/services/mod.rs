//! Service Catalogue API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Service router - requires `view_services`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/services", get(handler::list))
        .layer(middleware::from_fn(require_permission("view_services")))
}
