//! Role API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Role router - requires `manage_roles`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/permissions", get(handler::get_all_permissions))
        .route("/api/roles", get(handler::list))
        .route("/api/roles/{name}/permissions", put(handler::update_role_permissions))
        .layer(middleware::from_fn(require_permission("manage_roles")))
}
