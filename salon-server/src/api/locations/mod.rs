//! Location API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Location router
///
/// - GET /api/locations: `view_locations`
/// - GET /api/locations/selectable: any authenticated user
/// - PUT/DELETE /api/locations/{id}: `manage_locations`
pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/locations", get(handler::list))
        .layer(middleware::from_fn(require_permission("view_locations")));

    let switcher_routes = Router::new().route("/api/locations/selectable", get(handler::selectable));

    let manage_routes = Router::new()
        .route("/api/locations/{id}", put(handler::upsert).delete(handler::deactivate))
        .layer(middleware::from_fn(require_permission("manage_locations")));

    read_routes.merge(switcher_routes).merge(manage_routes)
}
