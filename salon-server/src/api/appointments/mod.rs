//! Appointment API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Appointment router - requires `view_appointments`
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/appointments", get(handler::list))
        .layer(middleware::from_fn(require_permission("view_appointments")))
}
