//! Authentication Routes

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// /api/auth/me: requires authentication (handled by global require_auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/auth/me", get(handler::me))
}
