//! Service Catalogue API Handlers

use axum::extract::{Query, State};
use axum::{Extension, Json};
use salon_access::AccessGate;
use shared::models::Service;

use crate::api::LocationQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::AppResult;

/// GET /api/services?location=
pub async fn list(
    State(state): State<ServerState>,
    Extension(gate): Extension<AccessGate>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<Service>>> {
    let location = query.location_ref();
    let directory = &state.directory;

    let visible = gate
        .visible_subset(&current_user.principal, directory.services(), &location, directory.staff_index())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(visible))
}
