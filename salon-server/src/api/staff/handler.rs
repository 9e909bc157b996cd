//! Staff API Handlers

use axum::extract::{Query, State};
use axum::{Extension, Json};
use salon_access::AccessGate;
use shared::models::StaffMember;

use crate::api::LocationQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::AppResult;

/// GET /api/staff?location= - 可见的在职员工
pub async fn list(
    State(state): State<ServerState>,
    Extension(gate): Extension<AccessGate>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<StaffMember>>> {
    let location = query.location_ref();
    let directory = &state.directory;

    let visible: Vec<StaffMember> = gate
        .visible_subset(&current_user.principal, directory.active_staff(), &location, directory.staff_index())
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(
        user_id = %current_user.id(),
        location = %location,
        count = visible.len(),
        "Listing staff"
    );

    Ok(Json(visible))
}
