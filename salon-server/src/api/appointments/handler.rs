//! Appointment API Handlers

use axum::extract::{Query, State};
use axum::{Extension, Json};
use salon_access::AccessGate;
use shared::models::Appointment;

use crate::api::LocationQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::AppResult;

/// GET /api/appointments?location= - 日历视图
///
/// 门店视图包含该门店员工的上门预约；`home` 视图 (仅管理员)
/// 包含上门服务员工的门店预约。
pub async fn list(
    State(state): State<ServerState>,
    Extension(gate): Extension<AccessGate>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let location = query.location_ref();
    let directory = &state.directory;

    let mut visible: Vec<Appointment> = gate
        .visible_subset(&current_user.principal, directory.appointments(), &location, directory.staff_index())
        .into_iter()
        .cloned()
        .collect();
    visible.sort_by_key(|a| a.starts_at);

    tracing::debug!(
        user_id = %current_user.id(),
        location = %location,
        count = visible.len(),
        "Listing appointments"
    );

    Ok(Json(visible))
}
