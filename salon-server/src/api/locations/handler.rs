//! Location API Handlers

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use salon_access::AccessGate;
use shared::models::{LocationId, LocationRecord, LocationRef, LocationUpsert};

use crate::api::LocationQuery;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::AppResult;

/// GET /api/locations?location= - 可见门店 (管理员可见停用门店)
pub async fn list(
    State(state): State<ServerState>,
    Extension(gate): Extension<AccessGate>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<LocationRecord>>> {
    let location = query.location_ref();
    let records = state.locations.list();

    let visible = gate.visible_subset(
        &current_user.principal,
        records,
        &location,
        state.directory.staff_index(),
    );

    Ok(Json(visible))
}

/// GET /api/locations/selectable - 门店切换器选项
pub async fn selectable(
    Extension(gate): Extension<AccessGate>,
    Extension(current_user): Extension<CurrentUser>,
) -> Json<Vec<LocationRef>> {
    Json(gate.selectable_locations(&current_user.principal))
}

/// PUT /api/locations/{id} - 创建或更新门店
pub async fn upsert(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<LocationUpsert>,
) -> AppResult<Json<LocationRecord>> {
    tracing::info!(
        user_id = %current_user.id(),
        username = %current_user.username,
        location_id = %id,
        "Upserting location"
    );

    let existed = state.locations.get(&LocationId::new(id.as_str())).is_some();
    let record = state.locations.upsert(LocationId::new(id), payload)?;

    audit_log!(
        if existed { "location_updated" } else { "location_created" },
        "location",
        location_id = record.id.as_str(),
        operator_id = current_user.id(),
        is_active = record.is_active
    );

    Ok(Json(record))
}

/// DELETE /api/locations/{id} - 停用门店
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<LocationRecord>> {
    tracing::info!(
        user_id = %current_user.id(),
        username = %current_user.username,
        location_id = %id,
        "Deactivating location"
    );

    let record = state.locations.deactivate(&LocationId::new(id))?;

    audit_log!(
        "location_deactivated",
        "location",
        location_id = record.id.as_str(),
        operator_id = current_user.id()
    );

    Ok(Json(record))
}
