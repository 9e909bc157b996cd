//! Authentication Handlers

use std::collections::BTreeSet;

use axum::{Extension, Json};
use salon_access::{AccessGate, CanonicalGrant, PermissionSet};
use serde::Serialize;
use shared::models::{JobRole, LocationGrant, LocationId, LocationRef, Role};

use crate::AppResult;
use crate::auth::CurrentUser;

/// Current principal with everything the core resolves for it
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub job_role: Option<JobRole>,
    /// Grant as carried by the token
    pub location_grant: LocationGrant,
    pub permissions: PermissionSet,
    /// Active branches the grant resolves to
    pub canonical_grant: CanonicalGrant,
    /// Granted ids no longer in the location registry
    pub stale_locations: BTreeSet<LocationId>,
    /// Location switcher options
    pub selectable_locations: Vec<LocationRef>,
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser, Extension(gate): Extension<AccessGate>) -> AppResult<Json<MeResponse>> {
    let permissions = gate.resolve_permissions(&user.principal)?;
    let resolution = gate.grant_resolution(&user.principal);
    let selectable_locations = gate.selectable_locations(&user.principal);

    let principal = user.principal;
    Ok(Json(MeResponse {
        id: principal.id,
        username: user.username,
        role: principal.role,
        job_role: principal.job_role,
        location_grant: principal.location_grant,
        permissions,
        canonical_grant: resolution.grant,
        stale_locations: resolution.stale,
        selectable_locations,
    }))
}
