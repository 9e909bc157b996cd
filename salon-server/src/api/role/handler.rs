//! Role API Handlers

use axum::extract::{Path, State};
use axum::{Extension, Json};
use salon_access::AccessGate;
use salon_access::registry::{ALL_PERMISSIONS, is_valid_permission};
use serde::Serialize;
use shared::models::{CustomRole, Role, RolePermissionsUpdate};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::{AppError, AppResult};

/// Built-in role with its default table and any override
#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub name: &'static str,
    /// `admin` / `super_admin`: always the wildcard, not overridable
    pub is_system: bool,
    pub default_permissions: Vec<String>,
    pub custom: Option<CustomRole>,
}

/// 权限天花板校验：操作者只能分配自己拥有的权限
fn validate_permission_ceiling(gate: &AccessGate, current_user: &CurrentUser, permissions: &[String]) -> AppResult<()> {
    for perm in permissions {
        if !is_valid_permission(perm) {
            return Err(AppError::invalid_request(format!("Invalid permission: {}", perm)));
        }
        if !gate.has_permission(&current_user.principal, perm)? {
            return Err(AppError::forbidden(format!(
                "Cannot grant permission '{}': you do not have it yourself",
                perm
            )));
        }
    }
    Ok(())
}

/// GET /api/permissions - Get all configurable permissions
pub async fn get_all_permissions() -> Json<Vec<&'static str>> {
    Json(ALL_PERMISSIONS.to_vec())
}

/// GET /api/roles - Built-in roles with overrides
pub async fn list(State(state): State<ServerState>) -> Json<Vec<RoleInfo>> {
    let roles = Role::ALL
        .iter()
        .map(|role| RoleInfo {
            name: role.as_str(),
            is_system: role.is_admin(),
            default_permissions: state.registry.permissions_for_role(*role).into(),
            custom: state.roles.get(role.as_str()),
        })
        .collect();

    Json(roles)
}

/// PUT /api/roles/{name}/permissions - Update role permissions
pub async fn update_role_permissions(
    State(state): State<ServerState>,
    Extension(gate): Extension<AccessGate>,
    Extension(current_user): Extension<CurrentUser>,
    Path(name): Path<String>,
    Json(payload): Json<RolePermissionsUpdate>,
) -> AppResult<Json<CustomRole>> {
    tracing::info!(
        user_id = %current_user.id(),
        username = %current_user.username,
        role = %name,
        permissions = ?payload.permissions,
        "Updating role permissions"
    );

    // 权限天花板校验
    validate_permission_ceiling(&gate, &current_user, &payload.permissions)?;

    let before = format!("{:?}", state.roles.get(&name).map(|r| r.permissions));
    let role = state.roles.update_permissions(&name, payload)?;
    let after = format!("{:?}", role.permissions);

    audit_log!(
        "role_permissions_updated",
        "role",
        role = role.name.as_str(),
        operator_id = current_user.id(),
        before = before.as_str(),
        after = after.as_str()
    );

    Ok(Json(role))
}
