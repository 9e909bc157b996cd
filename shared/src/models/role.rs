//! Custom Role Model

use serde::{Deserialize, Serialize};

/// Custom permission list for a role id (RBAC 角色覆盖)
///
/// Served by the custom-role override source. `name` matches a role id
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRole {
    pub name: String,
    pub description: Option<String>,
    /// Permission tokens (e.g. ["view_staff", "edit_appointment"])
    pub permissions: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Update role permissions payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermissionsUpdate {
    pub permissions: Vec<String>,
    pub description: Option<String>,
}
