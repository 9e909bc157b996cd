//! Access roles
//!
//! [`Role`] is the coarse access role carried by every principal and is a
//! closed set. [`JobRole`] is the business-configurable occupation tag
//! (stylist, receptionist, ...) and stays an open string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse access role (RBAC 角色)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Super-admin alias of [`Role::Admin`]
    SuperAdmin,
    Admin,
    Manager,
    Staff,
    Receptionist,
    OnlineStoreReceptionist,
    Client,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Staff,
        Role::Receptionist,
        Role::OnlineStoreReceptionist,
        Role::Client,
    ];

    /// Stable role id, also the key used by the custom-role override source
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Receptionist => "receptionist",
            Role::OnlineStoreReceptionist => "online_store_receptionist",
            Role::Client => "client",
        }
    }

    /// Admin or its super-admin alias
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub const fn is_receptionist_family(&self) -> bool {
        matches!(self, Role::Receptionist | Role::OnlineStoreReceptionist)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role id does not name a [`Role`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive; `superadmin` and `super-admin` are accepted for the alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "receptionist" => Ok(Role::Receptionist),
            "online_store_receptionist" => Ok(Role::OnlineStoreReceptionist),
            "client" => Ok(Role::Client),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Occupation tag, independent of [`Role`]
///
/// Always stored trimmed and lowercase so registry lookups are stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct JobRole(String);

impl JobRole {
    pub const RECEPTIONIST: &'static str = "receptionist";
    pub const ONLINE_STORE_RECEPTIONIST: &'static str = "online_store_receptionist";

    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `receptionist`, `online_store_receptionist` or any `*_receptionist` tag
    pub fn is_receptionist_family(&self) -> bool {
        self.0 == Self::RECEPTIONIST || self.0.ends_with("_receptionist")
    }
}

impl From<String> for JobRole {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for JobRole {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<JobRole> for String {
    fn from(value: JobRole) -> Self {
        value.0
    }
}

impl fmt::Display for JobRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
