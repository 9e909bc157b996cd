//! Permission Definitions
//!
//! Role → permission and job-role → permission tables.
//!
//! ## 设计原则
//! - `admin` / `super_admin` hold the `all` wildcard and nothing can narrow it
//! - job roles carve bespoke sets out of a coarse role (e.g. online-store-only receptionists)
//! - the registry is an immutable snapshot; changing a table yields a new version

use serde::{Deserialize, Serialize};
use shared::models::{JobRole, Role};
use std::collections::{BTreeSet, HashMap};

/// Wildcard token granting every action
pub const WILDCARD: &str = "all";

/// Configurable permission tokens
/// `all` is not listed; it is a system-level token
pub const ALL_PERMISSIONS: &[&str] = &[
    // === 查看 ===
    "view_staff",            // staff directory
    "view_appointments",     // branch calendars
    "view_own_appointments", // own bookings only
    "view_services",         // service catalogue
    "view_locations",        // branch list
    "view_clients",          // client records
    "view_reports",          // revenue / utilisation reports
    "view_online_orders",    // online store orders
    "view_inventory",        // retail stock
    // === 操作 ===
    "book_appointment",     // self-service booking
    "create_appointment",   // front-desk booking
    "edit_appointment",     // reschedule / reassign
    "cancel_appointment",   // cancel / no-show
    "manage_clients",       // create / edit clients
    "manage_staff",         // staff records and schedules
    "manage_services",      // catalogue editing
    "manage_home_service",  // home-service dispatch
    "manage_online_orders", // fulfil / refund online orders
    "manage_inventory",     // stock adjustments
    // === 敏感操作 ===
    "manage_locations", // create / close branches
    "manage_roles",     // custom role permissions
    "manage_settings",  // system settings
];

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &[WILDCARD];

pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    "view_staff",
    "view_appointments",
    "view_own_appointments",
    "view_services",
    "view_locations",
    "view_clients",
    "view_reports",
    "view_online_orders",
    "view_inventory",
    "create_appointment",
    "edit_appointment",
    "cancel_appointment",
    "manage_clients",
    "manage_staff",
    "manage_services",
    "manage_home_service",
    "manage_inventory",
];

pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[
    "view_staff",
    "view_appointments",
    "view_own_appointments",
    "view_services",
    "view_locations",
    "view_clients",
];

pub const DEFAULT_RECEPTIONIST_PERMISSIONS: &[&str] = &[
    "view_staff",
    "view_appointments",
    "view_services",
    "view_locations",
    "view_clients",
    "create_appointment",
    "edit_appointment",
    "cancel_appointment",
    "manage_clients",
];

pub const DEFAULT_ONLINE_STORE_RECEPTIONIST_PERMISSIONS: &[&str] = &[
    "view_services",
    "view_clients",
    "view_online_orders",
    "view_inventory",
    "manage_online_orders",
    "manage_inventory",
];

pub const DEFAULT_CLIENT_PERMISSIONS: &[&str] = &[
    "view_services",
    "view_locations",
    "view_own_appointments",
    "book_appointment",
];

/// Occupation tags the business currently uses
pub const KNOWN_JOB_ROLES: &[&str] = &[
    "stylist",
    "colorist",
    "barber",
    "therapist",
    "nail_technician",
    "makeup_artist",
    JobRole::RECEPTIONIST,
    JobRole::ONLINE_STORE_RECEPTIONIST,
];

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    permission == WILDCARD || ALL_PERMISSIONS.contains(&permission)
}

/// Resolved permission tokens, or the wildcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum PermissionSet {
    Wildcard,
    Tokens(BTreeSet<String>),
}

impl PermissionSet {
    pub fn empty() -> Self {
        PermissionSet::Tokens(BTreeSet::new())
    }

    /// Build from tokens; any `all` token collapses the set to the wildcard
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: BTreeSet<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.contains(WILDCARD) {
            PermissionSet::Wildcard
        } else {
            PermissionSet::Tokens(tokens)
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, PermissionSet::Wildcard)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PermissionSet::Tokens(tokens) if tokens.is_empty())
    }

    /// Wildcard, or the literal token
    pub fn contains(&self, action: &str) -> bool {
        match self {
            PermissionSet::Wildcard => true,
            PermissionSet::Tokens(tokens) => tokens.contains(action),
        }
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(set: PermissionSet) -> Self {
        match set {
            PermissionSet::Wildcard => vec![WILDCARD.to_string()],
            PermissionSet::Tokens(tokens) => tokens.into_iter().collect(),
        }
    }
}

/// Immutable, versioned permission tables
///
/// Shared behind an `Arc`; [`with_role`](Self::with_role) and
/// [`with_job_role`](Self::with_job_role) return a new snapshot instead of
/// mutating, so a resolution never sees a half-updated table.
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    version: u64,
    roles: HashMap<Role, PermissionSet>,
    job_roles: HashMap<JobRole, PermissionSet>,
    known_job_roles: BTreeSet<JobRole>,
}

impl PermissionRegistry {
    /// Default tables
    pub fn builtin() -> Self {
        let roles = HashMap::from([
            (Role::SuperAdmin, PermissionSet::from_tokens(DEFAULT_ADMIN_PERMISSIONS.iter().copied())),
            (Role::Admin, PermissionSet::from_tokens(DEFAULT_ADMIN_PERMISSIONS.iter().copied())),
            (Role::Manager, PermissionSet::from_tokens(DEFAULT_MANAGER_PERMISSIONS.iter().copied())),
            (Role::Staff, PermissionSet::from_tokens(DEFAULT_STAFF_PERMISSIONS.iter().copied())),
            (
                Role::Receptionist,
                PermissionSet::from_tokens(DEFAULT_RECEPTIONIST_PERMISSIONS.iter().copied()),
            ),
            (
                Role::OnlineStoreReceptionist,
                PermissionSet::from_tokens(DEFAULT_ONLINE_STORE_RECEPTIONIST_PERMISSIONS.iter().copied()),
            ),
            (Role::Client, PermissionSet::from_tokens(DEFAULT_CLIENT_PERMISSIONS.iter().copied())),
        ]);

        let job_roles = HashMap::from([
            (
                JobRole::new(JobRole::RECEPTIONIST),
                PermissionSet::from_tokens(DEFAULT_RECEPTIONIST_PERMISSIONS.iter().copied()),
            ),
            (
                JobRole::new(JobRole::ONLINE_STORE_RECEPTIONIST),
                PermissionSet::from_tokens(DEFAULT_ONLINE_STORE_RECEPTIONIST_PERMISSIONS.iter().copied()),
            ),
        ]);

        Self {
            version: 1,
            roles,
            job_roles,
            known_job_roles: KNOWN_JOB_ROLES.iter().map(JobRole::new).collect(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Role table lookup; admins always get the wildcard
    pub fn permissions_for_role(&self, role: Role) -> PermissionSet {
        if role.is_admin() {
            return PermissionSet::Wildcard;
        }
        self.roles.get(&role).cloned().unwrap_or_default()
    }

    /// Explicit job-role entry, if any
    pub fn permissions_for_job_role(&self, job_role: &JobRole) -> Option<PermissionSet> {
        self.job_roles.get(job_role).cloned()
    }

    pub fn is_known_job_role(&self, job_role: &JobRole) -> bool {
        self.known_job_roles.contains(job_role) || self.job_roles.contains_key(job_role)
    }

    /// New snapshot with `role` mapped to `permissions`
    pub fn with_role(&self, role: Role, permissions: PermissionSet) -> Self {
        let mut next = self.clone();
        next.roles.insert(role, permissions);
        next.version += 1;
        next
    }

    /// New snapshot with an explicit entry for `job_role`
    pub fn with_job_role(&self, job_role: JobRole, permissions: PermissionSet) -> Self {
        let mut next = self.clone();
        next.known_job_roles.insert(job_role.clone());
        next.job_roles.insert(job_role, permissions);
        next.version += 1;
        next
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
