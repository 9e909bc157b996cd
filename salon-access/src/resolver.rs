//! Permission resolution
//!
//! Principal → effective [`PermissionSet`], first match wins:
//!
//! 1. `admin` / `super_admin` → wildcard (override source not consulted)
//! 2. explicit job-role entry in the registry
//! 3. non-empty custom-role override for the role id
//! 4. the role's default table

use std::collections::HashMap;
use std::fmt;

use shared::models::{CustomRole, Principal};

use crate::error::{AccessError, AccessResult, OverrideSourceError};
use crate::registry::{PermissionRegistry, PermissionSet};

/// External store of per-role permission overrides
///
/// Keys are matched case-insensitively. `Ok(None)` and `Ok(Some(empty))` both
/// mean "no override"; an `Err` is propagated so callers can fail closed.
pub trait RoleOverrideSource: Send + Sync + fmt::Debug {
    fn lookup_role_permissions(&self, role_id: &str) -> Result<Option<Vec<String>>, OverrideSourceError>;
}

/// Source with no overrides at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl RoleOverrideSource for NoOverrides {
    fn lookup_role_permissions(&self, _role_id: &str) -> Result<Option<Vec<String>>, OverrideSourceError> {
        Ok(None)
    }
}

/// In-memory override snapshot
#[derive(Debug, Clone, Default)]
pub struct RoleOverrides {
    entries: HashMap<String, Vec<String>>,
}

impl RoleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active custom roles only
    pub fn from_custom_roles<'a>(roles: impl IntoIterator<Item = &'a CustomRole>) -> Self {
        let mut overrides = Self::new();
        for role in roles.into_iter().filter(|r| r.is_active) {
            overrides.insert(&role.name, role.permissions.clone());
        }
        overrides
    }

    pub fn insert(&mut self, role_id: &str, permissions: Vec<String>) {
        self.entries.insert(role_id.trim().to_lowercase(), permissions);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RoleOverrideSource for RoleOverrides {
    fn lookup_role_permissions(&self, role_id: &str) -> Result<Option<Vec<String>>, OverrideSourceError> {
        Ok(self.entries.get(&role_id.trim().to_lowercase()).cloned())
    }
}

/// Resolves principals against one registry snapshot and one override source
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver<'a> {
    registry: &'a PermissionRegistry,
    overrides: &'a dyn RoleOverrideSource,
}

impl<'a> PermissionResolver<'a> {
    pub fn new(registry: &'a PermissionRegistry, overrides: &'a dyn RoleOverrideSource) -> Self {
        Self { registry, overrides }
    }

    pub fn resolve(&self, principal: &Principal) -> AccessResult<PermissionSet> {
        if principal.is_admin() {
            return Ok(PermissionSet::Wildcard);
        }

        if let Some(job_role) = &principal.job_role {
            if let Some(set) = self.registry.permissions_for_job_role(job_role) {
                return Ok(set);
            }
            if !self.registry.is_known_job_role(job_role) {
                tracing::debug!(
                    principal = %principal.id,
                    job_role = %job_role,
                    registry_version = self.registry.version(),
                    "Unknown job role, falling back to role permissions"
                );
            }
        }

        let role_id = principal.role.as_str();
        let overridden = self
            .overrides
            .lookup_role_permissions(role_id)
            .map_err(|source| AccessError::OverrideSource {
                role: principal.role,
                source,
            })?;
        if let Some(tokens) = overridden.filter(|tokens| !tokens.is_empty()) {
            return Ok(PermissionSet::from_tokens(tokens));
        }

        Ok(self.registry.permissions_for_role(principal.role))
    }

    pub fn has_permission(&self, principal: &Principal, action: &str) -> AccessResult<bool> {
        Ok(self.resolve(principal)?.contains(action))
    }

    /// False for an empty list
    pub fn has_any_permission(&self, principal: &Principal, actions: &[&str]) -> AccessResult<bool> {
        let set = self.resolve(principal)?;
        Ok(actions.iter().any(|action| set.contains(action)))
    }

    /// Vacuously true for an empty list
    pub fn has_all_permissions(&self, principal: &Principal, actions: &[&str]) -> AccessResult<bool> {
        let set = self.resolve(principal)?;
        Ok(actions.iter().all(|action| set.contains(action)))
    }
}
