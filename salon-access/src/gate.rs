//! AccessGate
//!
//! Façade over the registry, override source and location snapshot. Holds
//! only `Arc` snapshots, so building one per request is cheap and a request
//! never observes a table change halfway through.
//!
//! The action check and the visibility check are separate calls. Callers
//! run `has_permission` (or `ensure_permission`) before `visible_subset`.

use std::sync::Arc;

use shared::models::{LocationRef, Principal};

use crate::error::{AccessError, AccessResult};
use crate::grant::{CanonicalGrant, GrantResolution, LocationGrantResolver};
use crate::locations::LocationSnapshot;
use crate::registry::{PermissionRegistry, PermissionSet};
use crate::resolver::{NoOverrides, PermissionResolver, RoleOverrideSource};
use crate::visibility::{LocationScoped, StaffIndex, VisibilityFilter};

#[derive(Debug, Clone)]
pub struct AccessGate {
    registry: Arc<PermissionRegistry>,
    overrides: Arc<dyn RoleOverrideSource>,
    locations: Arc<LocationSnapshot>,
}

impl AccessGate {
    pub fn new(
        registry: Arc<PermissionRegistry>,
        overrides: Arc<dyn RoleOverrideSource>,
        locations: Arc<LocationSnapshot>,
    ) -> Self {
        Self {
            registry,
            overrides,
            locations,
        }
    }

    /// Built-in tables, no overrides
    pub fn builtin(locations: LocationSnapshot) -> Self {
        Self::new(
            Arc::new(PermissionRegistry::builtin()),
            Arc::new(NoOverrides),
            Arc::new(locations),
        )
    }

    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    pub fn locations(&self) -> &LocationSnapshot {
        &self.locations
    }

    fn resolver(&self) -> PermissionResolver<'_> {
        PermissionResolver::new(&self.registry, self.overrides.as_ref())
    }

    fn grants(&self) -> LocationGrantResolver<'_> {
        LocationGrantResolver::new(&self.locations)
    }

    pub fn resolve_permissions(&self, principal: &Principal) -> AccessResult<PermissionSet> {
        self.resolver().resolve(principal)
    }

    pub fn has_permission(&self, principal: &Principal, action: &str) -> AccessResult<bool> {
        self.resolver().has_permission(principal, action)
    }

    pub fn has_any_permission(&self, principal: &Principal, actions: &[&str]) -> AccessResult<bool> {
        self.resolver().has_any_permission(principal, actions)
    }

    pub fn has_all_permissions(&self, principal: &Principal, actions: &[&str]) -> AccessResult<bool> {
        self.resolver().has_all_permissions(principal, actions)
    }

    /// `Err(PermissionDenied)` unless the principal holds `action`
    pub fn ensure_permission(&self, principal: &Principal, action: &str) -> AccessResult<()> {
        if self.has_permission(principal, action)? {
            Ok(())
        } else {
            Err(AccessError::PermissionDenied {
                action: action.to_string(),
            })
        }
    }

    pub fn grant_resolution(&self, principal: &Principal) -> GrantResolution {
        self.grants().canonicalize(principal)
    }

    pub fn canonical_grant(&self, principal: &Principal) -> CanonicalGrant {
        self.grants().canonical_grant(principal)
    }

    pub fn can_select(&self, principal: &Principal, target: &LocationRef) -> bool {
        self.grants().can_select(principal, target)
    }

    pub fn selectable_locations(&self, principal: &Principal) -> Vec<LocationRef> {
        self.grants().selectable_locations(principal)
    }

    pub fn visible_subset<R, I>(
        &self,
        principal: &Principal,
        resources: I,
        query: &LocationRef,
        staff: &StaffIndex,
    ) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
        R: LocationScoped,
    {
        VisibilityFilter::new(&self.locations, staff).visible(principal, resources, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RoleOverrides;
    use shared::models::{LocationGrant, Role};

    fn gate_with(overrides: RoleOverrides) -> AccessGate {
        AccessGate::new(
            Arc::new(PermissionRegistry::builtin()),
            Arc::new(overrides),
            Arc::new(LocationSnapshot::new(1, ["loc1", "loc2"])),
        )
    }

    #[test]
    fn test_ensure_permission() {
        let gate = gate_with(RoleOverrides::new());
        let client = Principal::new("c", Role::Client, LocationGrant::none());

        assert!(gate.ensure_permission(&client, "book_appointment").is_ok());
        let err = gate.ensure_permission(&client, "view_staff").unwrap_err();
        assert!(matches!(err, AccessError::PermissionDenied { ref action } if action == "view_staff"));
    }

    #[test]
    fn test_gate_uses_override_snapshot() {
        let mut overrides = RoleOverrides::new();
        overrides.insert("manager", vec!["view_staff".into()]);
        let gate = gate_with(overrides);
        let manager = Principal::new("m", Role::Manager, LocationGrant::All);

        assert!(gate.has_permission(&manager, "view_staff").unwrap());
        assert!(!gate.has_permission(&manager, "manage_staff").unwrap());
        assert!(gate.has_all_permissions(&manager, &["view_staff"]).unwrap());
    }

    #[test]
    fn test_clones_share_snapshots() {
        let gate = AccessGate::builtin(LocationSnapshot::new(3, ["loc1"]));
        let clone = gate.clone();
        assert_eq!(clone.locations().version(), 3);
        assert_eq!(clone.registry().version(), gate.registry().version());
    }

    #[test]
    fn test_grant_helpers_delegate() {
        let gate = gate_with(RoleOverrides::new());
        let staff = Principal::new("s", Role::Staff, LocationGrant::physical(["loc1", "old"]));

        assert!(gate.can_select(&staff, &LocationRef::physical("loc1")));
        assert!(!gate.can_select(&staff, &LocationRef::Home));
        assert_eq!(gate.grant_resolution(&staff).stale.len(), 1);
        assert_eq!(gate.selectable_locations(&staff), vec![LocationRef::physical("loc1")]);
        assert!(!gate.canonical_grant(&staff).is_all());
    }
}
