//! Location grant resolution
//!
//! Turns the raw grant carried by a principal into the set of physical
//! branches it may act on, and answers location-switcher questions.

use serde::Serialize;
use std::collections::BTreeSet;

use shared::models::{LocationGrant, LocationId, LocationRef, Principal};

use crate::locations::LocationSnapshot;

/// Grant reduced to active physical ids
///
/// Virtual tags never survive canonicalization, so a receptionist granted
/// `["loc1", "home"]` ends up with `loc1` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<LocationRef>")]
pub enum CanonicalGrant {
    All,
    Physical(BTreeSet<LocationId>),
}

impl CanonicalGrant {
    pub fn is_all(&self) -> bool {
        matches!(self, CanonicalGrant::All)
    }

    pub fn contains(&self, id: &LocationId) -> bool {
        match self {
            CanonicalGrant::All => true,
            CanonicalGrant::Physical(ids) => ids.contains(id),
        }
    }

    /// True when any of `ids` falls inside the grant
    pub fn intersects<'a>(&self, mut ids: impl Iterator<Item = &'a LocationId>) -> bool {
        match self {
            CanonicalGrant::All => true,
            CanonicalGrant::Physical(granted) => ids.any(|id| granted.contains(id)),
        }
    }
}

impl From<CanonicalGrant> for Vec<LocationRef> {
    fn from(grant: CanonicalGrant) -> Self {
        match grant {
            CanonicalGrant::All => vec![LocationRef::All],
            CanonicalGrant::Physical(ids) => ids.into_iter().map(LocationRef::Physical).collect(),
        }
    }
}

/// Canonical grant plus the ids that no longer exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantResolution {
    pub grant: CanonicalGrant,
    /// Physical ids in the raw grant that are not in the active snapshot
    pub stale: BTreeSet<LocationId>,
}

#[derive(Debug, Clone, Copy)]
pub struct LocationGrantResolver<'a> {
    locations: &'a LocationSnapshot,
}

impl<'a> LocationGrantResolver<'a> {
    pub fn new(locations: &'a LocationSnapshot) -> Self {
        Self { locations }
    }

    pub fn canonicalize(&self, principal: &Principal) -> GrantResolution {
        let refs = match &principal.location_grant {
            LocationGrant::All => {
                return GrantResolution {
                    grant: CanonicalGrant::All,
                    stale: BTreeSet::new(),
                };
            }
            LocationGrant::Only(refs) => refs,
        };

        let (active, stale): (BTreeSet<LocationId>, BTreeSet<LocationId>) = refs
            .iter()
            .filter_map(LocationRef::as_physical)
            .cloned()
            .partition(|id| self.locations.contains(id));

        if !stale.is_empty() {
            tracing::debug!(
                principal = %principal.id,
                stale = ?stale,
                snapshot_version = self.locations.version(),
                "Dropped stale location ids from grant"
            );
        }

        GrantResolution {
            grant: CanonicalGrant::Physical(active),
            stale,
        }
    }

    pub fn canonical_grant(&self, principal: &Principal) -> CanonicalGrant {
        self.canonicalize(principal).grant
    }

    /// Whether `principal` may switch its working context to `target`
    ///
    /// Admins may select anything. Everyone else is limited to active branches
    /// inside their canonical grant; virtual lenses are never selectable.
    pub fn can_select(&self, principal: &Principal, target: &LocationRef) -> bool {
        if principal.is_admin() {
            return true;
        }
        match target {
            LocationRef::All | LocationRef::Home | LocationRef::Online => false,
            LocationRef::Physical(id) => {
                self.locations.contains(id) && self.canonical_grant(principal).contains(id)
            }
        }
    }

    /// Location switcher options, in display order
    pub fn selectable_locations(&self, principal: &Principal) -> Vec<LocationRef> {
        if principal.is_admin() {
            return [LocationRef::All, LocationRef::Home, LocationRef::Online]
                .into_iter()
                .chain(self.locations.ids().cloned().map(LocationRef::Physical))
                .collect();
        }
        match self.canonical_grant(principal) {
            CanonicalGrant::All => self.locations.ids().cloned().map(LocationRef::Physical).collect(),
            CanonicalGrant::Physical(ids) => ids.into_iter().map(LocationRef::Physical).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn snapshot() -> LocationSnapshot {
        LocationSnapshot::new(1, ["loc1", "loc2", "loc3"])
    }

    fn ids(raw: &[&str]) -> BTreeSet<LocationId> {
        raw.iter().map(|id| LocationId::new(*id)).collect()
    }

    #[test]
    fn test_canonicalize_drops_virtual_and_stale() {
        let locations = snapshot();
        let resolver = LocationGrantResolver::new(&locations);
        let principal = Principal::new(
            "r1",
            Role::Receptionist,
            LocationGrant::Only(
                [
                    LocationRef::physical("loc1"),
                    LocationRef::physical("gone"),
                    LocationRef::Home,
                    LocationRef::Online,
                ]
                .into(),
            ),
        );

        let resolution = resolver.canonicalize(&principal);
        assert_eq!(resolution.grant, CanonicalGrant::Physical(ids(&["loc1"])));
        assert_eq!(resolution.stale, ids(&["gone"]));
    }

    #[test]
    fn test_canonicalize_all() {
        let locations = snapshot();
        let resolver = LocationGrantResolver::new(&locations);
        let principal = Principal::new("m1", Role::Manager, LocationGrant::All);

        let resolution = resolver.canonicalize(&principal);
        assert!(resolution.grant.is_all());
        assert!(resolution.stale.is_empty());
    }

    #[test]
    fn test_can_select_virtual_is_admin_only() {
        let locations = snapshot();
        let resolver = LocationGrantResolver::new(&locations);
        let staff = Principal::new("s1", Role::Staff, LocationGrant::All);
        let admin = Principal::new("a1", Role::Admin, LocationGrant::none());

        for target in [LocationRef::All, LocationRef::Home, LocationRef::Online] {
            assert!(!resolver.can_select(&staff, &target));
            assert!(resolver.can_select(&admin, &target));
        }
    }

    #[test]
    fn test_can_select_physical() {
        let locations = snapshot();
        let resolver = LocationGrantResolver::new(&locations);
        let staff = Principal::new("s1", Role::Staff, LocationGrant::physical(["loc1", "gone"]));

        assert!(resolver.can_select(&staff, &LocationRef::physical("loc1")));
        assert!(!resolver.can_select(&staff, &LocationRef::physical("loc2")));
        assert!(!resolver.can_select(&staff, &LocationRef::physical("gone")));

        let wide = Principal::new("s2", Role::Staff, LocationGrant::All);
        assert!(resolver.can_select(&wide, &LocationRef::physical("loc3")));
        assert!(!resolver.can_select(&wide, &LocationRef::physical("gone")));
    }

    #[test]
    fn test_selectable_locations() {
        let locations = snapshot();
        let resolver = LocationGrantResolver::new(&locations);

        let admin = Principal::new("a1", Role::SuperAdmin, LocationGrant::none());
        let options = resolver.selectable_locations(&admin);
        assert_eq!(&options[..3], &[LocationRef::All, LocationRef::Home, LocationRef::Online]);
        assert_eq!(options.len(), 6);

        let manager = Principal::new("m1", Role::Manager, LocationGrant::physical(["loc2", "loc1"]));
        assert_eq!(
            resolver.selectable_locations(&manager),
            vec![LocationRef::physical("loc1"), LocationRef::physical("loc2")]
        );
    }

    #[test]
    fn test_canonical_grant_serializes_as_list() {
        let json = serde_json::to_string(&CanonicalGrant::Physical(ids(&["loc1"]))).unwrap();
        assert_eq!(json, r#"["loc1"]"#);
        assert_eq!(serde_json::to_string(&CanonicalGrant::All).unwrap(), r#"["all"]"#);
    }
}
