//! Visibility filter
//!
//! Narrows a resource collection first by the queried location, then by what
//! the principal is granted. Home-service work links the virtual `home`
//! channel and physical branches in both directions:
//!
//! - a `home` appointment shows on the calendar of the branch its stylist is
//!   based at, so the branch sees the stylist as busy
//! - a branch appointment of a home-service stylist shows on the `home`
//!   board, so the mobile schedule sees it too
//!
//! The decision for a resource depends only on that resource, so filtering
//! an already filtered list changes nothing.

use std::collections::{BTreeSet, HashMap};

use shared::models::{
    Appointment, LocationId, LocationRecord, LocationRef, Principal, Service, StaffId, StaffMember,
};

use crate::grant::{CanonicalGrant, LocationGrantResolver};
use crate::locations::LocationSnapshot;

/// A resource tagged with locations
pub trait LocationScoped {
    fn location_refs(&self) -> Vec<LocationRef>;

    /// Bookable through the home-service channel on its own account
    fn offers_home_service(&self) -> bool {
        false
    }

    /// Staff member the resource is assigned to, for the home-service links
    fn assigned_staff(&self) -> Option<&StaffId> {
        None
    }
}

impl<T: LocationScoped + ?Sized> LocationScoped for &T {
    fn location_refs(&self) -> Vec<LocationRef> {
        (**self).location_refs()
    }

    fn offers_home_service(&self) -> bool {
        (**self).offers_home_service()
    }

    fn assigned_staff(&self) -> Option<&StaffId> {
        (**self).assigned_staff()
    }
}

impl LocationScoped for StaffMember {
    fn location_refs(&self) -> Vec<LocationRef> {
        self.locations.iter().cloned().map(LocationRef::Physical).collect()
    }

    fn offers_home_service(&self) -> bool {
        self.offers_home_service
    }
}

impl LocationScoped for Appointment {
    fn location_refs(&self) -> Vec<LocationRef> {
        vec![self.location.clone()]
    }

    fn assigned_staff(&self) -> Option<&StaffId> {
        Some(&self.staff_id)
    }
}

impl LocationScoped for Service {
    fn location_refs(&self) -> Vec<LocationRef> {
        self.locations.iter().cloned().map(LocationRef::Physical).collect()
    }

    fn offers_home_service(&self) -> bool {
        self.offers_home_service
    }
}

impl LocationScoped for LocationRecord {
    fn location_refs(&self) -> Vec<LocationRef> {
        vec![LocationRef::Physical(self.id.clone())]
    }
}

/// Where a staff member works
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffLink {
    pub locations: BTreeSet<LocationId>,
    pub offers_home_service: bool,
}

/// Staff id → branches and home-service flag
#[derive(Debug, Clone, Default)]
pub struct StaffIndex {
    links: HashMap<StaffId, StaffLink>,
}

impl StaffIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members<'a>(members: impl IntoIterator<Item = &'a StaffMember>) -> Self {
        let links = members
            .into_iter()
            .map(|member| {
                (
                    member.id.clone(),
                    StaffLink {
                        locations: member.locations.clone(),
                        offers_home_service: member.offers_home_service,
                    },
                )
            })
            .collect();
        Self { links }
    }

    pub fn insert(&mut self, id: StaffId, link: StaffLink) {
        self.links.insert(id, link);
    }

    pub fn get(&self, id: &StaffId) -> Option<&StaffLink> {
        self.links.get(id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Per-call narrowing decided once up front
#[derive(Debug)]
enum Narrowing {
    /// Admin, grant `all`, or receptionist on a granted branch
    None,
    Grant(CanonicalGrant),
}

#[derive(Debug, Clone, Copy)]
pub struct VisibilityFilter<'a> {
    locations: &'a LocationSnapshot,
    staff: &'a StaffIndex,
}

impl<'a> VisibilityFilter<'a> {
    pub fn new(locations: &'a LocationSnapshot, staff: &'a StaffIndex) -> Self {
        Self { locations, staff }
    }

    /// Resources `principal` may see when listing `query`
    ///
    /// An unknown branch in `query` yields an empty list.
    pub fn visible<R, I>(&self, principal: &Principal, resources: I, query: &LocationRef) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
        R: LocationScoped,
    {
        if matches!(query, LocationRef::Physical(id) if !self.locations.contains(id)) {
            return Vec::new();
        }

        let is_admin = principal.is_admin();
        if !is_admin && matches!(query, LocationRef::Home | LocationRef::Online) {
            return Vec::new();
        }

        let narrowing = if is_admin {
            Narrowing::None
        } else {
            let grant = LocationGrantResolver::new(self.locations).canonical_grant(principal);
            let receptionist_on_own_branch = principal.is_receptionist()
                && matches!(query, LocationRef::Physical(id) if grant.contains(id));
            if grant.is_all() || receptionist_on_own_branch {
                Narrowing::None
            } else {
                Narrowing::Grant(grant)
            }
        };

        resources
            .into_iter()
            .filter(|resource| {
                let refs = resource.location_refs();
                self.matches_query(resource, &refs, query) && self.passes_grant(resource, &refs, query, &narrowing)
            })
            .collect()
    }

    fn matches_query<R: LocationScoped>(&self, resource: &R, refs: &[LocationRef], query: &LocationRef) -> bool {
        match query {
            LocationRef::All => true,
            LocationRef::Home => {
                resource.offers_home_service()
                    || refs.contains(&LocationRef::Home)
                    || self.staff_link(resource).is_some_and(|link| link.offers_home_service)
            }
            LocationRef::Online => refs.contains(&LocationRef::Online),
            LocationRef::Physical(id) => {
                refs.iter().any(|r| r.as_physical() == Some(id)) || self.home_work_based_at(resource, refs, id)
            }
        }
    }

    fn passes_grant<R: LocationScoped>(
        &self,
        resource: &R,
        refs: &[LocationRef],
        query: &LocationRef,
        narrowing: &Narrowing,
    ) -> bool {
        let grant = match narrowing {
            Narrowing::None => return true,
            Narrowing::Grant(grant) => grant,
        };

        if grant.intersects(refs.iter().filter_map(LocationRef::as_physical)) {
            return true;
        }

        match query {
            LocationRef::Physical(id) => self.home_work_based_at(resource, refs, id),
            _ => false,
        }
    }

    /// Home-tagged resource whose assigned staff member is based at `location`
    fn home_work_based_at<R: LocationScoped>(&self, resource: &R, refs: &[LocationRef], location: &LocationId) -> bool {
        refs.contains(&LocationRef::Home)
            && self
                .staff_link(resource)
                .is_some_and(|link| link.locations.contains(location))
    }

    fn staff_link<R: LocationScoped>(&self, resource: &R) -> Option<&'a StaffLink> {
        resource.assigned_staff().and_then(|id| self.staff.get(id))
    }
}
