//! End-to-end behaviour of the access gate

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use salon_access::registry::ALL_PERMISSIONS;
use salon_access::{
    AccessError, AccessGate, LocationSnapshot, OverrideSourceError, PermissionRegistry,
    RoleOverrideSource, RoleOverrides, StaffIndex,
};
use shared::models::{
    Appointment, AppointmentStatus, LocationGrant, LocationId, LocationRef, Principal, Role,
    StaffId, StaffMember,
};

fn member(id: &str, locations: &[&str], home: bool) -> StaffMember {
    StaffMember {
        id: StaffId::new(id),
        name: id.to_string(),
        job_role: None,
        locations: locations.iter().map(|l| LocationId::new(*l)).collect(),
        offers_home_service: home,
        is_active: true,
    }
}

fn appointment(id: &str, location: LocationRef, staff: &str) -> Appointment {
    Appointment {
        id: id.to_string(),
        location,
        staff_id: StaffId::new(staff),
        client_id: Some("client-1".into()),
        service_id: None,
        starts_at: Utc.with_ymd_and_hms(2026, 5, 4, 14, 0, 0).unwrap(),
        ends_at: Utc.with_ymd_and_hms(2026, 5, 4, 15, 0, 0).unwrap(),
        status: AppointmentStatus::Confirmed,
    }
}

fn gate() -> AccessGate {
    AccessGate::builtin(LocationSnapshot::new(1, ["loc1", "loc2", "loc3"]))
}

fn roster() -> Vec<StaffMember> {
    vec![
        member("sam", &["loc1"], true),
        member("lee", &["loc2"], false),
        member("kim", &["loc3"], false),
        member("ola", &["loc1", "loc2"], true),
    ]
}

fn calendar() -> Vec<Appointment> {
    vec![
        appointment("home-sam", LocationRef::Home, "sam"),
        appointment("loc1-sam", LocationRef::physical("loc1"), "sam"),
        appointment("loc2-lee", LocationRef::physical("loc2"), "lee"),
        appointment("loc3-kim", LocationRef::physical("loc3"), "kim"),
        appointment("home-ola", LocationRef::Home, "ola"),
        appointment("online-kim", LocationRef::Online, "kim"),
    ]
}

fn non_admins() -> Vec<Principal> {
    vec![
        Principal::new("m", Role::Manager, LocationGrant::physical(["loc1", "loc2"])),
        Principal::new("s", Role::Staff, LocationGrant::physical(["loc1"])),
        Principal::new("w", Role::Staff, LocationGrant::All),
        Principal::new("r", Role::Receptionist, LocationGrant::physical(["loc2"])),
        Principal::new("j", Role::Staff, LocationGrant::physical(["loc3"])).with_job_role("receptionist"),
        Principal::new("o", Role::OnlineStoreReceptionist, LocationGrant::parse_list("loc1,online")),
        Principal::new("c", Role::Client, LocationGrant::none()),
    ]
}

fn queries() -> Vec<LocationRef> {
    vec![
        LocationRef::All,
        LocationRef::Home,
        LocationRef::Online,
        LocationRef::physical("loc1"),
        LocationRef::physical("loc2"),
        LocationRef::physical("loc3"),
        LocationRef::physical("gone"),
    ]
}

#[test]
fn test_wildcard_dominance() {
    let gate = gate();
    let index = StaffIndex::from_members(&roster());
    let appointments = calendar();

    for role in [Role::Admin, Role::SuperAdmin] {
        let admin = Principal::new("a", role, LocationGrant::physical(["loc3"]));
        for action in ALL_PERMISSIONS.iter().chain(["not_in_catalogue"].iter()) {
            assert!(gate.has_permission(&admin, action).unwrap(), "{role} lacks {action}");
        }

        let visible = gate.visible_subset(&admin, &appointments, &LocationRef::All, &index);
        assert_eq!(visible.len(), appointments.len());
    }
}

#[test]
fn test_job_role_precedence() {
    let gate = gate();
    let receptionist = Principal::new("p", Role::Staff, LocationGrant::physical(["loc1"]))
        .with_job_role("receptionist");

    let resolved = gate.resolve_permissions(&receptionist).unwrap();
    let expected = gate
        .registry()
        .permissions_for_job_role(&"receptionist".into())
        .unwrap();
    assert_eq!(resolved, expected);
    assert_ne!(resolved, gate.registry().permissions_for_role(Role::Staff));
    assert!(gate.has_permission(&receptionist, "create_appointment").unwrap());
}

#[test]
fn test_reserved_virtual_selection() {
    let gate = gate();
    for principal in non_admins() {
        for target in [LocationRef::All, LocationRef::Home, LocationRef::Online] {
            assert!(
                !gate.can_select(&principal, &target),
                "{} selected {target}",
                principal.id
            );
        }
    }
}

#[test]
fn test_cross_location_symmetry() {
    let gate = gate();
    let index = StaffIndex::from_members(&roster());
    let home = appointment("A", LocationRef::Home, "sam");
    let branch = appointment("B", LocationRef::physical("loc1"), "sam");

    let at_loc1 = Principal::new("p", Role::Staff, LocationGrant::physical(["loc1"]));
    let visible = gate.visible_subset(&at_loc1, [&home], &LocationRef::physical("loc1"), &index);
    assert_eq!(visible.len(), 1);

    let admin = Principal::new("a", Role::Admin, LocationGrant::none());
    let visible = gate.visible_subset(&admin, [&branch], &LocationRef::Home, &index);
    assert_eq!(visible.len(), 1);
}

#[test]
fn test_multi_branch_mobile_staff_shows_on_every_branch() {
    let gate = gate();
    let index = StaffIndex::from_members(&roster());
    let appointments = calendar();

    for branch in ["loc1", "loc2"] {
        let principal = Principal::new("p", Role::Staff, LocationGrant::physical([branch]));
        let visible = gate.visible_subset(&principal, &appointments, &LocationRef::physical(branch), &index);
        assert!(visible.iter().any(|a| a.id == "home-ola"), "missing on {branch}");
    }
}

#[test]
fn test_filtering_is_idempotent() {
    let gate = gate();
    let staff = roster();
    let index = StaffIndex::from_members(&staff);
    let appointments = calendar();

    let mut principals = non_admins();
    principals.push(Principal::new("a", Role::Admin, LocationGrant::none()));

    for principal in &principals {
        for query in queries() {
            let once = gate.visible_subset(principal, &appointments, &query, &index);
            let twice = gate.visible_subset(principal, once.clone(), &query, &index);
            assert_eq!(once, twice, "{} / {query}", principal.id);

            let once = gate.visible_subset(principal, &staff, &query, &index);
            let twice = gate.visible_subset(principal, once.clone(), &query, &index);
            assert_eq!(once, twice, "{} / {query}", principal.id);
        }
    }
}

#[test]
fn test_stale_grant_never_leaks() {
    let gate = gate();
    let index = StaffIndex::from_members(&roster());
    let orphaned = vec![
        member("ghost", &["closed"], false),
        member("sam", &["loc1"], true),
    ];
    let principal = Principal::new("p", Role::Manager, LocationGrant::physical(["closed"]));

    for query in queries().into_iter().chain([LocationRef::physical("closed")]) {
        let visible = gate.visible_subset(&principal, &orphaned, &query, &index);
        assert!(visible.iter().all(|m| m.id.as_str() != "ghost"), "leaked on {query}");
    }
    assert!(!gate.can_select(&principal, &LocationRef::physical("closed")));
}

#[test]
fn test_staff_querying_other_branch_sees_nothing() {
    let gate = gate();
    let staff = vec![member("lee", &["loc2"], false), member("kim", &["loc2"], false)];
    let index = StaffIndex::from_members(&staff);
    let principal = Principal::new("p", Role::Staff, LocationGrant::physical(["loc1"]));

    let visible = gate.visible_subset(&principal, &staff, &LocationRef::physical("loc2"), &index);
    assert!(visible.is_empty());
}

#[test]
fn test_manager_all_query_narrowed_to_grant() {
    let gate = gate();
    let index = StaffIndex::from_members(&roster());
    let appointments = calendar();
    let manager = Principal::new("m", Role::Manager, LocationGrant::physical(["loc1", "loc2"]));

    let visible = gate.visible_subset(&manager, &appointments, &LocationRef::All, &index);
    let ids: Vec<_> = visible.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["loc1-sam", "loc2-lee"]);
}

#[derive(Debug)]
struct Unreachable;

impl RoleOverrideSource for Unreachable {
    fn lookup_role_permissions(&self, _role_id: &str) -> Result<Option<Vec<String>>, OverrideSourceError> {
        Err(OverrideSourceError::new("role store offline"))
    }
}

#[test]
fn test_broken_override_source_fails_closed() {
    let gate = AccessGate::new(
        Arc::new(PermissionRegistry::builtin()),
        Arc::new(Unreachable),
        Arc::new(LocationSnapshot::new(1, ["loc1"])),
    );

    let manager = Principal::new("m", Role::Manager, LocationGrant::All);
    let err = gate.has_permission(&manager, "view_staff").unwrap_err();
    assert!(matches!(err, AccessError::OverrideSource { .. }));
    assert!(gate.ensure_permission(&manager, "view_staff").is_err());

    // job-role entries and admins never reach the source
    let admin = Principal::new("a", Role::Admin, LocationGrant::none());
    assert!(gate.has_permission(&admin, "view_staff").unwrap());
    let front_desk = manager.clone().with_job_role("receptionist");
    assert!(gate.has_permission(&front_desk, "view_staff").unwrap());
}

#[test]
fn test_override_snapshot_replaces_role_table() {
    let mut overrides = RoleOverrides::new();
    overrides.insert("Client", vec!["view_staff".into()]);
    let gate = AccessGate::new(
        Arc::new(PermissionRegistry::builtin()),
        Arc::new(overrides),
        Arc::new(LocationSnapshot::new(1, ["loc1"])),
    );

    let client = Principal::new("c", Role::Client, LocationGrant::none());
    assert!(gate.has_permission(&client, "view_staff").unwrap());
    assert!(!gate.has_permission(&client, "book_appointment").unwrap());
}

#[test]
fn test_home_work_visible_from_any_branch_calendar() {
    let gate = gate();
    let index = StaffIndex::from_members(&roster());
    let home = appointment("A", LocationRef::Home, "sam");
    let at_loc2 = Principal::new("p", Role::Staff, LocationGrant::physical(["loc2"]));

    let visible = gate.visible_subset(&at_loc2, [&home], &LocationRef::physical("loc1"), &index);
    assert_eq!(visible.len(), 1);

    let visible = gate.visible_subset(&at_loc2, [&home], &LocationRef::physical("loc3"), &index);
    assert!(visible.is_empty());
}
