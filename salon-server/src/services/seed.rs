//! Seed data
//!
//! Resources are kept in memory and loaded from one JSON document:
//!
//! ```json
//! {
//!   "locations": [{ "id": "loc1", "name": "Centre" }],
//!   "staff": [{ "id": "s1", "name": "Ana", "locations": ["loc1"], "offers_home_service": true }],
//!   "appointments": [],
//!   "services": [],
//!   "roles": [{ "name": "manager", "permissions": ["view_staff"] }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::models::{Appointment, CustomRole, LocationRecord, Role, Service, StaffMember};

use crate::core::{Result, ServerError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub roles: Vec<CustomRole>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let seed = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            locations = seed.locations.len(),
            staff = seed.staff.len(),
            appointments = seed.appointments.len(),
            services = seed.services.len(),
            roles = seed.roles.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let seed: Self = serde_json::from_str(raw).map_err(|e| ServerError::Seed(e.to_string()))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reject reserved or duplicate location ids and overrides for admin roles
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for location in &self.locations {
            if location.id.is_reserved() {
                return Err(ServerError::Seed(format!(
                    "location id '{}' is reserved",
                    location.id
                )));
            }
            if !seen.insert(&location.id) {
                return Err(ServerError::Seed(format!(
                    "duplicate location id '{}'",
                    location.id
                )));
            }
        }

        for role in &self.roles {
            let parsed: Role = role
                .name
                .parse()
                .map_err(|e| ServerError::Seed(format!("custom role: {}", e)))?;
            if parsed.is_admin() {
                return Err(ServerError::Seed(format!(
                    "role '{}' cannot be overridden",
                    role.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_seed() {
        let seed = SeedData::from_json(
            r#"{
                "locations": [{ "id": "loc1", "name": "Centre" }],
                "staff": [{ "id": "s1", "name": "Ana", "locations": ["loc1"], "offers_home_service": true }],
                "appointments": [{
                    "id": "a1", "location": "home", "staff_id": "s1",
                    "client_id": null, "service_id": null,
                    "starts_at": "2026-03-02T09:00:00Z", "ends_at": "2026-03-02T10:00:00Z"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(seed.locations.len(), 1);
        assert!(seed.locations[0].is_active);
        assert!(seed.staff[0].offers_home_service);
        assert_eq!(seed.appointments[0].location, shared::models::LocationRef::Home);
        assert!(seed.roles.is_empty());
    }

    #[test]
    fn test_reserved_location_id_rejected() {
        let err = SeedData::from_json(r#"{ "locations": [{ "id": "Online", "name": "Web" }] }"#).unwrap_err();
        assert!(matches!(err, ServerError::Seed(msg) if msg.contains("reserved")));
    }

    #[test]
    fn test_duplicate_location_id_rejected() {
        let err = SeedData::from_json(
            r#"{ "locations": [{ "id": "loc1", "name": "A" }, { "id": "loc1", "name": "B" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::Seed(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_admin_override_rejected() {
        let err = SeedData::from_json(r#"{ "roles": [{ "name": "admin", "permissions": [] }] }"#).unwrap_err();
        assert!(matches!(err, ServerError::Seed(_)));

        let err = SeedData::from_json(r#"{ "roles": [{ "name": "owner", "permissions": [] }] }"#).unwrap_err();
        assert!(matches!(err, ServerError::Seed(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{ "locations": [{ "id": "loc9", "name": "Pier" }] }"#).unwrap();

        let seed = SeedData::load(&path).unwrap();
        assert_eq!(seed.locations[0].id.as_str(), "loc9");

        assert!(matches!(SeedData::load(&dir.path().join("missing.json")), Err(ServerError::Io(_))));
    }
}
