//! Staff Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::access::JobRole;
use super::location::LocationId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StaffId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Staff member entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub job_role: Option<JobRole>,
    /// Physical branches the staff member is assigned to
    #[serde(default)]
    pub locations: BTreeSet<LocationId>,
    /// Mobile staff bookable through the home-service channel
    #[serde(default)]
    pub offers_home_service: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
