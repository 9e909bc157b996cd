//! Principal Model

use serde::{Deserialize, Serialize};

use super::access::{JobRole, Role};
use super::location::LocationGrant;

/// The authenticated actor of one request
///
/// Built by the authentication provider and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub job_role: Option<JobRole>,
    #[serde(default)]
    pub location_grant: LocationGrant,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role, location_grant: LocationGrant) -> Self {
        Self {
            id: id.into(),
            role,
            job_role: None,
            location_grant,
        }
    }

    pub fn with_job_role(mut self, job_role: impl Into<JobRole>) -> Self {
        self.job_role = Some(job_role.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Receptionist by job role or by coarse role
    pub fn is_receptionist(&self) -> bool {
        self.role.is_receptionist_family()
            || self
                .job_role
                .as_ref()
                .is_some_and(JobRole::is_receptionist_family)
    }
}
