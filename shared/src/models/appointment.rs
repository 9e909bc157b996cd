//! Appointment Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::LocationRef;
use super::staff::StaffId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Booked,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

/// Appointment entity
///
/// `location` is a branch, `home` (served at the client's address) or
/// `online` (booked through the online store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub location: LocationRef,
    pub staff_id: StaffId,
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub status: AppointmentStatus,
}
