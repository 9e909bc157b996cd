//! Service Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::location::LocationId;

/// Bookable service (cut, colour, massage, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Branches offering the service
    #[serde(default)]
    pub locations: BTreeSet<LocationId>,
    /// Also bookable through the home-service channel
    #[serde(default)]
    pub offers_home_service: bool,
    pub duration_minutes: u32,
    pub price: Decimal,
}
