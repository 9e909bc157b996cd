//! Location Model
//!
//! Physical branches and the virtual `home` / `online` channels share one
//! reference space ([`LocationRef`]) so resources can be tagged uniformly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a physical branch (a [`LocationRecord`])
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id would parse as a virtual tag (`all`, `home`, `online`)
    pub fn is_reserved(&self) -> bool {
        LocationRef::virtual_tag(&self.0).is_some()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference to a location
///
/// Wire form is a plain string: `"all"`, `"home"`, `"online"` (any case),
/// anything else is a physical id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocationRef {
    Physical(LocationId),
    /// Home-service channel
    Home,
    /// Online-store channel
    Online,
    /// Every location (admin-only lens)
    All,
}

impl LocationRef {
    pub const ALL: &'static str = "all";
    pub const HOME: &'static str = "home";
    pub const ONLINE: &'static str = "online";

    pub fn physical(id: impl Into<String>) -> Self {
        LocationRef::Physical(LocationId::new(id))
    }

    fn virtual_tag(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(Self::ALL) {
            Some(LocationRef::All)
        } else if raw.eq_ignore_ascii_case(Self::HOME) {
            Some(LocationRef::Home)
        } else if raw.eq_ignore_ascii_case(Self::ONLINE) {
            Some(LocationRef::Online)
        } else {
            None
        }
    }

    pub fn as_physical(&self) -> Option<&LocationId> {
        match self {
            LocationRef::Physical(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationRef::Physical(id) => f.write_str(id.as_str()),
            LocationRef::Home => f.write_str(Self::HOME),
            LocationRef::Online => f.write_str(Self::ONLINE),
            LocationRef::All => f.write_str(Self::ALL),
        }
    }
}

/// Error returned for an empty location reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("location reference must not be empty")]
pub struct InvalidLocationRef;

impl FromStr for LocationRef {
    type Err = InvalidLocationRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidLocationRef);
        }
        Ok(Self::virtual_tag(trimmed).unwrap_or_else(|| LocationRef::physical(trimmed)))
    }
}

impl TryFrom<String> for LocationRef {
    type Error = InvalidLocationRef;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocationRef> for String {
    fn from(value: LocationRef) -> Self {
        value.to_string()
    }
}

impl From<LocationId> for LocationRef {
    fn from(value: LocationId) -> Self {
        LocationRef::Physical(value)
    }
}

/// Raw location grant as issued by the authentication provider
///
/// Serialized as a list of references; a list containing `"all"` is the
/// wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LocationRef>", into = "Vec<LocationRef>")]
pub enum LocationGrant {
    All,
    Only(BTreeSet<LocationRef>),
}

impl LocationGrant {
    pub fn none() -> Self {
        LocationGrant::Only(BTreeSet::new())
    }

    /// Grant over physical ids
    pub fn physical<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LocationGrant::Only(ids.into_iter().map(LocationRef::physical).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, LocationGrant::All)
    }

    /// Parse a comma separated list (`"loc1,loc2"`, `"all"`); blanks are skipped
    pub fn parse_list(raw: &str) -> Self {
        raw.split(',')
            .filter_map(|part| part.parse::<LocationRef>().ok())
            .collect::<Vec<_>>()
            .into()
    }

    /// Inverse of [`LocationGrant::parse_list`]
    pub fn to_list(&self) -> String {
        Vec::<LocationRef>::from(self.clone())
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LocationGrant {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<LocationRef>> for LocationGrant {
    fn from(refs: Vec<LocationRef>) -> Self {
        if refs.contains(&LocationRef::All) {
            LocationGrant::All
        } else {
            LocationGrant::Only(refs.into_iter().collect())
        }
    }
}

impl From<LocationGrant> for Vec<LocationRef> {
    fn from(grant: LocationGrant) -> Self {
        match grant {
            LocationGrant::All => vec![LocationRef::All],
            LocationGrant::Only(refs) => refs.into_iter().collect(),
        }
    }
}

/// Physical branch entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create / update location payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpsert {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub is_active: Option<bool>,
}
