//! Location-scoped access control for the salon platform
//!
//! Pure and synchronous. Given an authenticated [`Principal`](shared::models::Principal):
//!
//! - [`PermissionResolver`] answers which actions it may perform
//! - [`LocationGrantResolver`] reduces its location grant to active branches
//! - [`VisibilityFilter`] narrows staff, appointments, services and locations
//!
//! [`AccessGate`] bundles the three behind shared snapshots.

pub mod error;
pub mod gate;
pub mod grant;
pub mod locations;
pub mod registry;
pub mod resolver;
pub mod visibility;

pub use error::{AccessError, AccessResult, OverrideSourceError};
pub use gate::AccessGate;
pub use grant::{CanonicalGrant, GrantResolution, LocationGrantResolver};
pub use locations::LocationSnapshot;
pub use registry::{PermissionRegistry, PermissionSet, WILDCARD};
pub use resolver::{NoOverrides, PermissionResolver, RoleOverrideSource, RoleOverrides};
pub use visibility::{LocationScoped, StaffIndex, StaffLink, VisibilityFilter};
