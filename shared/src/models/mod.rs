//! Data models
//!
//! Shared between salon-access, salon-server and frontend (via API).

pub mod access;
pub mod appointment;
pub mod location;
pub mod principal;
pub mod role;
pub mod service;
pub mod staff;

// Re-exports
pub use access::*;
pub use appointment::*;
pub use location::*;
pub use principal::*;
pub use role::*;
pub use service::*;
pub use staff::*;
