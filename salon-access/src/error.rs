//! Access errors
//!
//! Almost every condition in this crate resolves to an empty or `false`
//! result. The override source failing is the exception: resolution cannot
//! proceed and the caller must deny.

use shared::AppError;
use shared::models::Role;
use thiserror::Error;

/// Failure reported by a [`RoleOverrideSource`](crate::RoleOverrideSource)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct OverrideSourceError {
    pub message: String,
}

impl OverrideSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    /// Custom-role lookup failed; callers fail closed
    #[error("role override source failed for role '{role}': {source}")]
    OverrideSource {
        role: Role,
        #[source]
        source: OverrideSourceError,
    },

    #[error("permission denied: {action}")]
    PermissionDenied { action: String },
}

pub type AccessResult<T> = Result<T, AccessError>;

/// Override failures become 503, denials 403
impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::OverrideSource { role, source } => AppError::permission_source_unavailable(format!(
                "Permission source unavailable for role {}",
                role
            ))
            .with_detail("reason", source.message),
            AccessError::PermissionDenied { action } => {
                AppError::forbidden(format!("Permission denied: {}", action)).with_detail("required_permission", action)
            }
        }
    }
}
