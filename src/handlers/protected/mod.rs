// handlers/protected/mod.rs - /api/* handlers
//
// The identity middleware has already run for every route here. Reads that
// may be public take MaybeIdentity; writes take AuthUser. Resource-level
// decisions go through AccessService.

pub mod auth;
pub mod events;
pub mod feature_requests;
pub mod jobs;
pub mod tasks;
pub mod team_members;
pub mod votes;

use crate::auth::Identity;
use crate::database::Viewer;
use crate::error::ApiError;

pub(crate) fn viewer(identity: Option<&Identity>) -> Viewer {
    match identity {
        Some(identity) if identity.is_admin() => Viewer::Admin,
        Some(identity) => Viewer::User(identity.id),
        None => Viewer::Anonymous,
    }
}

/// Role gate for creating events, jobs and team members
pub(crate) fn require_manager(identity: &Identity) -> Result<(), ApiError> {
    if identity.role.can_manage_events() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Only event managers can perform this action"))
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::invalid_field(field, "must not be empty"))
    } else {
        Ok(())
    }
}
