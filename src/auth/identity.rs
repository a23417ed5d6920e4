use serde::Serialize;
use uuid::Uuid;

use crate::database::models::User;
use crate::types::Role;

/// How the caller's identity was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    Session,
    Bearer,
    /// Client-supplied user id (header or body field) verified against `users`
    Header,
}

/// Authenticated caller, re-derived on every request
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub source: IdentitySource,
}

impl Identity {
    pub fn from_user(user: User, source: IdentitySource) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            source,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_header_resolved(&self) -> bool {
        self.source == IdentitySource::Header
    }
}

/// Outcome of identity resolution for one request
#[derive(Debug, Clone)]
pub enum Resolution {
    Authenticated(Identity),
    Anonymous,
    /// A session cookie was presented but is expired, revoked or unknown, and
    /// no other method resolved a user
    SessionExpired,
}

impl Resolution {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Resolution::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}
