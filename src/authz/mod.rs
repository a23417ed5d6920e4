//! Access policy shared by every route.
//!
//! The policy is a pure function of the caller, the resource as loaded for
//! this request, and the requested action. Precedence is
//! admin > owner > delegate > public read > deny, first match wins.

use serde::Serialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::types::Action;

/// What a delegate may do on a given endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationRule {
    None,
    ReadOnly,
    ReadWrite,
}

impl DelegationRule {
    fn permits(&self, action: Action) -> bool {
        match self {
            DelegationRule::None => false,
            DelegationRule::ReadOnly => action.is_read(),
            DelegationRule::ReadWrite => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Event,
    TeamMember,
    Task,
    Job,
    FeatureRequest,
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub kind: ResourceKind,
    pub id: Uuid,
    pub owner_id: Uuid,
    pub is_public: bool,
    /// Caller is attached to the resource through a granting delegation row
    pub is_delegate: bool,
    pub delegation: DelegationRule,
}

impl Resource {
    pub fn new(kind: ResourceKind, id: Uuid, owner_id: Uuid) -> Self {
        Self {
            kind,
            id,
            owner_id,
            is_public: false,
            is_delegate: false,
            delegation: DelegationRule::None,
        }
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn delegated(mut self, is_delegate: bool, rule: DelegationRule) -> Self {
        self.is_delegate = is_delegate;
        self.delegation = rule;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Admin,
    Owner,
    Delegate,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Grant),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

pub fn authorize(identity: Option<&Identity>, resource: &Resource, action: Action) -> Decision {
    if let Some(identity) = identity {
        if identity.is_admin() {
            return Decision::Allow(Grant::Admin);
        }
        if identity.id == resource.owner_id {
            return Decision::Allow(Grant::Owner);
        }
        if resource.is_delegate && resource.delegation.permits(action) {
            return Decision::Allow(Grant::Delegate);
        }
    }

    if resource.is_public && action.is_read() {
        return Decision::Allow(Grant::Public);
    }

    // Anonymous reads of private resources look the same as any other forbidden read
    match identity {
        None if !action.is_read() => Decision::Deny(DenyReason::Unauthenticated),
        _ => Decision::Deny(DenyReason::Forbidden),
    }
}
