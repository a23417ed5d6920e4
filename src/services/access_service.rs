use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Identity;
use crate::authz::{authorize, Decision, DelegationRule, DenyReason, Grant, Resource, ResourceKind};
use crate::database::models::{Event, FeatureRequest, Job, Task, TeamMember};
use crate::database::{EventStore, FeatureRequestStore, JobStore, TaskStore, TeamStore};
use crate::error::ApiError;
use crate::types::Action;

/// Loads a resource, works out the caller's relationship to it and applies
/// the access policy. Missing resources are 404 before any policy check.
pub struct AccessService {
    events: Arc<dyn EventStore>,
    team: Arc<dyn TeamStore>,
    tasks: Arc<dyn TaskStore>,
    jobs: Arc<dyn JobStore>,
    feature_requests: Arc<dyn FeatureRequestStore>,
    conceal_forbidden: bool,
}

impl AccessService {
    pub fn new(
        events: Arc<dyn EventStore>,
        team: Arc<dyn TeamStore>,
        tasks: Arc<dyn TaskStore>,
        jobs: Arc<dyn JobStore>,
        feature_requests: Arc<dyn FeatureRequestStore>,
        conceal_forbidden: bool,
    ) -> Self {
        Self {
            events,
            team,
            tasks,
            jobs,
            feature_requests,
            conceal_forbidden,
        }
    }

    /// Apply the policy and translate a denial into an API error
    pub fn enforce(&self, identity: Option<&Identity>, resource: &Resource, action: Action) -> Result<Grant, ApiError> {
        match authorize(identity, resource, action) {
            Decision::Allow(grant) => Ok(grant),
            Decision::Deny(reason) => {
                tracing::warn!(
                    kind = ?resource.kind,
                    resource_id = %resource.id,
                    user_id = ?identity.map(|i| i.id),
                    ?action,
                    ?reason,
                    "Access denied"
                );
                Err(self.denial(reason, resource.kind, action))
            }
        }
    }

    fn denial(&self, reason: DenyReason, kind: ResourceKind, action: Action) -> ApiError {
        match reason {
            DenyReason::Unauthenticated => ApiError::unauthorized("Authentication required"),
            DenyReason::Forbidden if self.conceal_forbidden && action.is_read() => not_found(kind),
            DenyReason::Forbidden => ApiError::forbidden("You do not have access to this resource"),
        }
    }

    pub async fn event(
        &self,
        identity: Option<&Identity>,
        event_id: Uuid,
        action: Action,
        rule: DelegationRule,
    ) -> Result<Event, ApiError> {
        let event = self
            .events
            .find_event(event_id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::Event))?;

        let is_delegate = match identity {
            Some(caller) if needs_delegation_check(caller, event.user_id, rule) => {
                self.events.is_event_delegate(event.id, caller.id).await?
            }
            _ => false,
        };

        let resource = Resource::new(ResourceKind::Event, event.id, event.user_id)
            .public(event.is_public)
            .delegated(is_delegate, rule);
        self.enforce(identity, &resource, action)?;
        Ok(event)
    }

    /// Tasks inherit access from their event
    pub async fn task(
        &self,
        identity: Option<&Identity>,
        task_id: Uuid,
        action: Action,
        rule: DelegationRule,
    ) -> Result<(Task, Event), ApiError> {
        let task = self
            .tasks
            .find_task(task_id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::Task))?;
        let event = self.event(identity, task.event_id, action, rule).await?;
        Ok((task, event))
    }

    /// The assigned contractor is a read-only delegate of the job
    pub async fn job(&self, identity: Option<&Identity>, job_id: Uuid, action: Action) -> Result<Job, ApiError> {
        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::Job))?;

        let is_delegate = matches!((identity, job.assigned_contractor_id), (Some(caller), Some(assignee)) if caller.id == assignee);
        let resource = Resource::new(ResourceKind::Job, job.id, job.user_id)
            .public(job.is_public)
            .delegated(is_delegate, DelegationRule::ReadOnly);
        self.enforce(identity, &resource, action)?;
        Ok(job)
    }

    pub async fn feature_request(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        action: Action,
    ) -> Result<FeatureRequest, ApiError> {
        let request = self
            .feature_requests
            .find_feature_request(id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::FeatureRequest))?;

        let resource =
            Resource::new(ResourceKind::FeatureRequest, request.id, request.user_id).public(request.is_publicly_listed());
        self.enforce(identity, &resource, action)?;
        Ok(request)
    }

    pub async fn team_member(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        action: Action,
    ) -> Result<TeamMember, ApiError> {
        let member = self
            .team
            .find_team_member(id)
            .await?
            .ok_or_else(|| not_found(ResourceKind::TeamMember))?;

        let resource = Resource::new(ResourceKind::TeamMember, member.id, member.manager_id);
        self.enforce(identity, &resource, action)?;
        Ok(member)
    }
}

fn needs_delegation_check(caller: &Identity, owner_id: Uuid, rule: DelegationRule) -> bool {
    rule != DelegationRule::None && !caller.is_admin() && caller.id != owner_id
}

fn not_found(kind: ResourceKind) -> ApiError {
    let label = match kind {
        ResourceKind::Event => "Event",
        ResourceKind::TeamMember => "Team member",
        ResourceKind::Task => "Task",
        ResourceKind::Job => "Job",
        ResourceKind::FeatureRequest => "Feature request",
    };
    ApiError::not_found(format!("{} not found", label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::IdentitySource;
    use crate::database::models::{MemberStatus, NewEvent, NewTeamMember};
    use crate::database::MemoryStore;
    use crate::types::Role;

    fn service(store: &Arc<MemoryStore>, conceal_forbidden: bool) -> AccessService {
        AccessService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            conceal_forbidden,
        )
    }

    async fn identity(store: &MemoryStore, email: &str, role: Role) -> Identity {
        let user = store.insert_user(email, role).await;
        Identity::from_user(user, IdentitySource::Session)
    }

    fn new_event(is_public: bool) -> NewEvent {
        NewEvent {
            title: "Launch party".into(),
            description: None,
            event_date: None,
            is_public,
        }
    }

    #[tokio::test]
    async fn missing_event_is_not_found_before_policy() {
        let store = Arc::new(MemoryStore::new());
        let err = service(&store, false)
            .event(None, Uuid::new_v4(), Action::Read, DelegationRule::ReadOnly)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn delegate_reads_but_cannot_write_read_only_endpoint() {
        let store = Arc::new(MemoryStore::new());
        let owner = identity(&store, "owner@example.com", Role::EventManager).await;
        let contractor = identity(&store, "crew@example.com", Role::Contractor).await;
        let event = store.create_event(owner.id, new_event(false)).await.unwrap();
        let member = store
            .create_team_member(
                owner.id,
                NewTeamMember {
                    name: "Crew".into(),
                    email: "crew@example.com".into(),
                    member_user_id: Some(contractor.id),
                },
            )
            .await
            .unwrap();
        store.attach_to_event(event.id, member.id, MemberStatus::Active).await.unwrap();

        let access = service(&store, false);
        assert!(access
            .event(Some(&contractor), event.id, Action::Read, DelegationRule::ReadOnly)
            .await
            .is_ok());
        let err = access
            .event(Some(&contractor), event.id, Action::Write, DelegationRule::None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn conceal_forbidden_turns_read_denial_into_404() {
        let store = Arc::new(MemoryStore::new());
        let owner = identity(&store, "owner@example.com", Role::EventManager).await;
        let stranger = identity(&store, "stranger@example.com", Role::EventManager).await;
        let event = store.create_event(owner.id, new_event(false)).await.unwrap();

        let err = service(&store, true)
            .event(Some(&stranger), event.id, Action::Read, DelegationRule::ReadOnly)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = service(&store, true)
            .event(Some(&stranger), event.id, Action::Write, DelegationRule::None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn anonymous_reads_public_event_only() {
        let store = Arc::new(MemoryStore::new());
        let owner = identity(&store, "owner@example.com", Role::EventManager).await;
        let public = store.create_event(owner.id, new_event(true)).await.unwrap();
        let private = store.create_event(owner.id, new_event(false)).await.unwrap();

        let access = service(&store, false);
        assert!(access.event(None, public.id, Action::Read, DelegationRule::ReadOnly).await.is_ok());
        let err = access
            .event(None, private.id, Action::Read, DelegationRule::ReadOnly)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = access
            .event(None, public.id, Action::Write, DelegationRule::None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
