//! Store traits consulted by the resolver, the access service and the handlers.
//!
//! Each trait is implemented by [`PgStore`](super::PgStore) for PostgreSQL and by
//! [`MemoryStore`](super::MemoryStore) for tests and local demos. Handlers only
//! ever see `Arc<dyn Trait>` through `AppState`.

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{
    Event, EventPatch, EventTeamMember, FeatureRequest, FeatureRequestPatch, FeatureStatus, Job, JobPatch,
    MemberStatus, NewEvent, NewFeatureRequest, NewJob, NewTask, NewTeamMember, Session, StatusChange, Task,
    TaskPatch, TeamMember, User, VoteCounts, VoteError, VoteOutcome, VoteType,
};
use super::DatabaseError;

/// Which rows a list query may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    All,
    /// Owned by the user or delegated to them through an active team attachment
    Member(Uuid),
}

/// Caller as seen by visibility-filtered listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Admin,
    User(Uuid),
    Anonymous,
}

#[async_trait]
pub trait HealthStore: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, DatabaseError>;
    /// Returns false when no live session matched
    async fn revoke_session(&self, token_hash: &str) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, owner_id: Uuid, input: NewEvent) -> Result<Event, DatabaseError>;
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError>;
    async fn list_events(&self, scope: EventScope) -> Result<Vec<Event>, DatabaseError>;
    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>, DatabaseError>;
    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError>;
    /// True when the user is attached to the event through a team member row with a granting status
    async fn is_event_delegate(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn create_team_member(&self, manager_id: Uuid, input: NewTeamMember) -> Result<TeamMember, DatabaseError>;
    async fn find_team_member(&self, id: Uuid) -> Result<Option<TeamMember>, DatabaseError>;
    async fn list_team_members(&self, manager_id: Option<Uuid>) -> Result<Vec<TeamMember>, DatabaseError>;
    async fn delete_team_member(&self, id: Uuid) -> Result<bool, DatabaseError>;
    /// Insert or refresh the attachment status
    async fn attach_to_event(
        &self,
        event_id: Uuid,
        team_member_id: Uuid,
        status: MemberStatus,
    ) -> Result<EventTeamMember, DatabaseError>;
    async fn list_event_members(&self, event_id: Uuid) -> Result<Vec<EventTeamMember>, DatabaseError>;
    async fn detach_from_event(&self, event_id: Uuid, team_member_id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, event_id: Uuid, created_by: Uuid, input: &NewTask) -> Result<Task, DatabaseError>;
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError>;
    async fn list_tasks(&self, event_id: Uuid) -> Result<Vec<Task>, DatabaseError>;
    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, DatabaseError>;
    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError>;
    async fn assign_task(&self, task_id: Uuid, team_member_id: Uuid) -> Result<(), DatabaseError>;
    async fn task_assignees(&self, task_id: Uuid) -> Result<Vec<Uuid>, DatabaseError>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(&self, owner_id: Uuid, input: NewJob) -> Result<Job, DatabaseError>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, DatabaseError>;
    /// Admin: all jobs. Others: public open jobs plus their own and those assigned to them.
    async fn list_jobs(&self, viewer: Viewer) -> Result<Vec<Job>, DatabaseError>;
    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, DatabaseError>;
    async fn delete_job(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait FeatureRequestStore: Send + Sync {
    async fn create_feature_request(
        &self,
        owner_id: Uuid,
        input: NewFeatureRequest,
    ) -> Result<FeatureRequest, DatabaseError>;
    async fn find_feature_request(&self, id: Uuid) -> Result<Option<FeatureRequest>, DatabaseError>;
    /// Admin: everything. Users: their own plus public non-rejected. Anonymous: public non-rejected.
    async fn list_feature_requests(
        &self,
        viewer: Viewer,
        status: Option<FeatureStatus>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError>;
    async fn update_feature_request(
        &self,
        id: Uuid,
        patch: FeatureRequestPatch,
    ) -> Result<Option<FeatureRequest>, DatabaseError>;
    async fn delete_feature_request(&self, id: Uuid) -> Result<bool, DatabaseError>;
    async fn record_status_change(&self, change: StatusChange) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Apply the toggle atomically for `(feature_request_id, user_id)`.
    /// Rejects self-votes without writing.
    async fn apply_vote(
        &self,
        feature_request_id: Uuid,
        user_id: Uuid,
        vote_type: VoteType,
    ) -> Result<VoteOutcome, VoteError>;
    async fn vote_counts(&self, feature_request_id: Uuid) -> Result<VoteCounts, DatabaseError>;
    async fn user_vote(&self, feature_request_id: Uuid, user_id: Uuid) -> Result<Option<VoteType>, DatabaseError>;
}
