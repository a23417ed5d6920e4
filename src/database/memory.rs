//! In-process store used by the router tests and by `eventhub-api --memory`.
//!
//! All tables live behind one `RwLock`, so every trait method is atomic with
//! respect to the others, matching the transactional guarantees of `PgStore`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::vote::transition;
use super::models::{
    Event, EventPatch, EventTeamMember, FeatureRequest, FeatureRequestPatch, FeatureStatus, Job, JobPatch,
    JobStatus, MemberStatus, NewEvent, NewFeatureRequest, NewJob, NewTask, NewTeamMember, Session, StatusChange,
    Task, TaskPatch, TaskStatus, TeamMember, User, VoteAction, VoteCounts, VoteError, VoteOutcome, VoteType,
};
use super::repository::{
    EventScope, EventStore, FeatureRequestStore, HealthStore, JobStore, SessionStore, TaskStore, TeamStore,
    UserStore, Viewer, VoteStore,
};
use super::DatabaseError;
use crate::auth::hash_session_token;
use crate::types::Role;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    events: HashMap<Uuid, Event>,
    team_members: HashMap<Uuid, TeamMember>,
    event_team_members: Vec<EventTeamMember>,
    tasks: HashMap<Uuid, Task>,
    task_assignments: Vec<(Uuid, Uuid)>,
    jobs: HashMap<Uuid, Job>,
    feature_requests: HashMap<Uuid, FeatureRequest>,
    status_history: Vec<StatusChange>,
    votes: HashMap<(Uuid, Uuid), VoteType>,
}

impl Tables {
    fn is_delegate(&self, event_id: Uuid, user_id: Uuid) -> bool {
        self.event_team_members.iter().any(|etm| {
            etm.event_id == event_id
                && etm.status.grants_access()
                && self
                    .team_members
                    .get(&etm.team_member_id)
                    .is_some_and(|tm| tm.member_user_id == Some(user_id))
        })
    }
}

fn newest_first<T>(mut rows: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user row
    pub async fn insert_user(&self, email: &str, role: Role) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.tables.write().await.users.insert(user.id, user.clone());
        user
    }

    /// Seed a session for `token`; a negative `ttl` creates an already expired one
    pub async fn insert_session(&self, user_id: Uuid, token: &str, ttl: Duration) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            expires_at: now + ttl,
            revoked_at: None,
            created_at: now,
        };
        self.tables
            .write()
            .await
            .sessions
            .insert(hash_session_token(token), session.clone());
        session
    }

    pub async fn status_history(&self, feature_request_id: Uuid) -> Vec<StatusChange> {
        self.tables
            .read()
            .await
            .status_history
            .iter()
            .filter(|change| change.feature_request_id == feature_request_id)
            .cloned()
            .collect()
    }

    pub async fn vote_rows(&self, feature_request_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .votes
            .keys()
            .filter(|(fr, _)| *fr == feature_request_id)
            .count()
    }
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, DatabaseError> {
        Ok(self.tables.read().await.sessions.get(token_hash).cloned())
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get_mut(token_hash) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, owner_id: Uuid, input: NewEvent) -> Result<Event, DatabaseError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            user_id: owner_id,
            title: input.title,
            description: input.description,
            event_date: input.event_date,
            is_public: input.is_public,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self, scope: EventScope) -> Result<Vec<Event>, DatabaseError> {
        let tables = self.tables.read().await;
        let rows: Vec<Event> = tables
            .events
            .values()
            .filter(|event| match scope {
                EventScope::All => true,
                EventScope::Member(user_id) => event.user_id == user_id || tables.is_delegate(event.id, user_id),
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |e: &Event| e.created_at))
    }

    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(event_date) = patch.event_date {
            event.event_date = Some(event_date);
        }
        if let Some(is_public) = patch.is_public {
            event.is_public = is_public;
        }
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let removed = tables.events.remove(&id).is_some();
        if removed {
            tables.event_team_members.retain(|etm| etm.event_id != id);
            let task_ids: Vec<Uuid> = tables
                .tasks
                .values()
                .filter(|task| task.event_id == id)
                .map(|task| task.id)
                .collect();
            tables.tasks.retain(|_, task| task.event_id != id);
            tables.task_assignments.retain(|(task_id, _)| !task_ids.contains(task_id));
            for job in tables.jobs.values_mut().filter(|job| job.event_id == Some(id)) {
                job.event_id = None;
            }
        }
        Ok(removed)
    }

    async fn is_event_delegate(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.tables.read().await.is_delegate(event_id, user_id))
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn create_team_member(&self, manager_id: Uuid, input: NewTeamMember) -> Result<TeamMember, DatabaseError> {
        let member = TeamMember {
            id: Uuid::new_v4(),
            manager_id,
            member_user_id: input.member_user_id,
            name: input.name,
            email: input.email,
            created_at: Utc::now(),
        };
        self.tables.write().await.team_members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn find_team_member(&self, id: Uuid) -> Result<Option<TeamMember>, DatabaseError> {
        Ok(self.tables.read().await.team_members.get(&id).cloned())
    }

    async fn list_team_members(&self, manager_id: Option<Uuid>) -> Result<Vec<TeamMember>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<TeamMember> = tables
            .team_members
            .values()
            .filter(|tm| manager_id.map_or(true, |id| tm.manager_id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn delete_team_member(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let removed = tables.team_members.remove(&id).is_some();
        if removed {
            tables.event_team_members.retain(|etm| etm.team_member_id != id);
            tables.task_assignments.retain(|(_, member_id)| *member_id != id);
        }
        Ok(removed)
    }

    async fn attach_to_event(
        &self,
        event_id: Uuid,
        team_member_id: Uuid,
        status: MemberStatus,
    ) -> Result<EventTeamMember, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .event_team_members
            .iter_mut()
            .find(|etm| etm.event_id == event_id && etm.team_member_id == team_member_id)
        {
            existing.status = status;
            return Ok(existing.clone());
        }
        let attachment = EventTeamMember {
            id: Uuid::new_v4(),
            event_id,
            team_member_id,
            status,
            created_at: Utc::now(),
        };
        tables.event_team_members.push(attachment.clone());
        Ok(attachment)
    }

    async fn list_event_members(&self, event_id: Uuid) -> Result<Vec<EventTeamMember>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .event_team_members
            .iter()
            .filter(|etm| etm.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn detach_from_event(&self, event_id: Uuid, team_member_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.event_team_members.len();
        tables
            .event_team_members
            .retain(|etm| !(etm.event_id == event_id && etm.team_member_id == team_member_id));
        Ok(tables.event_team_members.len() < before)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, event_id: Uuid, created_by: Uuid, input: &NewTask) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            event_id,
            created_by,
            title: input.title.clone(),
            description: input.description.clone(),
            status: TaskStatus::Todo,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, event_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Task> = tables.tasks.values().filter(|t| t.event_id == event_id).cloned().collect();
        rows.sort_by_key(|t| t.created_at);
        Ok(rows)
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let removed = tables.tasks.remove(&id).is_some();
        tables.task_assignments.retain(|(task_id, _)| *task_id != id);
        Ok(removed)
    }

    async fn assign_task(&self, task_id: Uuid, team_member_id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.team_members.contains_key(&team_member_id) {
            return Err(DatabaseError::NotFound(format!("team member {}", team_member_id)));
        }
        if !tables.task_assignments.contains(&(task_id, team_member_id)) {
            tables.task_assignments.push((task_id, team_member_id));
        }
        Ok(())
    }

    async fn task_assignees(&self, task_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .task_assignments
            .iter()
            .filter(|(id, _)| *id == task_id)
            .map(|(_, member_id)| *member_id)
            .collect())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, owner_id: Uuid, input: NewJob) -> Result<Job, DatabaseError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            user_id: owner_id,
            event_id: input.event_id,
            title: input.title,
            description: input.description,
            status: JobStatus::Open,
            is_public: input.is_public,
            assigned_contractor_id: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, DatabaseError> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self, viewer: Viewer) -> Result<Vec<Job>, DatabaseError> {
        let tables = self.tables.read().await;
        let open_public = |job: &Job| job.is_public && job.status == JobStatus::Open;
        let rows: Vec<Job> = tables
            .jobs
            .values()
            .filter(|job| match viewer {
                Viewer::Admin => true,
                Viewer::User(id) => job.user_id == id || job.assigned_contractor_id == Some(id) || open_public(job),
                Viewer::Anonymous => open_public(job),
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |j: &Job| j.created_at))
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(job) = tables.jobs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(description) = patch.description {
            job.description = Some(description);
        }
        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(is_public) = patch.is_public {
            job.is_public = is_public;
        }
        if let Some(contractor) = patch.assigned_contractor_id {
            job.assigned_contractor_id = Some(contractor);
        }
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.jobs.remove(&id).is_some())
    }
}

#[async_trait]
impl FeatureRequestStore for MemoryStore {
    async fn create_feature_request(
        &self,
        owner_id: Uuid,
        input: NewFeatureRequest,
    ) -> Result<FeatureRequest, DatabaseError> {
        let now = Utc::now();
        let request = FeatureRequest {
            id: Uuid::new_v4(),
            user_id: owner_id,
            title: input.title,
            description: input.description,
            is_public: input.is_public,
            status: FeatureStatus::Submitted,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.feature_requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_feature_request(&self, id: Uuid) -> Result<Option<FeatureRequest>, DatabaseError> {
        Ok(self.tables.read().await.feature_requests.get(&id).cloned())
    }

    async fn list_feature_requests(
        &self,
        viewer: Viewer,
        status: Option<FeatureStatus>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError> {
        let tables = self.tables.read().await;
        let rows: Vec<FeatureRequest> = tables
            .feature_requests
            .values()
            .filter(|fr| match viewer {
                Viewer::Admin => true,
                Viewer::User(id) => fr.user_id == id || fr.is_publicly_listed(),
                Viewer::Anonymous => fr.is_publicly_listed(),
            })
            .filter(|fr| status.map_or(true, |s| fr.status == s))
            .cloned()
            .collect();
        Ok(newest_first(rows, |fr: &FeatureRequest| fr.created_at))
    }

    async fn update_feature_request(
        &self,
        id: Uuid,
        patch: FeatureRequestPatch,
    ) -> Result<Option<FeatureRequest>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(request) = tables.feature_requests.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            request.title = title;
        }
        if let Some(description) = patch.description {
            request.description = description;
        }
        if let Some(is_public) = patch.is_public {
            request.is_public = is_public;
        }
        if let Some(status) = patch.status {
            request.status = status;
        }
        request.updated_at = Utc::now();
        Ok(Some(request.clone()))
    }

    async fn delete_feature_request(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let removed = tables.feature_requests.remove(&id).is_some();
        tables.votes.retain(|(fr, _), _| *fr != id);
        tables.status_history.retain(|change| change.feature_request_id != id);
        Ok(removed)
    }

    async fn record_status_change(&self, change: StatusChange) -> Result<(), DatabaseError> {
        self.tables.write().await.status_history.push(change);
        Ok(())
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn apply_vote(
        &self,
        feature_request_id: Uuid,
        user_id: Uuid,
        vote_type: VoteType,
    ) -> Result<VoteOutcome, VoteError> {
        let mut tables = self.tables.write().await;
        let owner = tables
            .feature_requests
            .get(&feature_request_id)
            .map(|fr| fr.user_id)
            .ok_or(VoteError::NotFound)?;
        if owner == user_id {
            return Err(VoteError::SelfVote);
        }

        let key = (feature_request_id, user_id);
        let (action, next) = transition(tables.votes.get(&key).copied(), vote_type);
        match (action, next) {
            (VoteAction::Removed, _) | (_, None) => {
                tables.votes.remove(&key);
            }
            (_, Some(stored)) => {
                tables.votes.insert(key, stored);
            }
        }
        Ok(VoteOutcome { action, vote_type: next })
    }

    async fn vote_counts(&self, feature_request_id: Uuid) -> Result<VoteCounts, DatabaseError> {
        let tables = self.tables.read().await;
        let (mut up, mut down) = (0, 0);
        for ((fr, _), vote) in tables.votes.iter() {
            if *fr != feature_request_id {
                continue;
            }
            match vote {
                VoteType::Upvote => up += 1,
                VoteType::Downvote => down += 1,
            }
        }
        Ok(VoteCounts::new(up, down))
    }

    async fn user_vote(&self, feature_request_id: Uuid, user_id: Uuid) -> Result<Option<VoteType>, DatabaseError> {
        Ok(self.tables.read().await.votes.get(&(feature_request_id, user_id)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn request_owned_by(store: &MemoryStore, owner: Uuid) -> FeatureRequest {
        store
            .create_feature_request(
                owner,
                NewFeatureRequest {
                    title: "Add dark mode".to_string(),
                    description: "Night-friendly dashboard".to_string(),
                    is_public: true,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn toggle_never_duplicates_rows() {
        let store = MemoryStore::new();
        let owner = store.insert_user("owner@example.com", Role::EventManager).await;
        let voter = store.insert_user("voter@example.com", Role::Contractor).await;
        let fr = request_owned_by(&store, owner.id).await;

        let first = store.apply_vote(fr.id, voter.id, VoteType::Upvote).await.unwrap();
        let flipped = store.apply_vote(fr.id, voter.id, VoteType::Downvote).await.unwrap();
        assert_eq!(first.action, VoteAction::Created);
        assert_eq!(flipped.action, VoteAction::Updated);
        assert_eq!(store.vote_rows(fr.id).await, 1);
        assert_eq!(store.vote_counts(fr.id).await.unwrap(), VoteCounts::new(0, 1));
    }

    #[tokio::test]
    async fn self_vote_writes_nothing() {
        let store = MemoryStore::new();
        let owner = store.insert_user("owner@example.com", Role::EventManager).await;
        let fr = request_owned_by(&store, owner.id).await;

        let result = store.apply_vote(fr.id, owner.id, VoteType::Upvote).await;
        assert!(matches!(result, Err(VoteError::SelfVote)));
        assert_eq!(store.vote_rows(fr.id).await, 0);
    }

    #[tokio::test]
    async fn concurrent_votes_from_one_user_serialize() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let owner = store.insert_user("owner@example.com", Role::EventManager).await;
        let voter = store.insert_user("voter@example.com", Role::Contractor).await;
        let (fr_id, voter_id) = (request_owned_by(&store, owner.id).await.id, voter.id);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.apply_vote(fr_id, voter_id, VoteType::Upvote).await })
            })
            .collect();
        let mut actions = Vec::new();
        for handle in handles {
            actions.push(handle.await.unwrap().unwrap().action);
        }
        actions.sort_by_key(|a| *a as u8);
        assert_eq!(actions, vec![VoteAction::Created, VoteAction::Removed]);
        assert_eq!(store.vote_rows(fr_id).await, 0);
    }

    #[tokio::test]
    async fn delegation_requires_granting_status() {
        let store = MemoryStore::new();
        let manager = store.insert_user("manager@example.com", Role::EventManager).await;
        let helper = store.insert_user("helper@example.com", Role::Contractor).await;
        let event = store
            .create_event(
                manager.id,
                NewEvent {
                    title: "Gala".to_string(),
                    description: None,
                    event_date: None,
                    is_public: false,
                },
            )
            .await
            .unwrap();
        let member = store
            .create_team_member(
                manager.id,
                NewTeamMember {
                    name: "Helper".to_string(),
                    email: "helper@example.com".to_string(),
                    member_user_id: Some(helper.id),
                },
            )
            .await
            .unwrap();

        store.attach_to_event(event.id, member.id, MemberStatus::Removed).await.unwrap();
        assert!(!store.is_event_delegate(event.id, helper.id).await.unwrap());

        store.attach_to_event(event.id, member.id, MemberStatus::Onboarding).await.unwrap();
        assert!(store.is_event_delegate(event.id, helper.id).await.unwrap());
        assert_eq!(store.list_events(EventScope::Member(helper.id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_event_unlinks_its_jobs() {
        let store = MemoryStore::new();
        let owner = store.insert_user("owner@example.com", Role::EventManager).await;
        let event = store
            .create_event(
                owner.id,
                NewEvent {
                    title: "Launch".to_string(),
                    description: None,
                    event_date: None,
                    is_public: false,
                },
            )
            .await
            .unwrap();
        let job = store
            .create_job(
                owner.id,
                NewJob {
                    title: "Sound tech".to_string(),
                    description: None,
                    event_id: Some(event.id),
                    is_public: true,
                },
            )
            .await
            .unwrap();

        assert!(store.delete_event(event.id).await.unwrap());
        let job = store.find_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.event_id, None);
    }

    #[tokio::test]
    async fn deleting_a_request_drops_its_history() {
        let store = MemoryStore::new();
        let owner = store.insert_user("owner@example.com", Role::EventManager).await;
        let admin = store.insert_user("admin@example.com", Role::Admin).await;
        let fr = request_owned_by(&store, owner.id).await;
        store
            .record_status_change(StatusChange {
                feature_request_id: fr.id,
                old_status: FeatureStatus::Submitted,
                new_status: FeatureStatus::Planned,
                changed_by: admin.id,
            })
            .await
            .unwrap();
        assert_eq!(store.status_history(fr.id).await.len(), 1);

        assert!(store.delete_feature_request(fr.id).await.unwrap());
        assert!(store.status_history(fr.id).await.is_empty());
    }
}
