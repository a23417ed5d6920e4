use axum::extract::{Path, State};
use futures::future::join_all;
use serde_json::{json, Value};
use uuid::Uuid;

use super::require_text;
use crate::app::AppState;
use crate::authz::DelegationRule;
use crate::database::models::{NewTask, TaskPatch};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, MaybeIdentity};
use crate::types::Action;

/// GET /api/events/:id/tasks
pub async fn list(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Value> {
    state
        .access
        .event(identity.as_ref(), event_id, Action::Read, DelegationRule::ReadOnly)
        .await?;
    let tasks = state.tasks.list_tasks(event_id).await?;
    Ok(ApiResponse::success(json!({ "tasks": tasks })))
}

/// POST /api/events/:id/tasks - delegates may create tasks
///
/// Assignment rows are written best-effort: the task is returned even when
/// some assignees could not be attached. Only members of the event owner's
/// team can be assigned.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(event_id): Path<Uuid>,
    JsonBody(input): JsonBody<NewTask>,
) -> ApiResult<Value> {
    let event = state
        .access
        .event(Some(&identity), event_id, Action::Write, DelegationRule::ReadWrite)
        .await?;
    require_text("title", &input.title)?;

    let task = state.tasks.create_task(event_id, identity.id, &input).await?;

    let members = join_all(input.assignee_ids.iter().map(|id| state.team.find_team_member(*id))).await;
    let mut eligible = Vec::with_capacity(input.assignee_ids.len());
    for (member_id, member) in input.assignee_ids.iter().zip(members) {
        match member {
            Ok(Some(member)) if member.manager_id == event.user_id => eligible.push(*member_id),
            Ok(_) => tracing::warn!(task_id = %task.id, team_member_id = %member_id, "Assignee is not on the event owner's team"),
            Err(e) => tracing::warn!(task_id = %task.id, team_member_id = %member_id, "Assignee lookup failed: {}", e),
        }
    }

    let results = join_all(eligible.iter().map(|member_id| state.tasks.assign_task(task.id, *member_id))).await;

    let mut assigned = Vec::new();
    for (member_id, result) in eligible.iter().zip(results) {
        match result {
            Ok(()) => assigned.push(*member_id),
            Err(e) => tracing::warn!(task_id = %task.id, team_member_id = %member_id, "Task assignment failed: {}", e),
        }
    }

    Ok(ApiResponse::created(json!({ "task": task, "assignee_ids": assigned })))
}

/// GET /api/tasks/:id
pub async fn show(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let (task, _event) = state
        .access
        .task(identity.as_ref(), id, Action::Read, DelegationRule::ReadOnly)
        .await?;
    let assignee_ids = state.tasks.task_assignees(task.id).await?;
    Ok(ApiResponse::success(json!({ "task": task, "assignee_ids": assignee_ids })))
}

/// PUT /api/tasks/:id - delegates may edit tasks
pub async fn update(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<TaskPatch>,
) -> ApiResult<Value> {
    state
        .access
        .task(Some(&identity), id, Action::Write, DelegationRule::ReadWrite)
        .await?;
    if let Some(title) = patch.title.as_deref() {
        require_text("title", title)?;
    }

    let task = state
        .tasks
        .update_task(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    let assignee_ids = state.tasks.task_assignees(task.id).await?;
    Ok(ApiResponse::success(json!({ "task": task, "assignee_ids": assignee_ids })))
}

/// DELETE /api/tasks/:id - event owner or admin
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state
        .access
        .task(Some(&identity), id, Action::Write, DelegationRule::None)
        .await?;
    if !state.tasks.delete_task(id).await? {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

/// GET /api/tasks/:id/attachments/:file_name - short-lived download link
pub async fn attachment_url(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path((id, file_name)): Path<(Uuid, String)>,
) -> ApiResult<Value> {
    if file_name.is_empty() || file_name.contains('/') || file_name == ".." || file_name == "." {
        return Err(ApiError::invalid_field("file_name", "must be a plain file name"));
    }

    let (task, _event) = state
        .access
        .task(identity.as_ref(), id, Action::Read, DelegationRule::ReadOnly)
        .await?;

    let signed = state.signer.sign(&format!("tasks/{}/{}", task.id, file_name))?;
    Ok(ApiResponse::success(json!({
        "signedUrl": signed.url,
        "expires_at": signed.expires_at,
    })))
}
