use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use super::{require_manager, require_text};
use crate::app::AppState;
use crate::authz::DelegationRule;
use crate::database::models::{MemberStatus, NewTeamMember};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, MaybeIdentity};
use crate::types::Action;

#[derive(Debug, Deserialize)]
pub struct TeamMemberQuery {
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AttachRequest {
    pub team_member_ids: Vec<Uuid>,
    pub status: Option<MemberStatus>,
}

/// GET /api/team-members - the caller's team; admins see all or filter by `manager_id`
pub async fn list(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<TeamMemberQuery>,
) -> ApiResult<Value> {
    let manager_id = if identity.is_admin() {
        query.manager_id
    } else {
        match query.manager_id {
            Some(other) if other != identity.id => {
                return Err(ApiError::forbidden("You can only list your own team"));
            }
            _ => Some(identity.id),
        }
    };

    let team_members = state.team.list_team_members(manager_id).await?;
    Ok(ApiResponse::success(json!({ "team_members": team_members })))
}

/// POST /api/team-members
pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(input): JsonBody<NewTeamMember>,
) -> ApiResult<Value> {
    require_manager(&identity)?;
    require_text("name", &input.name)?;
    if !input.email.contains('@') {
        return Err(ApiError::invalid_field("email", "must be an email address"));
    }

    let team_member = state.team.create_team_member(identity.id, input).await?;
    Ok(ApiResponse::created(json!({ "team_member": team_member })))
}

/// DELETE /api/team-members/:id - managing event manager or admin
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state.access.team_member(Some(&identity), id, Action::Write).await?;
    if !state.team.delete_team_member(id).await? {
        return Err(ApiError::not_found("Team member not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

/// GET /api/events/:id/team-members
pub async fn list_for_event(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Value> {
    state
        .access
        .event(identity.as_ref(), event_id, Action::Read, DelegationRule::ReadOnly)
        .await?;
    let team_members = state.team.list_event_members(event_id).await?;
    Ok(ApiResponse::success(json!({ "team_members": team_members })))
}

/// POST /api/events/:id/team-members - attach members of the owner's team
pub async fn attach(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(event_id): Path<Uuid>,
    JsonBody(input): JsonBody<AttachRequest>,
) -> ApiResult<Value> {
    let event = state
        .access
        .event(Some(&identity), event_id, Action::Write, DelegationRule::None)
        .await?;
    if input.team_member_ids.is_empty() {
        return Err(ApiError::invalid_field("team_member_ids", "must list at least one team member"));
    }

    let mut invalid = Vec::new();
    for id in &input.team_member_ids {
        let belongs = state
            .team
            .find_team_member(*id)
            .await?
            .is_some_and(|member| member.manager_id == event.user_id);
        if !belongs {
            invalid.push(id.to_string());
        }
    }
    if !invalid.is_empty() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "team_member_ids".to_string(),
            format!("not on the event owner's team: {}", invalid.join(", ")),
        );
        return Err(ApiError::validation_error("Invalid team member ids", Some(field_errors)));
    }

    let status = input.status.unwrap_or(MemberStatus::Invited);
    let mut attached = Vec::with_capacity(input.team_member_ids.len());
    for id in input.team_member_ids {
        attached.push(state.team.attach_to_event(event_id, id, status).await?);
    }

    tracing::info!(event_id = %event_id, count = attached.len(), %status, "Team members attached");
    Ok(ApiResponse::created(json!({ "team_members": attached })))
}

/// DELETE /api/events/:id/team-members/:team_member_id
pub async fn detach(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path((event_id, team_member_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    state
        .access
        .event(Some(&identity), event_id, Action::Write, DelegationRule::None)
        .await?;
    if !state.team.detach_from_event(event_id, team_member_id).await? {
        return Err(ApiError::not_found("Team member is not attached to this event"));
    }
    Ok(ApiResponse::success(json!({ "deleted": team_member_id })))
}
