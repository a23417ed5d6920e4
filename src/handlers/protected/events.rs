use axum::extract::{Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{require_manager, require_text};
use crate::app::AppState;
use crate::authz::DelegationRule;
use crate::database::models::{EventPatch, NewEvent};
use crate::database::EventScope;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, MaybeIdentity};
use crate::types::Action;

/// GET /api/events - events the caller owns or is delegated to (admins: all)
pub async fn list(State(state): State<AppState>, AuthUser(identity): AuthUser) -> ApiResult<Value> {
    let scope = if identity.is_admin() {
        EventScope::All
    } else {
        EventScope::Member(identity.id)
    };
    let events = state.events.list_events(scope).await?;
    Ok(ApiResponse::success(json!({ "events": events })))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(input): JsonBody<NewEvent>,
) -> ApiResult<Value> {
    require_manager(&identity)?;
    require_text("title", &input.title)?;

    let event = state.events.create_event(identity.id, input).await?;
    tracing::info!(event_id = %event.id, owner_id = %identity.id, "Event created");
    Ok(ApiResponse::created(json!({ "event": event })))
}

/// GET /api/events/:id - owner, delegates, or anyone when the event is public
pub async fn show(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let event = state
        .access
        .event(identity.as_ref(), id, Action::Read, DelegationRule::ReadOnly)
        .await?;
    Ok(ApiResponse::success(json!({ "event": event })))
}

/// PUT /api/events/:id - owner or admin
pub async fn update(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<EventPatch>,
) -> ApiResult<Value> {
    state
        .access
        .event(Some(&identity), id, Action::Write, DelegationRule::None)
        .await?;
    if let Some(title) = patch.title.as_deref() {
        require_text("title", title)?;
    }

    let event = state
        .events
        .update_event(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found"))?;
    Ok(ApiResponse::success(json!({ "event": event })))
}

/// DELETE /api/events/:id - owner or admin
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state
        .access
        .event(Some(&identity), id, Action::Write, DelegationRule::None)
        .await?;
    if !state.events.delete_event(id).await? {
        return Err(ApiError::not_found("Event not found"));
    }
    tracing::info!(event_id = %id, user_id = %identity.id, "Event deleted");
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
