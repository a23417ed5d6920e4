use axum::extract::{Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{require_manager, require_text, viewer};
use crate::app::AppState;
use crate::authz::DelegationRule;
use crate::database::models::{JobPatch, NewJob};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, MaybeIdentity};
use crate::types::Action;

/// GET /api/jobs - public open jobs plus the caller's own and assigned jobs
pub async fn list(State(state): State<AppState>, MaybeIdentity(identity): MaybeIdentity) -> ApiResult<Value> {
    let jobs = state.jobs.list_jobs(viewer(identity.as_ref())).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// POST /api/jobs
pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(input): JsonBody<NewJob>,
) -> ApiResult<Value> {
    require_manager(&identity)?;
    require_text("title", &input.title)?;

    // A job may only be linked to an event the caller controls
    if let Some(event_id) = input.event_id {
        state
            .access
            .event(Some(&identity), event_id, Action::Write, DelegationRule::None)
            .await?;
    }

    let job = state.jobs.create_job(identity.id, input).await?;
    tracing::info!(job_id = %job.id, owner_id = %identity.id, "Job created");
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// GET /api/jobs/:id
pub async fn show(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let job = state.access.job(identity.as_ref(), id, Action::Read).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// PUT /api/jobs/:id - owner or admin
pub async fn update(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<JobPatch>,
) -> ApiResult<Value> {
    state.access.job(Some(&identity), id, Action::Write).await?;
    if let Some(title) = patch.title.as_deref() {
        require_text("title", title)?;
    }

    let job = state
        .jobs
        .update_job(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /api/jobs/:id - owner or admin
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state.access.job(Some(&identity), id, Action::Write).await?;
    if !state.jobs.delete_job(id).await? {
        return Err(ApiError::not_found("Job not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
