use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{require_text, viewer};
use crate::app::AppState;
use crate::database::models::{FeatureRequestPatch, FeatureStatus, NewFeatureRequest, StatusChange};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, MaybeIdentity, RequestIdentity};
use crate::types::Action;

#[derive(Debug, Deserialize)]
pub struct FeatureRequestQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFeatureRequest {
    pub title: String,
    pub description: String,
    pub is_public: Option<bool>,
    /// Identity fallback for clients that cannot set headers
    pub user_id: Option<String>,
}

/// GET /api/feature-requests - admins see everything; others their own plus
/// public requests that were not rejected
pub async fn list(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(query): Query<FeatureRequestQuery>,
) -> ApiResult<Value> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<FeatureStatus>)
        .transpose()
        .map_err(|e| ApiError::invalid_field("status", e))?;

    let feature_requests = state
        .feature_requests
        .list_feature_requests(viewer(identity.as_ref()), status)
        .await?;
    Ok(ApiResponse::success(json!({ "feature_requests": feature_requests })))
}

/// POST /api/feature-requests
///
/// ```json
/// { "title": "Dark mode", "description": "Please", "is_public": true }
/// ```
pub async fn create(
    State(state): State<AppState>,
    request_identity: RequestIdentity,
    JsonBody(input): JsonBody<CreateFeatureRequest>,
) -> ApiResult<Value> {
    let identity = request_identity
        .require(&state.resolver, input.user_id.as_deref())
        .await?;
    require_text("title", &input.title)?;
    require_text("description", &input.description)?;

    let new_request = NewFeatureRequest {
        title: input.title.trim().to_string(),
        description: input.description,
        is_public: input.is_public.unwrap_or(true),
    };
    let feature_request = state
        .feature_requests
        .create_feature_request(identity.id, new_request)
        .await?;

    tracing::info!(
        feature_request_id = %feature_request.id,
        user_id = %identity.id,
        source = ?identity.source,
        "Feature request submitted"
    );
    Ok(ApiResponse::created(json!({ "feature_request": feature_request })))
}

/// GET /api/feature-requests/:id
pub async fn show(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let feature_request = state
        .access
        .feature_request(identity.as_ref(), id, Action::Read)
        .await?;
    Ok(ApiResponse::success(json!({ "feature_request": feature_request })))
}

/// PUT /api/feature-requests/:id - owner edits content; only admins move status
pub async fn update(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<FeatureRequestPatch>,
) -> ApiResult<Value> {
    let current = state
        .access
        .feature_request(Some(&identity), id, Action::Write)
        .await?;

    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }
    if patch.status.is_some() && !identity.is_admin() {
        return Err(ApiError::forbidden("Only admins can change feature request status"));
    }
    if let Some(title) = patch.title.as_deref() {
        require_text("title", title)?;
    }
    if let Some(description) = patch.description.as_deref() {
        require_text("description", description)?;
    }

    let updated = state
        .feature_requests
        .update_feature_request(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Feature request not found"))?;

    if updated.status != current.status {
        let change = StatusChange {
            feature_request_id: id,
            old_status: current.status,
            new_status: updated.status,
            changed_by: identity.id,
        };
        let store = state.feature_requests.clone();
        tokio::spawn(async move {
            if let Err(e) = store.record_status_change(change).await {
                tracing::warn!(feature_request_id = %id, "Failed to record status history: {}", e);
            }
        });
    }

    Ok(ApiResponse::success(json!({ "feature_request": updated })))
}

/// DELETE /api/feature-requests/:id - owner or admin
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state
        .access
        .feature_request(Some(&identity), id, Action::Write)
        .await?;
    if !state.feature_requests.delete_feature_request(id).await? {
        return Err(ApiError::not_found("Feature request not found"));
    }
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
