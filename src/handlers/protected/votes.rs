use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{VoteSummary, VoteType};
use crate::middleware::{ApiResponse, ApiResult, JsonBody, MaybeIdentity, RequestIdentity};
use crate::types::Action;

#[derive(Debug, Deserialize)]
pub struct CastVote {
    pub vote_type: VoteType,
    /// Identity fallback for clients that cannot set headers
    pub user_id: Option<String>,
}

/// GET /api/feature-requests/:id/vote - counts plus the caller's own vote
pub async fn summary(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<VoteSummary> {
    state
        .access
        .feature_request(identity.as_ref(), id, Action::Read)
        .await?;

    let vote_counts = state.votes.vote_counts(id).await?;
    let user_vote = match identity {
        Some(identity) => state.votes.user_vote(id, identity.id).await?,
        None => None,
    };

    Ok(ApiResponse::success(VoteSummary {
        feature_request_id: id,
        vote_counts,
        user_vote,
    }))
}

/// POST /api/feature-requests/:id/vote - toggle the caller's vote
///
/// Casting the vote already held removes it; casting the other type flips it.
pub async fn cast(
    State(state): State<AppState>,
    request_identity: RequestIdentity,
    Path(id): Path<Uuid>,
    JsonBody(input): JsonBody<CastVote>,
) -> ApiResult<Value> {
    let identity = request_identity
        .require(&state.resolver, input.user_id.as_deref())
        .await?;
    state
        .access
        .feature_request(Some(&identity), id, Action::Read)
        .await?;

    let outcome = state.votes.apply_vote(id, identity.id, input.vote_type).await?;
    let vote_counts = state.votes.vote_counts(id).await?;

    tracing::debug!(feature_request_id = %id, user_id = %identity.id, action = ?outcome.action, "Vote applied");
    Ok(ApiResponse::success(json!({
        "action": outcome.action,
        "vote_type": outcome.vote_type,
        "vote_counts": vote_counts,
    })))
}
