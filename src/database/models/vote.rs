use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Upvote,
    Downvote,
}

text_enum!(VoteType {
    Upvote => "upvote",
    Downvote => "downvote",
});

/// What a cast vote did to the stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Created,
    Removed,
    Updated,
}

/// Toggle transition for one (feature request, user) pair.
///
/// States are `None`, `Some(Upvote)`, `Some(Downvote)`. Casting the held type
/// clears it; casting the other type replaces it.
pub fn transition(current: Option<VoteType>, cast: VoteType) -> (VoteAction, Option<VoteType>) {
    match current {
        None => (VoteAction::Created, Some(cast)),
        Some(held) if held == cast => (VoteAction::Removed, None),
        Some(_) => (VoteAction::Updated, Some(cast)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub action: VoteAction,
    pub vote_type: Option<VoteType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub upvotes: i64,
    pub downvotes: i64,
    pub total: i64,
}

impl VoteCounts {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self {
            upvotes,
            downvotes,
            total: upvotes + downvotes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteSummary {
    pub feature_request_id: Uuid,
    pub vote_counts: VoteCounts,
    pub user_vote: Option<VoteType>,
}

#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("cannot vote on own feature request")]
    SelfVote,
    #[error("feature request not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DatabaseError),
}
