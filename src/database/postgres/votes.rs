use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::vote::transition;
use crate::database::models::{VoteAction, VoteCounts, VoteError, VoteOutcome, VoteType};
use crate::database::repository::VoteStore;
use crate::database::DatabaseError;

fn decode_vote_type(raw: Option<String>) -> Result<Option<VoteType>, DatabaseError> {
    raw.map(VoteType::try_from)
        .transpose()
        .map_err(|e| DatabaseError::Sqlx(sqlx::Error::Decode(e.into())))
}

#[async_trait]
impl VoteStore for PgStore {
    async fn apply_vote(
        &self,
        feature_request_id: Uuid,
        user_id: Uuid,
        vote_type: VoteType,
    ) -> Result<VoteOutcome, VoteError> {
        let mut tx = self.pool().begin().await.map_err(DatabaseError::from)?;

        // Row lock on the request serializes concurrent votes for it
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM feature_requests WHERE id = $1 FOR UPDATE")
            .bind(feature_request_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;

        let owner = owner.ok_or(VoteError::NotFound)?;
        if owner == user_id {
            return Err(VoteError::SelfVote);
        }

        let current: Option<String> = sqlx::query_scalar(
            "SELECT vote_type FROM feature_request_votes WHERE feature_request_id = $1 AND user_id = $2",
        )
        .bind(feature_request_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        let (action, next) = transition(decode_vote_type(current)?, vote_type);

        let written = match action {
            VoteAction::Created => {
                sqlx::query(
                    "INSERT INTO feature_request_votes (feature_request_id, user_id, vote_type) VALUES ($1, $2, $3)",
                )
                .bind(feature_request_id)
                .bind(user_id)
                .bind(vote_type.as_str())
                .execute(&mut *tx)
                .await
            }
            VoteAction::Updated => {
                sqlx::query(
                    "UPDATE feature_request_votes SET vote_type = $3, updated_at = now() \
                     WHERE feature_request_id = $1 AND user_id = $2",
                )
                .bind(feature_request_id)
                .bind(user_id)
                .bind(vote_type.as_str())
                .execute(&mut *tx)
                .await
            }
            VoteAction::Removed => {
                sqlx::query("DELETE FROM feature_request_votes WHERE feature_request_id = $1 AND user_id = $2")
                    .bind(feature_request_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await
            }
        };
        written.map_err(|e| DatabaseError::from_unique(e, "vote already recorded"))?;

        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(VoteOutcome { action, vote_type: next })
    }

    async fn vote_counts(&self, feature_request_id: Uuid) -> Result<VoteCounts, DatabaseError> {
        let (upvotes, downvotes): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE vote_type = 'upvote'),
                COUNT(*) FILTER (WHERE vote_type = 'downvote')
            FROM feature_request_votes
            WHERE feature_request_id = $1
            "#,
        )
        .bind(feature_request_id)
        .fetch_one(self.pool())
        .await?;
        Ok(VoteCounts::new(upvotes, downvotes))
    }

    async fn user_vote(&self, feature_request_id: Uuid, user_id: Uuid) -> Result<Option<VoteType>, DatabaseError> {
        let raw: Option<String> = sqlx::query_scalar(
            "SELECT vote_type FROM feature_request_votes WHERE feature_request_id = $1 AND user_id = $2",
        )
        .bind(feature_request_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        decode_vote_type(raw)
    }
}
