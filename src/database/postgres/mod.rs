mod events;
mod feature_requests;
mod jobs;
mod tasks;
mod team;
mod votes;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::models::{MemberStatus, Session, User};
use super::repository::{HealthStore, SessionStore, UserStore};
use super::DatabaseError;

/// PostgreSQL-backed implementation of every store trait.
///
/// The pool is connected with the service credential, so access decisions are
/// always made by the `authz` policy rather than by row-level policies.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Status values that grant delegated access, bound as a `text[]`
fn granting_statuses() -> Vec<&'static str> {
    MemberStatus::GRANTING.iter().map(|s| s.as_str()).collect()
}

#[async_trait]
impl HealthStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, role, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, DatabaseError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, expires_at, revoked_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = now() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
