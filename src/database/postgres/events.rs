use async_trait::async_trait;
use uuid::Uuid;

use super::{granting_statuses, PgStore};
use crate::database::models::{Event, EventPatch, NewEvent};
use crate::database::repository::{EventScope, EventStore};
use crate::database::DatabaseError;

const EVENT_COLUMNS: &str = "id, user_id, title, description, event_date, is_public, created_at, updated_at";

#[async_trait]
impl EventStore for PgStore {
    async fn create_event(&self, owner_id: Uuid, input: NewEvent) -> Result<Event, DatabaseError> {
        let sql = format!(
            "INSERT INTO events (user_id, title, description, event_date, is_public) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(input.is_public)
            .fetch_one(self.pool())
            .await?;
        Ok(event)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let event = sqlx::query_as::<_, Event>(&sql).bind(id).fetch_optional(self.pool()).await?;
        Ok(event)
    }

    async fn list_events(&self, scope: EventScope) -> Result<Vec<Event>, DatabaseError> {
        let events = match scope {
            EventScope::All => {
                let sql = format!("SELECT {} FROM events ORDER BY created_at DESC", EVENT_COLUMNS);
                sqlx::query_as::<_, Event>(&sql).fetch_all(self.pool()).await?
            }
            EventScope::Member(user_id) => {
                let sql = format!(
                    r#"
                    SELECT {} FROM events e
                    WHERE e.user_id = $1
                       OR EXISTS (
                            SELECT 1
                            FROM event_team_members etm
                            JOIN team_members tm ON tm.id = etm.team_member_id
                            WHERE etm.event_id = e.id
                              AND tm.member_user_id = $1
                              AND etm.status = ANY($2)
                       )
                    ORDER BY e.created_at DESC
                    "#,
                    EVENT_COLUMNS
                );
                sqlx::query_as::<_, Event>(&sql)
                    .bind(user_id)
                    .bind(granting_statuses())
                    .fetch_all(self.pool())
                    .await?
            }
        };
        Ok(events)
    }

    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                is_public = COALESCE($5, is_public),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.event_date)
            .bind(patch.is_public)
            .fetch_optional(self.pool())
            .await?;
        Ok(event)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1").bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_event_delegate(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM event_team_members etm
                JOIN team_members tm ON tm.id = etm.team_member_id
                WHERE etm.event_id = $1
                  AND tm.member_user_id = $2
                  AND etm.status = ANY($3)
            )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(granting_statuses())
        .fetch_one(self.pool())
        .await?;
        Ok(exists)
    }
}
