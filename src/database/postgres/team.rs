use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{EventTeamMember, MemberStatus, NewTeamMember, TeamMember};
use crate::database::repository::TeamStore;
use crate::database::DatabaseError;

const MEMBER_COLUMNS: &str = "id, manager_id, member_user_id, name, email, created_at";
const ATTACHMENT_COLUMNS: &str = "id, event_id, team_member_id, status, created_at";

#[async_trait]
impl TeamStore for PgStore {
    async fn create_team_member(&self, manager_id: Uuid, input: NewTeamMember) -> Result<TeamMember, DatabaseError> {
        let sql = format!(
            "INSERT INTO team_members (manager_id, member_user_id, name, email) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            MEMBER_COLUMNS
        );
        let member = sqlx::query_as::<_, TeamMember>(&sql)
            .bind(manager_id)
            .bind(input.member_user_id)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(self.pool())
            .await?;
        Ok(member)
    }

    async fn find_team_member(&self, id: Uuid) -> Result<Option<TeamMember>, DatabaseError> {
        let sql = format!("SELECT {} FROM team_members WHERE id = $1", MEMBER_COLUMNS);
        let member = sqlx::query_as::<_, TeamMember>(&sql).bind(id).fetch_optional(self.pool()).await?;
        Ok(member)
    }

    async fn list_team_members(&self, manager_id: Option<Uuid>) -> Result<Vec<TeamMember>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM team_members WHERE ($1::uuid IS NULL OR manager_id = $1) ORDER BY name",
            MEMBER_COLUMNS
        );
        let members = sqlx::query_as::<_, TeamMember>(&sql).bind(manager_id).fetch_all(self.pool()).await?;
        Ok(members)
    }

    async fn delete_team_member(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1").bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_to_event(
        &self,
        event_id: Uuid,
        team_member_id: Uuid,
        status: MemberStatus,
    ) -> Result<EventTeamMember, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO event_team_members (event_id, team_member_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, team_member_id) DO UPDATE SET status = EXCLUDED.status
            RETURNING {}
            "#,
            ATTACHMENT_COLUMNS
        );
        let attachment = sqlx::query_as::<_, EventTeamMember>(&sql)
            .bind(event_id)
            .bind(team_member_id)
            .bind(status.as_str())
            .fetch_one(self.pool())
            .await?;
        Ok(attachment)
    }

    async fn list_event_members(&self, event_id: Uuid) -> Result<Vec<EventTeamMember>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM event_team_members WHERE event_id = $1 ORDER BY created_at",
            ATTACHMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EventTeamMember>(&sql).bind(event_id).fetch_all(self.pool()).await?;
        Ok(rows)
    }

    async fn detach_from_event(&self, event_id: Uuid, team_member_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM event_team_members WHERE event_id = $1 AND team_member_id = $2")
            .bind(event_id)
            .bind(team_member_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
