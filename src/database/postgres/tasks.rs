use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{NewTask, Task, TaskPatch};
use crate::database::repository::TaskStore;
use crate::database::DatabaseError;

const TASK_COLUMNS: &str = "id, event_id, created_by, title, description, status, due_date, created_at, updated_at";

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, event_id: Uuid, created_by: Uuid, input: &NewTask) -> Result<Task, DatabaseError> {
        let sql = format!(
            "INSERT INTO tasks (event_id, created_by, title, description, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(event_id)
            .bind(created_by)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .fetch_one(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql).bind(id).fetch_optional(self.pool()).await?;
        Ok(task)
    }

    async fn list_tasks(&self, event_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE event_id = $1 ORDER BY created_at", TASK_COLUMNS);
        let tasks = sqlx::query_as::<_, Task>(&sql).bind(event_id).fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                due_date = COALESCE($5, due_date),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.due_date)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn assign_task(&self, task_id: Uuid, team_member_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO task_assignments (task_id, team_member_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(task_id)
        .bind(team_member_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn task_assignees(&self, task_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT team_member_id FROM task_assignments WHERE task_id = $1")
            .bind(task_id)
            .fetch_all(self.pool())
            .await?;
        Ok(ids)
    }
}
