use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{Job, JobPatch, JobStatus, NewJob};
use crate::database::repository::{JobStore, Viewer};
use crate::database::DatabaseError;

const JOB_COLUMNS: &str =
    "id, user_id, event_id, title, description, status, is_public, assigned_contractor_id, created_at, updated_at";

#[async_trait]
impl JobStore for PgStore {
    async fn create_job(&self, owner_id: Uuid, input: NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (user_id, event_id, title, description, is_public) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(owner_id)
            .bind(input.event_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_public)
            .fetch_one(self.pool())
            .await?;
        Ok(job)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql).bind(id).fetch_optional(self.pool()).await?;
        Ok(job)
    }

    async fn list_jobs(&self, viewer: Viewer) -> Result<Vec<Job>, DatabaseError> {
        let jobs = match viewer {
            Viewer::Admin => {
                let sql = format!("SELECT {} FROM jobs ORDER BY created_at DESC", JOB_COLUMNS);
                sqlx::query_as::<_, Job>(&sql).fetch_all(self.pool()).await?
            }
            Viewer::User(user_id) => {
                let sql = format!(
                    "SELECT {} FROM jobs \
                     WHERE user_id = $1 OR assigned_contractor_id = $1 OR (is_public AND status = $2) \
                     ORDER BY created_at DESC",
                    JOB_COLUMNS
                );
                sqlx::query_as::<_, Job>(&sql)
                    .bind(user_id)
                    .bind(JobStatus::Open.as_str())
                    .fetch_all(self.pool())
                    .await?
            }
            Viewer::Anonymous => {
                let sql = format!(
                    "SELECT {} FROM jobs WHERE is_public AND status = $1 ORDER BY created_at DESC",
                    JOB_COLUMNS
                );
                sqlx::query_as::<_, Job>(&sql)
                    .bind(JobStatus::Open.as_str())
                    .fetch_all(self.pool())
                    .await?
            }
        };
        Ok(jobs)
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE jobs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                is_public = COALESCE($5, is_public),
                assigned_contractor_id = COALESCE($6, assigned_contractor_id),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.is_public)
            .bind(patch.assigned_contractor_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(job)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1").bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }
}
