use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{FeatureRequest, FeatureRequestPatch, FeatureStatus, NewFeatureRequest, StatusChange};
use crate::database::repository::{FeatureRequestStore, Viewer};
use crate::database::DatabaseError;

const FR_COLUMNS: &str = "id, user_id, title, description, is_public, status, created_at, updated_at";

#[async_trait]
impl FeatureRequestStore for PgStore {
    async fn create_feature_request(
        &self,
        owner_id: Uuid,
        input: NewFeatureRequest,
    ) -> Result<FeatureRequest, DatabaseError> {
        let sql = format!(
            "INSERT INTO feature_requests (user_id, title, description, is_public, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            FR_COLUMNS
        );
        let request = sqlx::query_as::<_, FeatureRequest>(&sql)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_public)
            .bind(FeatureStatus::Submitted.as_str())
            .fetch_one(self.pool())
            .await?;
        Ok(request)
    }

    async fn find_feature_request(&self, id: Uuid) -> Result<Option<FeatureRequest>, DatabaseError> {
        let sql = format!("SELECT {} FROM feature_requests WHERE id = $1", FR_COLUMNS);
        let request = sqlx::query_as::<_, FeatureRequest>(&sql).bind(id).fetch_optional(self.pool()).await?;
        Ok(request)
    }

    async fn list_feature_requests(
        &self,
        viewer: Viewer,
        status: Option<FeatureStatus>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError> {
        // $1 = viewer id (NULL for anonymous), $2 = admin flag, $3 = optional status filter
        let sql = format!(
            r#"
            SELECT {} FROM feature_requests
            WHERE ($2 OR user_id = $1 OR (is_public AND status <> 'rejected'))
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
            FR_COLUMNS
        );
        let (viewer_id, is_admin) = match viewer {
            Viewer::Admin => (None, true),
            Viewer::User(id) => (Some(id), false),
            Viewer::Anonymous => (None, false),
        };
        let requests = sqlx::query_as::<_, FeatureRequest>(&sql)
            .bind(viewer_id)
            .bind(is_admin)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(self.pool())
            .await?;
        Ok(requests)
    }

    async fn update_feature_request(
        &self,
        id: Uuid,
        patch: FeatureRequestPatch,
    ) -> Result<Option<FeatureRequest>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE feature_requests SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_public = COALESCE($4, is_public),
                status = COALESCE($5, status),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            FR_COLUMNS
        );
        let request = sqlx::query_as::<_, FeatureRequest>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.is_public)
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_optional(self.pool())
            .await?;
        Ok(request)
    }

    async fn delete_feature_request(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM feature_requests WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_status_change(&self, change: StatusChange) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO feature_request_status_history (feature_request_id, old_status, new_status, changed_by)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(change.feature_request_id)
        .bind(change.old_status.as_str())
        .bind(change.new_status.as_str())
        .bind(change.changed_by)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
