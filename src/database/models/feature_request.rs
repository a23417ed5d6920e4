use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeatureRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    #[sqlx(try_from = "String")]
    pub status: FeatureStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Submitted,
    UnderReview,
    Planned,
    InProgress,
    Completed,
    Rejected,
}

text_enum!(FeatureStatus {
    Submitted => "submitted",
    UnderReview => "under_review",
    Planned => "planned",
    InProgress => "in_progress",
    Completed => "completed",
    Rejected => "rejected",
});

impl FeatureRequest {
    /// Listed to callers who are neither the owner nor an admin
    pub fn is_publicly_listed(&self) -> bool {
        self.is_public && self.status != FeatureStatus::Rejected
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeatureRequest {
    pub title: String,
    pub description: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureRequestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub status: Option<FeatureStatus>,
}

impl FeatureRequestPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_public.is_none() && self.status.is_none()
    }
}

/// Row for `feature_request_status_history`
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub feature_request_id: Uuid,
    pub old_status: FeatureStatus,
    pub new_status: FeatureStatus,
    pub changed_by: Uuid,
}
