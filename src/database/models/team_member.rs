use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A person on an event manager's team. `member_user_id` links the row to a
/// login identity when the member has an account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub member_user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeamMember {
    pub name: String,
    pub email: String,
    pub member_user_id: Option<Uuid>,
}

/// Attachment of a team member to an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventTeamMember {
    pub id: Uuid,
    pub event_id: Uuid,
    pub team_member_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Invited,
    Active,
    Onboarding,
    Removed,
}

text_enum!(MemberStatus {
    Invited => "invited",
    Active => "active",
    Onboarding => "onboarding",
    Removed => "removed",
});

impl MemberStatus {
    /// Statuses that grant delegated access to the event's sub-resources
    pub const GRANTING: [MemberStatus; 3] = [MemberStatus::Invited, MemberStatus::Active, MemberStatus::Onboarding];

    pub fn grants_access(&self) -> bool {
        Self::GRANTING.contains(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_members_lose_access() {
        assert!(MemberStatus::Invited.grants_access());
        assert!(MemberStatus::Active.grants_access());
        assert!(MemberStatus::Onboarding.grants_access());
        assert!(!MemberStatus::Removed.grants_access());
    }

    #[test]
    fn parses_status_text() {
        assert_eq!("onboarding".parse::<MemberStatus>().unwrap(), MemberStatus::Onboarding);
        assert!("pending".parse::<MemberStatus>().is_err());
    }
}
