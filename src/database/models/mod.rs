/// Text-backed status enums stored as snake_case strings.
///
/// Generates `as_str`, `Display`, `FromStr` and `TryFrom<String>` (the latter
/// is what `#[sqlx(try_from = "String")]` decodes through).
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub mod event;
pub mod feature_request;
pub mod job;
pub mod session;
pub mod task;
pub mod team_member;
pub mod user;
pub mod vote;

pub use event::{Event, EventPatch, NewEvent};
pub use feature_request::{FeatureRequest, FeatureRequestPatch, FeatureStatus, NewFeatureRequest, StatusChange};
pub use job::{Job, JobPatch, JobStatus, NewJob};
pub use session::{Session, SessionState};
pub use task::{NewTask, Task, TaskPatch, TaskStatus};
pub use team_member::{EventTeamMember, MemberStatus, NewTeamMember, TeamMember};
pub use user::User;
pub use vote::{VoteAction, VoteCounts, VoteError, VoteOutcome, VoteSummary, VoteType};
