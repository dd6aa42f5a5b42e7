use serde::Serialize;

use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::role::{PermissionSet, Role};
use crate::domain::models::score::{SectionRange, TestKind};
use crate::domain::models::session::SessionState;
use crate::domain::models::user::UserRecord;

/// Wire shape of the session endpoint. `status` is always present; the
/// other fields depend on it.
#[derive(Serialize)]
pub struct SessionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

impl From<SessionState> for SessionResponse {
    fn from(state: SessionState) -> Self {
        let is_admin = state.is_admin();
        let is_super_admin = state.is_super_admin();
        match state {
            SessionState::SignedOut => SessionResponse {
                status: "signed_out",
                error: None,
                user: None,
                role: None,
                permissions: None,
                is_admin,
                is_super_admin,
            },
            SessionState::Pending => SessionResponse {
                status: "pending",
                error: None,
                user: None,
                role: None,
                permissions: None,
                is_admin,
                is_super_admin,
            },
            SessionState::Active(session) => SessionResponse {
                status: "active",
                error: None,
                role: Some(session.role),
                permissions: Some(session.permissions),
                user: Some(session.user),
                is_admin,
                is_super_admin,
            },
            SessionState::Failed(error) => SessionResponse {
                status: "error",
                error: Some(error.user_message()),
                user: None,
                role: None,
                permissions: None,
                is_admin,
                is_super_admin,
            },
        }
    }
}

#[derive(Serialize)]
pub struct ScoreTableResponse {
    pub kind: &'static str,
    pub sections: &'static [SectionRange],
    pub composite_min: u16,
    pub composite_max: u16,
}

impl ScoreTableResponse {
    pub fn for_kind(kind: TestKind) -> Self {
        let (composite_min, composite_max) = kind.composite_range();
        ScoreTableResponse {
            kind: kind.as_str(),
            sections: kind.sections(),
            composite_min,
            composite_max,
        }
    }
}

#[derive(Serialize)]
pub struct OverviewResponse {
    pub active_tutors: usize,
    pub active_students: usize,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Serialize)]
pub struct SubjectSuggestionResponse {
    pub subject: String,
}
