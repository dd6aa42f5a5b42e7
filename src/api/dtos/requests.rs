use serde::Deserialize;

use crate::domain::models::role::Role;

#[derive(Deserialize)]
pub struct SetupRequest {
    /// Fall back to the token's email/name claims when absent.
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Deserialize)]
pub struct ReassignTutorRequest {
    pub tutor_uid: String,
}

#[derive(Deserialize)]
pub struct CompleteAssignmentRequest {
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct SuggestSubjectRequest {
    pub purpose: String,
    pub student_name: Option<String>,
    pub details: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}
