pub mod accounts;
pub mod assignments;
pub mod resolver;
pub mod scores;
pub mod students;

use crate::domain::models::role::Permission;
use crate::domain::models::session::ResolvedSession;
use crate::error::AppError;

/// Deny unless the acting principal's role carries the permission. Every
/// state-mutating operation calls this before touching a store.
pub(crate) fn require(acting: &ResolvedSession, permission: Permission) -> Result<(), AppError> {
    if acting.permissions.allows(permission) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(format!(
            "{} requires {}",
            acting.role, permission
        )))
    }
}

pub(crate) fn required_text(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Empty or whitespace-only input clears an optional field instead of
/// storing an empty string.
pub(crate) fn normalized(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::role::Role;
    use crate::domain::models::session::ResolvedSession;
    use crate::domain::models::user::UserRecord;

    fn session(role: Role) -> ResolvedSession {
        ResolvedSession::for_user(UserRecord::new(
            "u1".to_string(),
            "u1@example.com".to_string(),
            "Test User".to_string(),
            role,
            "setup",
        ))
    }

    #[test]
    fn require_follows_the_matrix() {
        assert!(require(&session(Role::SuperAdmin), Permission::ArchiveTutors).is_ok());
        let err = require(&session(Role::ManagerAdmin), Permission::ArchiveTutors).unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(require(&session(Role::Tutor), Permission::SendEmails).is_ok());
    }

    #[test]
    fn normalized_clears_blank_input() {
        assert_eq!(normalized("  ".to_string()), None);
        assert_eq!(normalized(String::new()), None);
        assert_eq!(normalized(" Algebra ".to_string()), Some("Algebra".to_string()));
    }
}
