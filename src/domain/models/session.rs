use serde::Serialize;

use super::role::{Permission, PermissionSet, Role};
use super::user::UserRecord;

/// A signed-in principal with role and grants already derived. Everything
/// downstream of authentication consumes this, never raw claims.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSession {
    pub user: UserRecord,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl ResolvedSession {
    pub fn for_user(user: UserRecord) -> Self {
        let role = user.role;
        Self {
            user,
            role,
            permissions: *role.permissions(),
        }
    }
}

/// Why a present identity failed to resolve into a session. Distinct from
/// the signed-out state, which is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    ProfileNotFound,
    AccountDeactivated,
    InvalidRole(String),
    StoreFailure,
}

impl SessionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::ProfileNotFound => {
                "No profile exists for this account; contact an administrator"
            }
            SessionError::AccountDeactivated => "This account has been deactivated",
            SessionError::InvalidRole(_) => {
                "This account's role is not recognized; contact an administrator"
            }
            SessionError::StoreFailure => "Failed to load profile; try again",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    Pending,
    Active(ResolvedSession),
    Failed(SessionError),
}

impl SessionState {
    pub fn session(&self) -> Option<&ResolvedSession> {
        match self {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session().map(|s| s.role)
    }

    /// Anything but an active session answers `false`.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.session()
            .is_some_and(|s| s.permissions.allows(permission))
    }

    pub fn is_admin(&self) -> bool {
        self.session().is_some_and(|s| s.role.is_admin())
    }

    pub fn is_super_admin(&self) -> bool {
        self.session().is_some_and(|s| s.role.is_super_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::role::Role;

    fn record(role: Role) -> UserRecord {
        UserRecord::new(
            "u1".to_string(),
            "u1@example.com".to_string(),
            "Test User".to_string(),
            role,
            "setup",
        )
    }

    #[test]
    fn active_session_carries_grants_for_its_role() {
        let state = SessionState::Active(ResolvedSession::for_user(record(Role::ManagerAdmin)));
        assert!(state.has_permission(Permission::AssignStudents));
        assert!(!state.has_permission(Permission::ArchiveTutors));
        assert!(state.is_admin());
        assert!(!state.is_super_admin());
    }

    #[test]
    fn non_active_states_grant_nothing() {
        for state in [
            SessionState::SignedOut,
            SessionState::Pending,
            SessionState::Failed(SessionError::ProfileNotFound),
        ] {
            for permission in Permission::ALL {
                assert!(!state.has_permission(permission));
            }
            assert!(!state.is_admin());
            assert!(!state.is_super_admin());
            assert_eq!(state.role(), None);
        }
    }
}
