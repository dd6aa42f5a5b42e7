use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Closed role catalog. Adding a role is a source change here and in the
/// permission matrix below; nothing else in the system may invent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    ManagerAdmin,
    Tutor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::ManagerAdmin, Role::Tutor];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::ManagerAdmin => "manager_admin",
            Role::Tutor => "tutor",
        }
    }

    /// Grants for this role. The matrix lives in compiled constants, never
    /// in storage or configuration.
    pub fn permissions(self) -> &'static PermissionSet {
        match self {
            Role::SuperAdmin => &PermissionSet::SUPER_ADMIN,
            Role::ManagerAdmin => &PermissionSet::MANAGER_ADMIN,
            Role::Tutor => &PermissionSet::TUTOR,
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().allows(permission)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::ManagerAdmin)
    }

    pub fn is_super_admin(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    /// Unknown values are an error, never a fallback role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "manager_admin" => Ok(Role::ManagerAdmin),
            "tutor" => Ok(Role::Tutor),
            other => Err(AppError::InvalidRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewAllStudents,
    CreateStudents,
    ArchiveStudents,
    CreateAssignments,
    ViewAssignmentLogs,
    AssignStudents,
    CreateTutors,
    ArchiveTutors,
    ViewTutorActivity,
    ImpersonateUsers,
    AccessAdminPanel,
    SendEmails,
}

impl Permission {
    pub const ALL: [Permission; 12] = [
        Permission::ViewAllStudents,
        Permission::CreateStudents,
        Permission::ArchiveStudents,
        Permission::CreateAssignments,
        Permission::ViewAssignmentLogs,
        Permission::AssignStudents,
        Permission::CreateTutors,
        Permission::ArchiveTutors,
        Permission::ViewTutorActivity,
        Permission::ImpersonateUsers,
        Permission::AccessAdminPanel,
        Permission::SendEmails,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewAllStudents => "view_all_students",
            Permission::CreateStudents => "create_students",
            Permission::ArchiveStudents => "archive_students",
            Permission::CreateAssignments => "create_assignments",
            Permission::ViewAssignmentLogs => "view_assignment_logs",
            Permission::AssignStudents => "assign_students",
            Permission::CreateTutors => "create_tutors",
            Permission::ArchiveTutors => "archive_tutors",
            Permission::ViewTutorActivity => "view_tutor_activity",
            Permission::ImpersonateUsers => "impersonate_users",
            Permission::AccessAdminPanel => "access_admin_panel",
            Permission::SendEmails => "send_emails",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-shape grant set. Every permission the product knows is a named
/// field, so a missing grant is a compile error rather than a map miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionSet {
    pub can_view_all_students: bool,
    pub can_create_students: bool,
    pub can_archive_students: bool,
    pub can_create_assignments: bool,
    pub can_view_assignment_logs: bool,
    pub can_assign_students: bool,
    pub can_create_tutors: bool,
    pub can_archive_tutors: bool,
    pub can_view_tutor_activity: bool,
    pub can_impersonate_users: bool,
    pub can_access_admin_panel: bool,
    pub can_send_emails: bool,
}

impl PermissionSet {
    pub const SUPER_ADMIN: PermissionSet = PermissionSet {
        can_view_all_students: true,
        can_create_students: true,
        can_archive_students: true,
        can_create_assignments: true,
        can_view_assignment_logs: true,
        can_assign_students: true,
        can_create_tutors: true,
        can_archive_tutors: true,
        can_view_tutor_activity: true,
        can_impersonate_users: true,
        can_access_admin_panel: true,
        can_send_emails: true,
    };

    // Managers run day-to-day operations but cannot touch account
    // provisioning, archival or impersonation.
    pub const MANAGER_ADMIN: PermissionSet = PermissionSet {
        can_view_all_students: true,
        can_create_students: true,
        can_archive_students: false,
        can_create_assignments: true,
        can_view_assignment_logs: true,
        can_assign_students: true,
        can_create_tutors: false,
        can_archive_tutors: false,
        can_view_tutor_activity: true,
        can_impersonate_users: false,
        can_access_admin_panel: true,
        can_send_emails: true,
    };

    // Tutors work their own roster only.
    pub const TUTOR: PermissionSet = PermissionSet {
        can_view_all_students: false,
        can_create_students: true,
        can_archive_students: false,
        can_create_assignments: true,
        can_view_assignment_logs: false,
        can_assign_students: false,
        can_create_tutors: false,
        can_archive_tutors: false,
        can_view_tutor_activity: false,
        can_impersonate_users: false,
        can_access_admin_panel: false,
        can_send_emails: true,
    };

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewAllStudents => self.can_view_all_students,
            Permission::CreateStudents => self.can_create_students,
            Permission::ArchiveStudents => self.can_archive_students,
            Permission::CreateAssignments => self.can_create_assignments,
            Permission::ViewAssignmentLogs => self.can_view_assignment_logs,
            Permission::AssignStudents => self.can_assign_students,
            Permission::CreateTutors => self.can_create_tutors,
            Permission::ArchiveTutors => self.can_archive_tutors,
            Permission::ViewTutorActivity => self.can_view_tutor_activity,
            Permission::ImpersonateUsers => self.can_impersonate_users,
            Permission::AccessAdminPanel => self.can_access_admin_panel,
            Permission::SendEmails => self.can_send_emails,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Full expected matrix, spelled out pair by pair so a drifted constant
    // fails loudly.
    const EXPECTED: [(Role, Permission, bool); 36] = [
        (Role::SuperAdmin, Permission::ViewAllStudents, true),
        (Role::SuperAdmin, Permission::CreateStudents, true),
        (Role::SuperAdmin, Permission::ArchiveStudents, true),
        (Role::SuperAdmin, Permission::CreateAssignments, true),
        (Role::SuperAdmin, Permission::ViewAssignmentLogs, true),
        (Role::SuperAdmin, Permission::AssignStudents, true),
        (Role::SuperAdmin, Permission::CreateTutors, true),
        (Role::SuperAdmin, Permission::ArchiveTutors, true),
        (Role::SuperAdmin, Permission::ViewTutorActivity, true),
        (Role::SuperAdmin, Permission::ImpersonateUsers, true),
        (Role::SuperAdmin, Permission::AccessAdminPanel, true),
        (Role::SuperAdmin, Permission::SendEmails, true),
        (Role::ManagerAdmin, Permission::ViewAllStudents, true),
        (Role::ManagerAdmin, Permission::CreateStudents, true),
        (Role::ManagerAdmin, Permission::ArchiveStudents, false),
        (Role::ManagerAdmin, Permission::CreateAssignments, true),
        (Role::ManagerAdmin, Permission::ViewAssignmentLogs, true),
        (Role::ManagerAdmin, Permission::AssignStudents, true),
        (Role::ManagerAdmin, Permission::CreateTutors, false),
        (Role::ManagerAdmin, Permission::ArchiveTutors, false),
        (Role::ManagerAdmin, Permission::ViewTutorActivity, true),
        (Role::ManagerAdmin, Permission::ImpersonateUsers, false),
        (Role::ManagerAdmin, Permission::AccessAdminPanel, true),
        (Role::ManagerAdmin, Permission::SendEmails, true),
        (Role::Tutor, Permission::ViewAllStudents, false),
        (Role::Tutor, Permission::CreateStudents, true),
        (Role::Tutor, Permission::ArchiveStudents, false),
        (Role::Tutor, Permission::CreateAssignments, true),
        (Role::Tutor, Permission::ViewAssignmentLogs, false),
        (Role::Tutor, Permission::AssignStudents, false),
        (Role::Tutor, Permission::CreateTutors, false),
        (Role::Tutor, Permission::ArchiveTutors, false),
        (Role::Tutor, Permission::ViewTutorActivity, false),
        (Role::Tutor, Permission::ImpersonateUsers, false),
        (Role::Tutor, Permission::AccessAdminPanel, false),
        (Role::Tutor, Permission::SendEmails, true),
    ];

    #[test]
    fn matrix_matches_expected_grants() {
        for (role, permission, expected) in EXPECTED {
            assert_eq!(
                role.allows(permission),
                expected,
                "{} / {}",
                role,
                permission
            );
        }
    }

    #[test]
    fn expected_table_covers_every_pair() {
        assert_eq!(EXPECTED.len(), Role::ALL.len() * Permission::ALL.len());
        for role in Role::ALL {
            for permission in Permission::ALL {
                assert!(
                    EXPECTED
                        .iter()
                        .any(|(r, p, _)| *r == role && *p == permission),
                    "missing pair {} / {}",
                    role,
                    permission
                );
            }
        }
    }

    #[test]
    fn admin_flags_derive_from_role() {
        assert!(Role::SuperAdmin.is_admin());
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(Role::ManagerAdmin.is_admin());
        assert!(!Role::ManagerAdmin.is_super_admin());
        assert!(!Role::Tutor.is_admin());
        assert!(!Role::Tutor.is_super_admin());
    }

    #[test]
    fn roles_round_trip_through_strings() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        let err = "administrator".parse::<Role>().unwrap_err();
        match err {
            AppError::InvalidRole(value) => assert_eq!(value, "administrator"),
            other => panic!("expected InvalidRole, got {:?}", other),
        }
    }
}
