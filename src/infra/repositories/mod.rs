pub mod sqlite_activity_store;
pub mod sqlite_assignment_store;
pub mod sqlite_score_store;
pub mod sqlite_student_store;
pub mod sqlite_user_store;

pub mod memory;
