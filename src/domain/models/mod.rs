pub mod activity;
pub mod assignment;
pub mod role;
pub mod score;
pub mod session;
pub mod student;
pub mod user;
