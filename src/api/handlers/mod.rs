pub mod accounts;
pub mod activity;
pub mod admin;
pub mod assignments;
pub mod communication;
pub mod health;
pub mod scores;
pub mod session;
pub mod setup;
pub mod students;
