pub mod ai;
pub mod email;
pub mod factory;
pub mod identity;
pub mod repositories;
