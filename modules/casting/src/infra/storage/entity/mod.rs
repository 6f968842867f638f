pub mod actor;
pub mod movie;
pub mod role;
