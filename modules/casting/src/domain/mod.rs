pub mod error;
pub mod fields;
pub mod model;
pub mod repos;
pub mod service;
