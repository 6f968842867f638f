//! Casting Agency module
//!
//! Actors, movies and the roles linking them: domain rules, `SeaORM` storage
//! and the guarded REST surface.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod domain;
pub mod infra;

pub use api::rest::routes::{Permissions, router};
pub use domain::error::DomainError;
pub use domain::service::Service;
pub use infra::storage::build_service;
pub use infra::storage::db::{DatabaseConfig, connect, migrate};
