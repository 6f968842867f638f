//! Infrastructure storage layer - database persistence.
//!
//! This module contains ALL SeaORM-specific code:
//! - `entity/` - SeaORM entity definitions (actors, movies, roles)
//! - `migrations/` - database schema migrations
//! - `*_sea_repo.rs` - repository trait implementations
//! - `db` - connection bootstrap and error conversion
//!
//! Nothing outside this module imports `sea_orm`.

pub mod actors_sea_repo;
pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod movies_sea_repo;
pub mod roles_sea_repo;

pub use actors_sea_repo::OrmActorsRepository;
pub use movies_sea_repo::OrmMoviesRepository;
pub use roles_sea_repo::OrmRolesRepository;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::service::Service;

/// Wire the ORM repositories over one connection into a [`Service`].
#[must_use]
pub fn build_service(db: &DatabaseConnection) -> Service {
    Service::new(
        Arc::new(OrmActorsRepository::new(db.clone())),
        Arc::new(OrmMoviesRepository::new(db.clone())),
        Arc::new(OrmRolesRepository::new(db.clone())),
    )
}
