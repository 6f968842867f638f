//! REST surface: DTOs, error mapping, handlers and guarded routes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
