mod actors_repo;
mod movies_repo;
mod roles_repo;

pub use actors_repo::ActorsRepository;
pub use movies_repo::MoviesRepository;
pub use roles_repo::RolesRepository;
