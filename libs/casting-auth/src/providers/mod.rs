pub mod jwks;

pub use jwks::{JwksKeyProvider, run_jwks_refresh_task};
