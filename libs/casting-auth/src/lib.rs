#![warn(warnings)]

// Core modules
pub mod claims;
pub mod errors;
pub mod header;
pub mod permissions;

// Verification pipeline
pub mod config;
pub mod config_error;
pub mod key_provider;
pub mod providers;
pub mod validation;
pub mod verifier;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

// Core exports
pub use claims::ClaimPayload;
pub use errors::AuthError;
pub use header::extract_bearer_token;
pub use permissions::check_permissions;

// Pipeline exports
pub use config::{AuthConfig, JwksConfig, build_token_verifier};
pub use config_error::ConfigError;
pub use key_provider::{KeyProvider, KeyProviderError, StaticKeyProvider};
pub use providers::JwksKeyProvider;
pub use validation::ValidationConfig;
pub use verifier::TokenVerifier;
