use thiserror::Error;

/// Errors that can occur while building the token verifier from configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("auth.domain is required unless both auth.jwks_uri and auth.issuer are set")]
    MissingDomain,

    #[error("unsupported signing algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("at least one signing algorithm must be configured")]
    NoAlgorithms,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
