use crate::{
    config_error::ConfigError, providers::JwksKeyProvider, validation::ValidationConfig,
    verifier::TokenVerifier,
};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Token verification settings (`auth` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `tenant.eu.auth0.com`
    #[serde(default)]
    pub domain: String,

    /// Expected `aud` claim (audience not checked when unset)
    #[serde(default)]
    pub audience: Option<String>,

    /// Accepted signing algorithms
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,

    /// Expected `iss`; defaults to `https://{domain}/`
    #[serde(default)]
    pub issuer: Option<String>,

    /// Key set location; defaults to `https://{domain}/.well-known/jwks.json`
    #[serde(default)]
    pub jwks_uri: Option<String>,

    /// Leeway in seconds for time-based validations (exp, nbf)
    #[serde(default)]
    pub leeway_seconds: u64,

    #[serde(default)]
    pub jwks: JwksConfig,
}

fn default_algorithms() -> Vec<String> {
    vec!["RS256".to_owned()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            audience: None,
            algorithms: default_algorithms(),
            issuer: None,
            jwks_uri: None,
            leeway_seconds: 0,
            jwks: JwksConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Issuer every token must carry.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingDomain`] if neither `issuer` nor `domain` is set.
    pub fn resolved_issuer(&self) -> Result<String, ConfigError> {
        match (&self.issuer, self.domain.trim()) {
            (Some(iss), _) => Ok(iss.clone()),
            (None, "") => Err(ConfigError::MissingDomain),
            (None, domain) => Ok(format!("https://{domain}/")),
        }
    }

    /// # Errors
    /// Returns [`ConfigError::MissingDomain`] if neither `jwks_uri` nor `domain` is set.
    pub fn resolved_jwks_uri(&self) -> Result<String, ConfigError> {
        match (&self.jwks_uri, self.domain.trim()) {
            (Some(uri), _) => Ok(uri.clone()),
            (None, "") => Err(ConfigError::MissingDomain),
            (None, domain) => Ok(format!("https://{domain}/.well-known/jwks.json")),
        }
    }

    /// # Errors
    /// Returns [`ConfigError`] for unknown algorithm names or a missing domain.
    pub fn validation_config(&self) -> Result<ValidationConfig, ConfigError> {
        if self.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }

        let algorithms = self
            .algorithms
            .iter()
            .map(|name| {
                Algorithm::from_str(name).map_err(|_| ConfigError::InvalidAlgorithm(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidationConfig {
            algorithms,
            audience: self.audience.clone(),
            issuer: Some(self.resolved_issuer()?),
            leeway_seconds: self.leeway_seconds,
        })
    }

    /// Validate the configuration for consistency
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation_config()?;
        self.resolved_jwks_uri()?;
        Ok(())
    }
}

/// JWKS fetching and caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksConfig {
    /// HTTP timeout for key set fetches (default: 10 seconds)
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Refresh interval in seconds (default: 300 = 5 minutes)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Maximum backoff in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,

    /// Minimum gap between refreshes triggered by unknown `kid`s (default: 60)
    #[serde(default = "default_on_demand_cooldown")]
    pub on_demand_refresh_cooldown_secs: u64,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_max_backoff() -> u64 {
    3600
}

fn default_on_demand_cooldown() -> u64 {
    60
}

impl Default for JwksConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            max_backoff_secs: default_max_backoff(),
            on_demand_refresh_cooldown_secs: default_on_demand_cooldown(),
        }
    }
}

/// Build the JWKS-backed verifier from configuration.
///
/// The provider is returned separately so the caller can drive its background
/// refresh task.
///
/// # Errors
/// Returns [`ConfigError`] if the configuration is inconsistent or the HTTP
/// client cannot be created.
pub fn build_token_verifier(
    config: &AuthConfig,
) -> Result<(TokenVerifier, Arc<JwksKeyProvider>), ConfigError> {
    let validation = config.validation_config()?;
    let jwks_uri = config.resolved_jwks_uri()?;

    let provider = JwksKeyProvider::with_http_timeout(
        &jwks_uri,
        Duration::from_secs(config.jwks.http_timeout_secs),
    )?
    .with_refresh_interval(Duration::from_secs(config.jwks.refresh_interval_secs))
    .with_max_backoff(Duration::from_secs(config.jwks.max_backoff_secs))
    .with_on_demand_refresh_cooldown(Duration::from_secs(
        config.jwks.on_demand_refresh_cooldown_secs,
    ));
    let provider = Arc::new(provider);

    tracing::info!(
        jwks_uri = %jwks_uri,
        issuer = ?validation.issuer,
        audience = ?validation.audience,
        "Token verifier initialized"
    );

    let verifier = TokenVerifier::new(provider.clone(), validation);
    Ok((verifier, provider))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn auth0() -> AuthConfig {
        AuthConfig {
            domain: "tenant.eu.auth0.com".to_owned(),
            audience: Some("casting".to_owned()),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.algorithms, vec!["RS256".to_owned()]);
        assert_eq!(config.leeway_seconds, 0);
        assert_eq!(config.jwks.refresh_interval_secs, 300);
        assert_eq!(config.jwks.on_demand_refresh_cooldown_secs, 60);
    }

    #[test]
    fn derives_issuer_and_jwks_uri_from_domain() {
        let config = auth0();
        assert_eq!(
            config.resolved_issuer().unwrap(),
            "https://tenant.eu.auth0.com/"
        );
        assert_eq!(
            config.resolved_jwks_uri().unwrap(),
            "https://tenant.eu.auth0.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn explicit_values_win_over_domain() {
        let config = AuthConfig {
            issuer: Some("https://issuer.internal/".to_owned()),
            jwks_uri: Some("http://127.0.0.1:8080/keys".to_owned()),
            ..auth0()
        };
        assert_eq!(config.resolved_issuer().unwrap(), "https://issuer.internal/");
        assert_eq!(
            config.resolved_jwks_uri().unwrap(),
            "http://127.0.0.1:8080/keys"
        );
    }

    #[test]
    fn missing_domain_is_rejected() {
        let err = AuthConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingDomain));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let config = AuthConfig {
            algorithms: vec!["RS256".to_owned(), "ROT13".to_owned()],
            ..auth0()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAlgorithm(ref a) if a == "ROT13"));

        let config = AuthConfig {
            algorithms: vec![],
            ..auth0()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoAlgorithms)));
    }

    #[test]
    fn validation_config_carries_claim_rules() {
        let validation = auth0().validation_config().unwrap();
        assert_eq!(validation.algorithms, vec![Algorithm::RS256]);
        assert_eq!(validation.audience.as_deref(), Some("casting"));
        assert_eq!(
            validation.issuer.as_deref(),
            Some("https://tenant.eu.auth0.com/")
        );
    }

    #[test]
    fn deserializes_partial_section() {
        let json = r#"{"domain":"tenant.eu.auth0.com","jwks":{"refresh_interval_secs":60}}"#;
        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.jwks.refresh_interval_secs, 60);
        assert_eq!(config.jwks.http_timeout_secs, 10);
        assert_eq!(config.algorithms, vec!["RS256".to_owned()]);
    }

    #[tokio::test]
    async fn builds_verifier() {
        let (_verifier, provider) = build_token_verifier(&auth0()).unwrap();
        assert_eq!(
            provider.jwks_uri(),
            "https://tenant.eu.auth0.com/.well-known/jwks.json"
        );
    }
}
