use crate::key_provider::{KeyProvider, KeyProviderError};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// Key provider backed by the issuer's published JWKS document.
///
/// Keys live in an `ArcSwap` so lookups never take a lock. Unknown `kid`s
/// trigger a throttled on-demand refresh; a background task keeps the set
/// fresh with exponential backoff on failures.
#[must_use]
pub struct JwksKeyProvider {
    jwks_uri: String,

    keys: Arc<ArcSwap<HashMap<String, DecodingKey>>>,

    refresh_state: Arc<RwLock<RefreshState>>,

    client: reqwest::Client,

    /// Periodic refresh interval (default: 5 minutes)
    refresh_interval: Duration,

    /// Maximum backoff after consecutive failures (default: 1 hour)
    max_backoff: Duration,

    /// Minimum gap between on-demand refreshes (default: 60 seconds)
    on_demand_refresh_cooldown: Duration,
}

#[derive(Debug, Default)]
struct RefreshState {
    last_refresh: Option<Instant>,
    last_on_demand_refresh: Option<Instant>,
    consecutive_failures: u32,
    last_error: Option<String>,
    failed_kids: HashSet<String>,
}

impl JwksKeyProvider {
    /// Create a provider for `jwks_uri` with a 10 second HTTP timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails (e.g., TLS setup)
    pub fn new(jwks_uri: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_http_timeout(jwks_uri, Duration::from_secs(10))
    }

    /// # Errors
    /// Returns error if HTTP client initialization fails (e.g., TLS setup)
    pub fn with_http_timeout(
        jwks_uri: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            jwks_uri: jwks_uri.into(),
            keys: Arc::new(ArcSwap::from_pointee(HashMap::new())),
            refresh_state: Arc::new(RwLock::new(RefreshState::default())),
            client,
            refresh_interval: Duration::from_secs(300),
            max_backoff: Duration::from_secs(3600),
            on_demand_refresh_cooldown: Duration::from_secs(60),
        })
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_on_demand_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.on_demand_refresh_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    async fn fetch_jwks(&self) -> Result<HashMap<String, DecodingKey>, KeyProviderError> {
        let response = self
            .client
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|e| KeyProviderError::FetchFailed(format!("JWKS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyProviderError::FetchFailed(format!(
                "JWKS HTTP {}",
                status.as_u16()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| KeyProviderError::FetchFailed(format!("JWKS JSON parse failed: {e}")))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) else {
                continue;
            };
            if jwk.kty != "RSA" {
                continue;
            }
            let key = DecodingKey::from_rsa_components(&n, &e)
                .map_err(|e| KeyProviderError::FetchFailed(format!("Invalid RSA key: {e}")))?;
            keys.insert(kid, key);
        }

        if keys.is_empty() {
            return Err(KeyProviderError::FetchFailed(
                "No valid RSA keys found in JWKS".into(),
            ));
        }

        Ok(keys)
    }

    fn calculate_backoff(&self, failures: u32) -> Duration {
        let base = Duration::from_secs(60);
        let exponential = base * 2u32.pow(failures.min(10));
        exponential.min(self.max_backoff)
    }

    async fn should_refresh(&self) -> bool {
        let state = self.refresh_state.read().await;

        match state.last_refresh {
            None => true,
            Some(last) => {
                let elapsed = last.elapsed();
                if state.consecutive_failures == 0 {
                    elapsed >= self.refresh_interval
                } else {
                    elapsed >= self.calculate_backoff(state.consecutive_failures)
                }
            }
        }
    }

    async fn perform_refresh(&self) -> Result<(), KeyProviderError> {
        match self.fetch_jwks().await {
            Ok(new_keys) => {
                let count = new_keys.len();
                self.keys.store(Arc::new(new_keys));

                let mut state = self.refresh_state.write().await;
                state.last_refresh = Some(Instant::now());
                state.consecutive_failures = 0;
                state.last_error = None;

                tracing::debug!(keys = count, uri = %self.jwks_uri, "JWKS refreshed");
                Ok(())
            }
            Err(e) => {
                let mut state = self.refresh_state.write().await;
                state.last_refresh = Some(Instant::now());
                state.consecutive_failures += 1;
                state.last_error = Some(e.to_string());

                Err(e)
            }
        }
    }

    fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.load().get(kid).cloned()
    }

    async fn check_refresh_throttle(&self, kid: &str) -> Result<(), KeyProviderError> {
        let state = self.refresh_state.read().await;
        if let Some(last_on_demand) = state.last_on_demand_refresh {
            let elapsed = last_on_demand.elapsed();
            if elapsed < self.on_demand_refresh_cooldown {
                let remaining = self.on_demand_refresh_cooldown.saturating_sub(elapsed);
                tracing::debug!(
                    kid = kid,
                    remaining_secs = remaining.as_secs(),
                    "On-demand JWKS refresh throttled (cooldown active)"
                );

                if state.failed_kids.contains(kid) {
                    tracing::warn!(
                        kid = kid,
                        "Unknown kid repeatedly requested despite recent refresh attempts"
                    );
                }

                return Err(KeyProviderError::UnknownKeyId(kid.to_owned()));
            }
        }
        Ok(())
    }

    /// Refresh the key set because `kid` is not cached, at most once per cooldown.
    async fn on_demand_refresh(&self, kid: &str) -> Result<(), KeyProviderError> {
        if self.cached_key(kid).is_some() {
            return Ok(());
        }

        self.check_refresh_throttle(kid).await?;

        tracing::info!(kid = kid, "Performing on-demand JWKS refresh for unknown kid");

        let result = self.perform_refresh().await;

        let mut state = self.refresh_state.write().await;
        state.last_on_demand_refresh = Some(Instant::now());
        match result {
            Ok(()) if self.cached_key(kid).is_some() => {
                state.failed_kids.remove(kid);
                Ok(())
            }
            Ok(()) => {
                state.failed_kids.insert(kid.to_owned());
                tracing::warn!(kid = kid, "Kid still not found after on-demand JWKS refresh");
                Ok(())
            }
            Err(e) => {
                state.failed_kids.insert(kid.to_owned());
                Err(e)
            }
        }
    }
}

#[async_trait]
impl KeyProvider for JwksKeyProvider {
    fn name(&self) -> &'static str {
        "jwks"
    }

    async fn get_key(&self, kid: &str) -> Result<DecodingKey, KeyProviderError> {
        if let Some(key) = self.cached_key(kid) {
            return Ok(key);
        }

        self.on_demand_refresh(kid).await?;

        self.cached_key(kid)
            .ok_or_else(|| KeyProviderError::UnknownKeyId(kid.to_owned()))
    }

    async fn refresh_keys(&self) -> Result<(), KeyProviderError> {
        if self.should_refresh().await {
            self.perform_refresh().await
        } else {
            Ok(())
        }
    }
}

/// Periodically refresh the key set until `cancellation_token` fires.
pub async fn run_jwks_refresh_task(
    provider: Arc<JwksKeyProvider>,
    cancellation_token: CancellationToken,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));

    loop {
        tokio::select! {
            () = cancellation_token.cancelled() => {
                tracing::info!("JWKS refresh task shutting down");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = provider.refresh_keys().await {
                    tracing::warn!("JWKS refresh failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn provider(uri: &str) -> JwksKeyProvider {
        JwksKeyProvider::with_http_timeout(uri, Duration::from_secs(5))
            .expect("failed to create test provider")
    }

    /// RSA public key from RFC 7517, appendix A.1
    fn valid_jwks_json() -> &'static str {
        r#"{
            "keys": [{
                "kty": "RSA",
                "kid": "casting-key-1",
                "use": "sig",
                "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
                "e": "AQAB",
                "alg": "RS256"
            }, {
                "kty": "EC",
                "kid": "ec-key",
                "crv": "P-256",
                "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
                "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"
            }]
        }"#
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let provider = provider("https://tenant.example.com/.well-known/jwks.json");

        assert_eq!(provider.calculate_backoff(0), Duration::from_secs(60));
        assert_eq!(provider.calculate_backoff(1), Duration::from_secs(120));
        assert_eq!(provider.calculate_backoff(3), Duration::from_secs(480));
        assert_eq!(provider.calculate_backoff(100), provider.max_backoff);
    }

    #[tokio::test]
    async fn refresh_due_before_first_fetch() {
        let provider = provider("https://tenant.example.com/.well-known/jwks.json");
        assert!(provider.should_refresh().await);
    }

    #[tokio::test]
    async fn cached_key_served_without_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(500);
        });

        let provider = provider(&server.url("/jwks"));
        let mut keys = HashMap::new();
        keys.insert("cached".to_owned(), DecodingKey::from_secret(b"secret"));
        provider.keys.store(Arc::new(keys));

        assert!(provider.get_key("cached").await.is_ok());
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn fetch_keeps_rsa_keys_only() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body(valid_jwks_json());
        });

        let provider = provider(&server.url("/jwks"));
        provider.perform_refresh().await.unwrap();

        assert!(provider.cached_key("casting-key-1").is_some());
        assert!(provider.cached_key("ec-key").is_none());
        mock.assert();
    }

    #[tokio::test]
    async fn unknown_kid_triggers_single_fetch() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body(valid_jwks_json());
        });

        let provider = provider(&server.url("/jwks"));

        assert!(provider.get_key("casting-key-1").await.is_ok());
        assert!(provider.get_key("casting-key-1").await.is_ok());
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(404).body("Not Found");
        });

        let provider = provider(&server.url("/jwks"));
        let err = provider.perform_refresh().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("JWKS HTTP 404"), "got: {msg}");
        assert!(!msg.to_lowercase().contains("parse"), "got: {msg}");

        mock.assert();
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body("this is not valid json");
        });

        let provider = provider(&server.url("/jwks"));
        let err = provider.perform_refresh().await.unwrap_err();
        assert!(err.to_string().contains("JWKS JSON parse failed"));
    }

    #[tokio::test]
    async fn empty_key_set_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"keys": []}"#);
        });

        let provider = provider(&server.url("/jwks"));
        let err = provider.perform_refresh().await.unwrap_err();
        assert!(err.to_string().contains("No valid RSA keys"));
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_then_cooldown_throttles() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(503);
        });

        let provider = provider(&server.url("/jwks"))
            .with_on_demand_refresh_cooldown(Duration::from_secs(60));

        let first = provider.get_key("any-kid").await;
        assert!(matches!(first, Err(KeyProviderError::FetchFailed(_))));

        let second = provider.get_key("any-kid").await;
        assert!(matches!(second, Err(KeyProviderError::UnknownKeyId(_))));

        mock.assert_calls(1);

        let state = provider.refresh_state.read().await;
        assert!(state.failed_kids.contains("any-kid"));
    }

    #[tokio::test]
    async fn kid_missing_after_refresh_is_unknown() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body(valid_jwks_json());
        });

        let provider = provider(&server.url("/jwks"));

        match provider.get_key("rotated-away").await {
            Err(KeyProviderError::UnknownKeyId(kid)) => assert_eq!(kid, "rotated-away"),
            other => panic!("expected UnknownKeyId, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn refresh_failure_counts_and_success_resets() {
        let server = MockServer::start();
        let mut failing = server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(500);
        });

        let provider = provider(&server.url("/jwks"));
        _ = provider.perform_refresh().await;
        _ = provider.perform_refresh().await;
        {
            let state = provider.refresh_state.read().await;
            assert_eq!(state.consecutive_failures, 2);
            assert!(state.last_error.is_some());
        }

        failing.delete();
        server.mock(|when, then| {
            when.method(GET).path("/jwks");
            then.status(200)
                .header("content-type", "application/json")
                .body(valid_jwks_json());
        });

        provider.perform_refresh().await.unwrap();
        let state = provider.refresh_state.read().await;
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn refresh_task_stops_on_cancel() {
        let provider = Arc::new(provider("http://127.0.0.1:9/jwks"));
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_jwks_refresh_task(provider, token.clone()));

        token.cancel();
        tokio::time::timeout(Duration::from_secs(15), handle)
            .await
            .expect("refresh task did not stop")
            .unwrap();
    }
}
