//! Serve the API: database, verifier, router, layers, graceful shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderName, Method, header};
use casting_auth::axum_ext::AuthGuard;
use casting_auth::providers::run_jwks_refresh_task;
use casting_auth::build_token_verifier;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ServerConfig};
use crate::signals::wait_for_shutdown;

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];
const CORS_HEADERS: [HeaderName; 2] = [header::AUTHORIZATION, header::CONTENT_TYPE];

/// Wrap the API router with CORS and request tracing.
pub fn build_app(router: Router, server: &ServerConfig) -> Router {
    let router = if server.cors_allow_any_origin {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(CORS_METHODS)
                .allow_headers(CORS_HEADERS),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Run until Ctrl+C/SIGTERM.
///
/// # Errors
/// Returns an error if startup fails (database, auth config, bind) or the
/// server stops abnormally.
pub async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;
    let addr = config.server.socket_addr()?;

    let db = casting::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let service = Arc::new(casting::build_service(&db));

    let (verifier, key_provider) = build_token_verifier(&config.auth)?;
    let guard = AuthGuard::new(Arc::new(verifier));

    let cancel = CancellationToken::new();
    let refresh = tokio::spawn(run_jwks_refresh_task(key_provider, cancel.child_token()));

    let app = build_app(casting::router(service, &guard), &config.server);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Casting Agency API listening");

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            tracing::error!(error = %e, "Signal handling failed, shutting down");
        }
        shutdown.cancel();
    });

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(cancel.clone().cancelled_owned())
        .await;

    cancel.cancel();
    if let Err(e) = refresh.await {
        tracing::warn!(error = %e, "JWKS refresh task ended abnormally");
    }
    if let Err(e) = db.close().await {
        tracing::warn!(error = %e, "Failed to close database pool");
    }

    served.context("server error")?;
    tracing::info!("Casting Agency API stopped");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use casting_auth::{StaticKeyProvider, TokenVerifier, ValidationConfig};
    use tower::ServiceExt;

    async fn app(server: &ServerConfig) -> Router {
        let db = casting::connect(&casting::DatabaseConfig::in_memory())
            .await
            .unwrap();
        let verifier = TokenVerifier::new(
            Arc::new(StaticKeyProvider::new()),
            ValidationConfig::default(),
        );
        let guard = AuthGuard::new(Arc::new(verifier));
        build_app(
            casting::router(Arc::new(casting::build_service(&db)), &guard),
            server,
        )
    }

    fn preflight() -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/actors")
            .header(header::ORIGIN, "https://casting.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn preflight_is_answered_without_token() {
        let response = app(&ServerConfig::default())
            .await
            .oneshot(preflight())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        assert!(methods.contains("PATCH"));
    }

    #[tokio::test]
    async fn cors_can_be_disabled() {
        let server = ServerConfig {
            cors_allow_any_origin: false,
            ..ServerConfig::default()
        };
        let response = app(&server).await.oneshot(preflight()).await.unwrap();
        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn greeting_through_layers() {
        let response = app(&ServerConfig::default())
            .await
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
