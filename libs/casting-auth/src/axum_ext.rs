//! Axum extractors and middleware for auth

use crate::{
    claims::ClaimPayload, errors::AuthError, permissions::check_permissions,
    verifier::TokenVerifier,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use std::sync::Arc;

/// Extractor for the verified claims - requires a guarded route
#[derive(Debug, Clone)]
pub struct AuthClaims(pub ClaimPayload);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimPayload>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AuthError::Internal(
                "ClaimPayload not found - route is not guarded".to_owned(),
            ))
    }
}

/// Wraps individual routes with "verify token, then require permission".
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<TokenVerifier>,
}

impl AuthGuard {
    #[must_use]
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Guard `route` so it only runs for tokens granting `permission`.
    ///
    /// Failures short-circuit with the error envelope before the handler runs.
    #[must_use]
    pub fn protect<S>(&self, permission: &str, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let gate = PermissionGate {
            verifier: Arc::clone(&self.verifier),
            permission: Arc::from(permission),
        };
        route.route_layer(middleware::from_fn_with_state(gate, require_permission))
    }
}

#[derive(Clone)]
struct PermissionGate {
    verifier: Arc<TokenVerifier>,
    permission: Arc<str>,
}

async fn require_permission(
    State(PermissionGate {
        verifier,
        permission,
    }): State<PermissionGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match verifier.verify_headers(request.headers()).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(
                code = err.code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Request authentication failed: {err}"
            );
            return err.into_response();
        }
    };

    if let Err(err) = check_permissions(&permission, &claims) {
        tracing::debug!(
            code = err.code(),
            subject = ?claims.subject,
            permission = %permission,
            "Request authorization failed: {err}"
        );
        return err.into_response();
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

// Middleware behaviour is covered end-to-end in tests/guard_integration.rs.
