#![cfg(feature = "axum-ext")]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::{get, options, post},
};
use casting_auth::{
    StaticKeyProvider, TokenVerifier, ValidationConfig,
    axum_ext::{AuthClaims, AuthGuard},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &[u8] = b"guard-test-secret";
const KID: &str = "guard-kid";
const ISSUER: &str = "https://tenant.example.com/";
const AUDIENCE: &str = "casting";

fn guard() -> AuthGuard {
    let provider = StaticKeyProvider::new().with_secret(KID, SECRET);
    let verifier = TokenVerifier::new(
        Arc::new(provider),
        ValidationConfig {
            algorithms: vec![Algorithm::HS256],
            audience: Some(AUDIENCE.to_owned()),
            issuer: Some(ISSUER.to_owned()),
            leeway_seconds: 0,
        },
    );
    AuthGuard::new(Arc::new(verifier))
}

fn app() -> Router {
    let guard = guard();
    Router::new()
        .route(
            "/actors",
            guard
                .protect("get:actors", get(|| async { "listed" }))
                .merge(guard.protect("post:actors", post(|| async { "created" }))),
        )
        .route(
            "/whoami",
            guard.protect(
                "get:actors",
                get(|AuthClaims(claims): AuthClaims| async move {
                    claims.subject.unwrap_or_default()
                }),
            ),
        )
}

fn token_with(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = kid.map(ToOwned::to_owned);
    encode(&header, claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn token(permissions: &[&str]) -> String {
    token_with(
        &json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "sub": "auth0|assistant",
            "exp": 4_102_444_800_i64,
            "permissions": permissions,
        }),
        Some(KID),
    )
}

async fn call(method: &str, uri: &str, authorization: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn assert_error(body: &Value, status: StatusCode, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], status.as_u16());
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn granted_permission_reaches_handler() {
    let (status, body) = call(
        "GET",
        "/actors",
        Some(format!("Bearer {}", token(&["get:actors"]))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "listed");
}

#[tokio::test]
async fn handler_receives_claims() {
    let (status, body) = call(
        "GET",
        "/whoami",
        Some(format!("Bearer {}", token(&["get:actors"]))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "auth0|assistant");
}

#[tokio::test]
async fn guards_are_per_method() {
    let (status, body) = call(
        "POST",
        "/actors",
        Some(format!("Bearer {}", token(&["get:actors"]))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, StatusCode::FORBIDDEN, "Permission not found.");

    let (status, _) = call(
        "POST",
        "/actors",
        Some(format!("Bearer {}", token(&["post:actors"]))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_header_is_401() {
    let (status, body) = call("GET", "/actors", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(
        &body,
        StatusCode::UNAUTHORIZED,
        "Authorization header is expected.",
    );
}

#[tokio::test]
async fn malformed_headers_are_401() {
    let cases = [
        ("Token abc", r#"Authorization header must start with "Bearer"."#),
        ("Bearer", "Token not found."),
        ("Bearer a b", "Authorization header must be bearer token."),
        ("", "Authorization header must be bearer token."),
        ("   ", "Authorization header must be bearer token."),
    ];
    for (value, message) in cases {
        let (status, body) = call("GET", "/actors", Some(value.to_owned())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{value}");
        assert_error(&body, StatusCode::UNAUTHORIZED, message);
    }
}

#[tokio::test]
async fn token_without_kid_is_malformed() {
    let no_kid = token_with(
        &json!({ "iss": ISSUER, "aud": AUDIENCE, "exp": 4_102_444_800_i64, "permissions": [] }),
        None,
    );
    let (status, body) = call("GET", "/actors", Some(format!("Bearer {no_kid}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, StatusCode::UNAUTHORIZED, "Authorization malformed.");
}

#[tokio::test]
async fn expired_token_is_401() {
    let expired = token_with(
        &json!({
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": 946_684_800_i64,
            "permissions": ["get:actors"],
        }),
        Some(KID),
    );
    let (status, body) = call("GET", "/actors", Some(format!("Bearer {expired}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, StatusCode::UNAUTHORIZED, "Token expired.");
}

#[tokio::test]
async fn foreign_audience_is_401() {
    let foreign = token_with(
        &json!({
            "iss": ISSUER,
            "aud": "another-api",
            "exp": 4_102_444_800_i64,
            "permissions": ["get:actors"],
        }),
        Some(KID),
    );
    let (status, body) = call("GET", "/actors", Some(format!("Bearer {foreign}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(
        &body,
        StatusCode::UNAUTHORIZED,
        "Incorrect claims. Please, check the audience and issuer.",
    );
}

#[tokio::test]
async fn token_without_permissions_claim_is_400() {
    let bare = token_with(
        &json!({ "iss": ISSUER, "aud": AUDIENCE, "exp": 4_102_444_800_i64 }),
        Some(KID),
    );
    let (status, body) = call("GET", "/actors", Some(format!("Bearer {bare}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(
        &body,
        StatusCode::BAD_REQUEST,
        "Permissions not included in JWT.",
    );
}

#[tokio::test]
async fn null_permissions_claim_is_400() {
    let null = token_with(
        &json!({ "iss": ISSUER, "aud": AUDIENCE, "exp": 4_102_444_800_i64, "permissions": null }),
        Some(KID),
    );
    let (status, body) = call("GET", "/actors", Some(format!("Bearer {null}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(
        &body,
        StatusCode::BAD_REQUEST,
        "Permissions not included in JWT.",
    );
}

#[tokio::test]
async fn garbage_token_is_401() {
    let (status, body) = call("GET", "/actors", Some("Bearer abc.def".to_owned())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(
        &body,
        StatusCode::UNAUTHORIZED,
        "Unable to parse authentication token.",
    );
}

fn preflight(uri: &str, authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header(header::ORIGIN, "https://frontend.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn guarded_options_route_requires_token() {
    let guard = guard();
    let app: Router = Router::new().route(
        "/actors",
        guard.protect("get:actors", options(|| async { "allowed" })),
    );

    let response = app.clone().oneshot(preflight("/actors", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let authorized = Some(format!("Bearer {}", token(&["get:actors"])));
    let response = app.oneshot(preflight("/actors", authorized)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unregistered_options_never_reaches_guard() {
    let response = app().oneshot(preflight("/actors", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
