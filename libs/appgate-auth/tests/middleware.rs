//! Middleware behavior over a real axum router.

use std::sync::Arc;

use appgate_auth::{
    AuthSettings, AuthState, AuthorizedUser, RoutePolicy, TokenAuthenticator, auth_middleware,
};
use axum::routing::{get, post};
use axum::{Router, middleware};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn open_handler() -> &'static str {
    "open"
}

async fn submit_handler(AuthorizedUser(identity): AuthorizedUser) -> String {
    identity.subject
}

fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD
        .encode(serde_json::to_vec(&serde_json::json!({"alg": "ES256"})).unwrap());
    let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{claims}.bm9zaWc")
}

fn future_exp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
        + 3600
}

fn test_router() -> Router {
    let settings: AuthSettings = serde_json::from_value(serde_json::json!({
        "issuers": [{
            "name": "main",
            "issuer": "https://issuer.example.com",
            "audience": "https://api.example.com",
            "jwks_url": "https://issuer.example.com/jwks.json",
        }],
        "internal": { "token": "internal-secret" },
        "insecure_bypass_enabled": true,
        "environment": "development",
        "variant": "workspace",
    }))
    .unwrap();

    let policy = RoutePolicy::builder()
        .route(Method::GET, "/routes/open", false)
        .unwrap()
        .route(Method::POST, "/routes/leads/submit", true)
        .unwrap()
        .route(Method::GET, "/routes/leads/stream", true)
        .unwrap()
        .build();

    let state = AuthState {
        authenticator: Arc::new(TokenAuthenticator::new(&settings)),
        policy: Arc::new(policy),
    };

    Router::new()
        .route("/routes/open", get(open_handler))
        .route("/routes/leads/submit", post(submit_handler))
        .route("/routes/leads/stream", get(open_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn valid_token() -> String {
    unsigned_token(&serde_json::json!({
        "iss": "https://issuer.example.com",
        "sub": "user-1",
        "aud": "https://api.example.com",
        "exp": future_exp(),
    }))
}

#[tokio::test]
async fn public_route_serves_without_credentials() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/routes/open")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/routes/leads/submit")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_token_reaches_the_extractor() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/routes/leads/submit?disable-verify")
                .header(header::AUTHORIZATION, format!("Bearer {}", valid_token()))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"user-1");
}

#[tokio::test]
async fn websocket_subprotocol_token_authenticates_the_upgrade_request() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/routes/leads/stream?disable-verify")
                .header(header::UPGRADE, "websocket")
                .header(
                    header::SEC_WEBSOCKET_PROTOCOL,
                    format!("Authorization.Bearer.{}", valid_token()),
                )
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn subprotocol_token_is_not_accepted_on_a_plain_request() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/routes/leads/submit?disable-verify")
                .header(
                    header::SEC_WEBSOCKET_PROTOCOL,
                    format!("Authorization.Bearer.{}", valid_token()),
                )
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authorization_header_is_not_accepted_on_an_upgrade_request() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/routes/leads/stream?disable-verify")
                .header(header::UPGRADE, "websocket")
                .header(header::AUTHORIZATION, format!("Bearer {}", valid_token()))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn websocket_upgrade_without_token_is_rejected_before_upgrade() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/routes/leads/stream")
                .header(header::UPGRADE, "websocket")
                .header(header::SEC_WEBSOCKET_PROTOCOL, "graphql-ws")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn internal_secret_authenticates_with_reported_client_id() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/routes/leads/submit")
                .header(header::AUTHORIZATION, "Bearer internal-secret")
                .header("x-internal-client-id", "scheduler")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"internal");
}

#[tokio::test]
async fn cors_preflight_passes_through() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/routes/leads/submit")
                .header(header::ORIGIN, "https://app.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // Never a 401; the router decides what OPTIONS means.
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_passes_through_to_404() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/routes/unknown")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
