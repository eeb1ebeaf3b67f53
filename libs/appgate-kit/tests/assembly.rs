//! End-to-end assembly: manifest in, servable axum router out.

use std::sync::Arc;

use appgate_kit::{AssemblerOptions, ModuleManifest, RouteGroup, assemble};
use axum::routing::{get, post};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn industries() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!(["saas", "fintech"]))
}

async fn calculate() -> &'static str {
    "calculated"
}

fn manifest() -> ModuleManifest {
    ModuleManifest::new()
        .register("roi", || {
            Ok(Arc::new(
                RouteGroup::builder()
                    .route(
                        Method::GET,
                        "/roi/industries",
                        "list_industries",
                        get(industries),
                    )
                    .route(Method::POST, "/roi/calculate", "calculate_roi", post(calculate))
                    .build(),
            ))
        })
        .register("broken", || anyhow::bail!("config missing"))
}

#[tokio::test]
async fn assembled_router_serves_mounted_routes() {
    let assembled = assemble(&manifest(), &AssemblerOptions::default());

    let response = assembled
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/routes/roi/industries")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed, serde_json::json!(["saas", "fintech"]));
}

#[tokio::test]
async fn unmounted_paths_return_404() {
    let assembled = assemble(&manifest(), &AssemblerOptions::default());

    let response = assembled
        .router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                // Without the route prefix.
                .uri("/roi/industries")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn broken_module_is_reported_but_others_still_serve() {
    let assembled = assemble(&manifest(), &AssemblerOptions::default());

    assert!(!assembled.report.ok);
    let broken = assembled
        .report
        .import_results
        .iter()
        .find(|r| r.module_name == "broken")
        .unwrap();
    assert_eq!(
        broken.import_error.as_ref().map(|e| e.message.as_str()),
        Some("config missing")
    );

    let response = assembled
        .router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/routes/roi/calculate")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
