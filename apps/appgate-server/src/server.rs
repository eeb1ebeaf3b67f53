//! Application wiring: manifest, assembly, auth policy and health.

use std::sync::Arc;

use anyhow::Context as _;
use appgate_auth::{AuthState, RoutePolicy, TokenAuthenticator, auth_middleware};
use appgate_kit::{
    AssembledService, AssemblerOptions, ModuleManifest, MountedRoute, ReadySignal, StartupReport,
    assemble,
};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router, middleware};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// All modules this host serves, in discovery order.
pub fn build_manifest() -> ModuleManifest {
    ModuleManifest::new()
        .register("roi", roi::route_group)
        .register("leads", leads::route_group)
}

pub struct App {
    pub router: Router,
    pub routes: Vec<MountedRoute>,
    pub report: StartupReport,
    pub ready: ReadySignal,
}

pub fn build_app(config: &AppConfig) -> anyhow::Result<App> {
    let manifest = build_manifest();
    let options = AssemblerOptions {
        route_prefix: config.server.route_prefix.clone(),
        auth_enabled: config.auth.enabled,
        public_overrides: config.modules.public_overrides.clone(),
    };
    let assembled: AssembledService = assemble(&manifest, &options);

    let mut policy = RoutePolicy::builder();
    for route in &assembled.routes {
        policy = policy
            .route(route.method.clone(), &route.path, route.requires_auth)
            .context("building route auth policy")?;
    }

    let state = AuthState {
        authenticator: Arc::new(TokenAuthenticator::new(&config.auth)),
        policy: Arc::new(policy.build()),
    };

    let ready = ReadySignal::new();
    let router = assembled
        .router
        .layer(middleware::from_fn_with_state(state, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .route("/_healthz", get(healthz).with_state(ready.clone()));

    Ok(App {
        router,
        routes: assembled.routes,
        report: assembled.report,
        ready,
    })
}

async fn healthz(
    State(ready): State<ReadySignal>,
) -> (http::StatusCode, Json<serde_json::Value>) {
    let is_ready = ready.is_ready();
    let status = if is_ready {
        http::StatusCode::OK
    } else {
        http::StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if is_ready { "ok" } else { "starting" },
            "ready": is_ready,
        })),
    )
}
