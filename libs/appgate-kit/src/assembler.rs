//! Service assembly.
//!
//! Runs the full pipeline - load, policy resolution, conflict detection,
//! mounting - and returns the router together with the mounted-route
//! table and the startup report. Conflicting endpoints are still
//! described in the report but only the first registrant of a
//! method/path pair is mounted; mounting both would abort the process.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use axum::Router;
use chrono::Utc;
use http::Method;

use crate::conflicts;
use crate::loader::load_route_groups;
use crate::manifest::ModuleManifest;
use crate::policy::resolve_auth_policy;
use crate::report::StartupReport;

/// Assembly-time knobs supplied by the host application.
pub struct AssemblerOptions {
    /// Prefix prepended to every endpoint path, e.g. `/routes`.
    pub route_prefix: String,
    /// Global switch: when false no group-level policy requires auth
    /// (endpoint-level direct declarations still do).
    pub auth_enabled: bool,
    /// Per-module public override, keyed by module name. `true` forces
    /// the module's group public, `false` forces it authenticated.
    pub public_overrides: HashMap<String, bool>,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            route_prefix: "/routes".to_owned(),
            auth_enabled: true,
            public_overrides: HashMap::new(),
        }
    }
}

/// One mounted route, as seen by the serving layer.
#[derive(Debug, Clone)]
pub struct MountedRoute {
    pub method: Method,
    /// Full path including the route prefix.
    pub path: String,
    /// First module that registered the owning group.
    pub module: String,
    pub handler_name: String,
    pub requires_auth: bool,
    pub websocket: bool,
}

/// Output of [`assemble`].
pub struct AssembledService {
    pub router: Router,
    pub routes: Vec<MountedRoute>,
    pub report: StartupReport,
}

/// Assemble the manifest into a servable router.
#[must_use]
pub fn assemble(manifest: &ModuleManifest, options: &AssemblerOptions) -> AssembledService {
    let t0 = Instant::now();

    let mut outcome = load_route_groups(manifest);
    let resolved = resolve_auth_policy(
        &outcome.modules,
        &options.public_overrides,
        options.auth_enabled,
        &mut outcome.results,
    );
    conflicts::run(&mut outcome.results);

    let mut router = Router::new();
    let mut routes: Vec<MountedRoute> = Vec::new();
    let mut mounted: HashSet<(Method, String)> = HashSet::new();

    for entry in &resolved {
        let module = entry.modules[0].clone();

        for ep in entry.group.endpoints() {
            if ep.path.is_empty() {
                continue;
            }
            let full_path = format!("{}{}", options.route_prefix, ep.path);
            let collides = ep
                .methods
                .iter()
                .any(|m| mounted.contains(&(m.clone(), full_path.clone())));
            if collides {
                tracing::warn!(
                    module = %module,
                    handler = %ep.handler_name,
                    path = %full_path,
                    "skipping conflicting endpoint, an earlier module owns this route"
                );
                continue;
            }
            router = router.route(&full_path, ep.service.clone());
            for method in &ep.methods {
                mounted.insert((method.clone(), full_path.clone()));
                routes.push(MountedRoute {
                    method: method.clone(),
                    path: full_path.clone(),
                    module: module.clone(),
                    handler_name: ep.handler_name.clone(),
                    requires_auth: ep.direct_auth || entry.group_requires_auth,
                    websocket: false,
                });
            }
        }

        for ws in entry.group.ws_endpoints() {
            if ws.path.is_empty() {
                continue;
            }
            let full_path = format!("{}{}", options.route_prefix, ws.path);
            if mounted.contains(&(Method::GET, full_path.clone())) {
                tracing::warn!(
                    module = %module,
                    handler = %ws.handler_name,
                    path = %full_path,
                    "skipping conflicting endpoint, an earlier module owns this route"
                );
                continue;
            }
            router = router.route(&full_path, ws.service.clone());
            mounted.insert((Method::GET, full_path.clone()));
            routes.push(MountedRoute {
                method: Method::GET,
                path: full_path,
                module: module.clone(),
                handler_name: ws.handler_name.clone(),
                requires_auth: entry.group_requires_auth,
                websocket: true,
            });
        }
    }

    let ok = outcome.results.iter().all(|r| r.ok);
    let report = StartupReport {
        timestamp: Utc::now(),
        startup_duration_seconds: t0.elapsed().as_secs_f64(),
        ok,
        import_results: outcome.results,
    };

    AssembledService {
        router,
        routes,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::RouteGroup;
    use axum::routing::{get, post};
    use std::sync::Arc;

    async fn handler() -> &'static str {
        "ok"
    }

    #[test]
    fn routes_are_mounted_under_the_prefix() {
        let manifest = ModuleManifest::new().register("roi", || {
            Ok(Arc::new(
                RouteGroup::builder()
                    .route(Method::GET, "/roi/industries", "list_industries", get(handler))
                    .route(Method::POST, "/roi/calculate", "calculate_roi", post(handler))
                    .build(),
            ))
        });

        let assembled = assemble(&manifest, &AssemblerOptions::default());

        assert!(assembled.report.ok);
        let paths: Vec<&str> = assembled.routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/routes/roi/industries", "/routes/roi/calculate"]);
        assert!(assembled.routes.iter().all(|r| r.requires_auth));
    }

    #[test]
    fn only_the_first_registrant_of_a_conflicting_route_is_mounted() {
        let manifest = ModuleManifest::new()
            .register("a", || {
                Ok(Arc::new(
                    RouteGroup::builder()
                        .route(Method::GET, "/x", "a_get_x", get(handler))
                        .build(),
                ))
            })
            .register("b", || {
                Ok(Arc::new(
                    RouteGroup::builder()
                        .route(Method::GET, "/x", "b_get_x", get(handler))
                        .build(),
                ))
            });

        let assembled = assemble(&manifest, &AssemblerOptions::default());

        assert!(!assembled.report.ok);
        assert_eq!(assembled.routes.len(), 1);
        assert_eq!(assembled.routes[0].module, "a");
        // Both sides are still annotated in the report.
        for result in &assembled.report.import_results {
            assert_eq!(
                result.endpoints[0].errors,
                ["duplicate route: GET /x"]
            );
        }
    }

    #[test]
    fn public_group_routes_do_not_require_auth() {
        let manifest = ModuleManifest::new().register("open", || {
            Ok(Arc::new(
                RouteGroup::builder()
                    .public()
                    .route(Method::GET, "/open", "get_open", get(handler))
                    .authenticated_route(Method::GET, "/open/me", "get_me", get(handler))
                    .build(),
            ))
        });

        let assembled = assemble(&manifest, &AssemblerOptions::default());

        let by_name: HashMap<&str, bool> = assembled
            .routes
            .iter()
            .map(|r| (r.handler_name.as_str(), r.requires_auth))
            .collect();
        assert!(!by_name["get_open"]);
        // Direct declarations survive a public group.
        assert!(by_name["get_me"]);
    }

    #[test]
    fn websocket_endpoints_are_mounted_as_get() {
        let manifest = ModuleManifest::new().register("leads", || {
            Ok(Arc::new(
                RouteGroup::builder()
                    .websocket("/leads/stream", "lead_stream", get(handler))
                    .build(),
            ))
        });

        let assembled = assemble(&manifest, &AssemblerOptions::default());

        assert_eq!(assembled.routes.len(), 1);
        let route = &assembled.routes[0];
        assert!(route.websocket);
        assert_eq!(route.method, Method::GET);
        assert_eq!(route.path, "/routes/leads/stream");
        assert!(route.requires_auth);
    }

    #[test]
    fn empty_path_endpoints_are_reported_but_never_mounted() {
        let manifest = ModuleManifest::new().register("bad", || {
            Ok(Arc::new(
                RouteGroup::builder()
                    .route(Method::GET, "", "nameless", get(handler))
                    .build(),
            ))
        });

        let assembled = assemble(&manifest, &AssemblerOptions::default());

        assert!(assembled.routes.is_empty());
        assert!(!assembled.report.ok);
        assert_eq!(
            assembled.report.import_results[0].endpoints[0].errors,
            ["illegal empty path for handler nameless"]
        );
    }

    #[test]
    fn shared_public_group_is_mounted_once_and_authenticated() {
        let shared = Arc::new(
            RouteGroup::builder()
                .public()
                .route(Method::GET, "/shared", "get_shared", get(handler))
                .build(),
        );
        let a = shared.clone();
        let b = shared;
        let manifest = ModuleManifest::new()
            .register("a", move || Ok(a.clone()))
            .register("b", move || Ok(b.clone()));

        let assembled = assemble(&manifest, &AssemblerOptions::default());

        assert_eq!(assembled.routes.len(), 1);
        assert!(assembled.routes[0].requires_auth);
        assert!(!assembled.report.ok);
    }
}
