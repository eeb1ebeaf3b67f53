//! Route group loader.
//!
//! Constructs every module's route group in manifest order. A failing
//! constructor never aborts loading: the error is recorded on that
//! module's [`ModuleImportResult`] and the next module is tried.

use std::sync::Arc;
use std::time::Instant;

use crate::group::RouteGroup;
use crate::manifest::ModuleManifest;
use crate::report::{
    EndpointDescriptor, ImportErrorModel, ModuleImportResult, WsEndpointDescriptor,
};

/// Outcome of loading the whole manifest.
pub struct LoadOutcome {
    /// Registered groups in discovery order. A shared group appears once
    /// per module name that contributed it.
    pub modules: Vec<(String, Arc<RouteGroup>)>,
    /// One result per manifest entry, in manifest order. `ok` flags are
    /// not yet finalized; run conflict detection next.
    pub results: Vec<ModuleImportResult>,
}

/// Load every module in the manifest, isolating failures per module.
#[must_use]
pub fn load_route_groups(manifest: &ModuleManifest) -> LoadOutcome {
    let mut modules: Vec<(String, Arc<RouteGroup>)> = Vec::new();
    let mut results: Vec<ModuleImportResult> = Vec::new();

    for entry in manifest.entries() {
        let mut result = ModuleImportResult::started(&entry.name);

        let t0 = Instant::now();
        let constructed = entry.construct();
        result.import_duration_seconds = t0.elapsed().as_secs_f64();

        let group = match constructed {
            Ok(Some(group)) => group,
            Ok(None) => {
                result
                    .errors
                    .push(format!("warning: no route group exposed by module {}", entry.name));
                results.push(result);
                continue;
            }
            Err(err) => {
                tracing::warn!(module = %entry.name, error = %err, "route group construction failed");
                result.import_error = Some(ImportErrorModel::from_error(&err));
                results.push(result);
                continue;
            }
        };

        // A group handed out under two module names makes ownership
        // ambiguous. Record it, but still register so the policy resolver
        // can apply the shared-group safety rule.
        let already_registered = modules.iter().any(|(_, g)| Arc::ptr_eq(g, &group));
        if already_registered {
            result.errors.push(format!(
                "in {}: sharing a route group between modules is not allowed",
                entry.name
            ));
        }

        // Describe endpoints only on first registration so a shared
        // group's endpoints are not double-counted as duplicates.
        if !already_registered {
            describe_endpoints(&group, &mut result);
        }

        modules.push((entry.name.clone(), group));
        results.push(result);
    }

    LoadOutcome { modules, results }
}

fn describe_endpoints(group: &RouteGroup, result: &mut ModuleImportResult) {
    for ep in group.endpoints() {
        let mut errors = Vec::new();
        let method = if ep.methods.len() == 1 {
            ep.methods[0].to_string()
        } else {
            let joined = ep
                .methods
                .iter()
                .map(http::Method::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!(
                "only one HTTP method supported per endpoint handler, got {joined}"
            ));
            joined
        };
        result.endpoints.push(EndpointDescriptor {
            http_method: method,
            path: ep.path.clone(),
            handler_name: ep.handler_name.clone(),
            errors,
        });
    }
    for ws in group.ws_endpoints() {
        result.web_socket_endpoints.push(WsEndpointDescriptor {
            path: ws.path.clone(),
            handler_name: ws.handler_name.clone(),
            errors: Vec::new(),
        });
    }
}
