//! Global conflict detection.
//!
//! Runs after every module has been loaded. Two passes over the same
//! data: the first collects the duplicate key sets, the second annotates
//! every endpoint that participates in a conflict. Annotating every
//! participant (not just the later ones) keeps the report independent of
//! discovery order.

use std::collections::HashSet;

use crate::report::ModuleImportResult;

/// Annotate duplicate routes, duplicate handler names and empty paths
/// across all module results, then finalize each result's `ok` flag.
pub fn run(results: &mut [ModuleImportResult]) {
    annotate_conflicts(results);
    finalize_ok(results);
}

/// Two-pass duplicate detection over every described endpoint.
pub fn annotate_conflicts(results: &mut [ModuleImportResult]) {
    let mut seen_routes: HashSet<(String, String)> = HashSet::new();
    let mut dup_routes: HashSet<(String, String)> = HashSet::new();
    let mut seen_handlers: HashSet<String> = HashSet::new();
    let mut dup_handlers: HashSet<String> = HashSet::new();

    // Pass 1: collect keys that occur more than once. Endpoints with an
    // empty path are excluded from the route key set; they get their own
    // annotation instead of a meaningless "duplicate route:  " entry.
    for result in results.iter() {
        for ep in &result.endpoints {
            if !ep.path.is_empty() {
                let key = (ep.http_method.clone(), ep.path.clone());
                if !seen_routes.insert(key.clone()) {
                    dup_routes.insert(key);
                }
            }
            if !seen_handlers.insert(ep.handler_name.clone()) {
                dup_handlers.insert(ep.handler_name.clone());
            }
        }
        // WebSocket endpoints share the path namespace with HTTP GET but
        // have their own handler namespace (clients address them by URL,
        // not by generated method name).
        for ws in &result.web_socket_endpoints {
            if !ws.path.is_empty() {
                let key = ("GET".to_owned(), ws.path.clone());
                if !seen_routes.insert(key.clone()) {
                    dup_routes.insert(key);
                }
            }
        }
    }

    // Pass 2: annotate every participant.
    for result in results.iter_mut() {
        for ep in &mut result.endpoints {
            if ep.path.is_empty() {
                ep.errors
                    .push(format!("illegal empty path for handler {}", ep.handler_name));
            } else if dup_routes.contains(&(ep.http_method.clone(), ep.path.clone())) {
                ep.errors
                    .push(format!("duplicate route: {} {}", ep.http_method, ep.path));
            }
            if dup_handlers.contains(&ep.handler_name) {
                ep.errors
                    .push(format!("duplicate handler name: {}", ep.handler_name));
            }
        }
        for ws in &mut result.web_socket_endpoints {
            if ws.path.is_empty() {
                ws.errors
                    .push(format!("illegal empty path for handler {}", ws.handler_name));
            } else if dup_routes.contains(&("GET".to_owned(), ws.path.clone())) {
                ws.errors
                    .push(format!("duplicate route: GET {}", ws.path));
            }
        }
    }
}

/// A module is ok iff it constructed, produced no module-level errors and
/// none of its endpoints carry annotations.
pub fn finalize_ok(results: &mut [ModuleImportResult]) {
    for result in results.iter_mut() {
        result.ok = result.import_error.is_none()
            && result.errors.is_empty()
            && result.endpoints.iter().all(|ep| ep.errors.is_empty())
            && result
                .web_socket_endpoints
                .iter()
                .all(|ws| ws.errors.is_empty());
    }
}
