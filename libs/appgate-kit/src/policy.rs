//! Authentication policy resolution.
//!
//! Decides, per distinct route group, whether its endpoints are served
//! behind authentication. Inputs are the group's own declaration, an
//! operator-supplied per-module override map, the global auth switch and
//! the sharing structure discovered by the loader.

use std::collections::HashMap;
use std::sync::Arc;

use crate::group::RouteGroup;
use crate::report::ModuleImportResult;

/// One distinct route group with its resolved policy and the modules
/// that contributed it.
pub struct ResolvedGroup {
    pub group: Arc<RouteGroup>,
    /// Contributing module names, in discovery order. More than one entry
    /// means the group is shared.
    pub modules: Vec<String>,
    /// Resolved group-level requirement. Endpoints with a direct auth
    /// declaration require authentication regardless of this flag.
    pub group_requires_auth: bool,
}

/// Resolve the auth policy for every distinct group.
///
/// A shared group can never be public: a module could otherwise silently
/// strip authentication from routes another module believes protected.
/// When that happens the group is forced to authenticated and an error is
/// recorded on every sharing module's result.
#[must_use]
pub fn resolve_auth_policy(
    modules: &[(String, Arc<RouteGroup>)],
    public_overrides: &HashMap<String, bool>,
    auth_enabled: bool,
    results: &mut [ModuleImportResult],
) -> Vec<ResolvedGroup> {
    let mut resolved: Vec<ResolvedGroup> = Vec::new();

    for (name, group) in modules {
        if let Some(existing) = resolved
            .iter_mut()
            .find(|r| Arc::ptr_eq(&r.group, group))
        {
            existing.modules.push(name.clone());
            continue;
        }
        resolved.push(ResolvedGroup {
            group: group.clone(),
            modules: vec![name.clone()],
            group_requires_auth: false,
        });
    }

    for entry in &mut resolved {
        let declared_public = entry.group.declared_public();
        // An override keyed by any contributing module's name wins over
        // the group's own declaration.
        let effective_public = entry
            .modules
            .iter()
            .find_map(|m| public_overrides.get(m).copied())
            .unwrap_or(declared_public);

        let shared = entry.modules.len() > 1;
        if shared && effective_public {
            for module in &entry.modules {
                if let Some(result) = results.iter_mut().find(|r| r.module_name == *module) {
                    result.errors.push(
                        "cannot disable auth on a route group shared between modules".to_owned(),
                    );
                }
            }
            entry.group_requires_auth = auth_enabled;
            continue;
        }

        entry.group_requires_auth = auth_enabled && !effective_public;
    }

    resolved
}
