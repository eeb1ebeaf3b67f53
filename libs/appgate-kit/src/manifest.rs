//! Module manifest.
//!
//! Candidate modules are declared up front as an ordered list of named
//! route-group constructors. The order is the discovery order and is
//! deterministic because the caller supplies it. There is no dynamic
//! symbol resolution: a module that cannot produce its group simply
//! returns an error from its constructor and the loader isolates it.

use std::sync::Arc;

use crate::group::RouteGroup;

/// Fallible route-group constructor.
///
/// `Ok(None)` means the module loaded but exposes no route group, which
/// the loader records as a non-fatal warning.
pub type GroupConstructor =
    Box<dyn Fn() -> anyhow::Result<Option<Arc<RouteGroup>>> + Send + Sync>;

pub struct ModuleEntry {
    pub name: String,
    pub(crate) constructor: GroupConstructor,
}

impl ModuleEntry {
    pub(crate) fn construct(&self) -> anyhow::Result<Option<Arc<RouteGroup>>> {
        (self.constructor)()
    }
}

/// Ordered registry of candidate modules.
#[derive(Default)]
pub struct ModuleManifest {
    entries: Vec<ModuleEntry>,
}

impl ModuleManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module that always exposes a route group (or fails).
    #[must_use]
    pub fn register<F>(self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> anyhow::Result<Arc<RouteGroup>> + Send + Sync + 'static,
    {
        self.register_with(name, move || constructor().map(Some))
    }

    /// Register a module whose constructor may legitimately expose no
    /// route group.
    #[must_use]
    pub fn register_with<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> anyhow::Result<Option<Arc<RouteGroup>>> + Send + Sync + 'static,
    {
        self.entries.push(ModuleEntry {
            name: name.into(),
            constructor: Box::new(constructor),
        });
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
