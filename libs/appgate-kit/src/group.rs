//! Route group model.
//!
//! A [`RouteGroup`] is an opaque bundle of HTTP and WebSocket endpoint
//! definitions contributed by exactly one module under normal use. Groups
//! are built once at load time via [`RouteGroupBuilder`] and never mutated
//! afterwards; ownership identity is the `Arc` handle the loader stores,
//! so a group registered under two module names is detected by pointer
//! equality, not by value comparison.

use axum::routing::MethodRouter;
use http::Method;

/// One HTTP endpoint contributed by a route group.
pub struct EndpointDef {
    /// Declared HTTP methods. More than one entry is a load-time error,
    /// recorded during the module scan; the endpoint stays mounted.
    pub methods: Vec<Method>,
    /// Path relative to the group, starting with `/`. An empty path is
    /// illegal and annotated during conflict detection.
    pub path: String,
    /// Handler function name. Must be globally unique because generated
    /// client code uses it as a method name.
    pub handler_name: String,
    /// Endpoint declares a direct authentication requirement, independent
    /// of the group-level policy.
    pub direct_auth: bool,
    /// The axum service handling this endpoint.
    pub service: MethodRouter,
}

/// One WebSocket endpoint contributed by a route group.
pub struct WsEndpointDef {
    pub path: String,
    pub handler_name: String,
    /// GET service performing the upgrade.
    pub service: MethodRouter,
}

/// An immutable bundle of endpoints plus the group's declared auth
/// preference.
pub struct RouteGroup {
    declared_public: bool,
    endpoints: Vec<EndpointDef>,
    ws_endpoints: Vec<WsEndpointDef>,
}

impl RouteGroup {
    #[must_use]
    pub fn builder() -> RouteGroupBuilder {
        RouteGroupBuilder::new()
    }

    /// Whether the group declared itself public (no auth by default).
    #[must_use]
    pub fn declared_public(&self) -> bool {
        self.declared_public
    }

    #[must_use]
    pub fn endpoints(&self) -> &[EndpointDef] {
        &self.endpoints
    }

    #[must_use]
    pub fn ws_endpoints(&self) -> &[WsEndpointDef] {
        &self.ws_endpoints
    }
}

/// Builder for [`RouteGroup`].
pub struct RouteGroupBuilder {
    declared_public: bool,
    endpoints: Vec<EndpointDef>,
    ws_endpoints: Vec<WsEndpointDef>,
}

impl RouteGroupBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            declared_public: false,
            endpoints: Vec::new(),
            ws_endpoints: Vec::new(),
        }
    }

    /// Declare the whole group public (endpoints served without
    /// authentication even when issuers are configured). The policy
    /// resolver may override this for groups shared between modules.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.declared_public = true;
        self
    }

    /// Add an HTTP endpoint.
    #[must_use]
    pub fn route(
        self,
        method: Method,
        path: impl Into<String>,
        handler_name: impl Into<String>,
        service: MethodRouter,
    ) -> Self {
        self.route_methods(vec![method], path, handler_name, service)
    }

    /// Add an HTTP endpoint declaring several methods on one handler.
    ///
    /// Declaring more than one method is recorded as a load-time error on
    /// the endpoint; the definition is kept so the conflict report can
    /// describe it.
    #[must_use]
    pub fn route_methods(
        mut self,
        methods: Vec<Method>,
        path: impl Into<String>,
        handler_name: impl Into<String>,
        service: MethodRouter,
    ) -> Self {
        self.endpoints.push(EndpointDef {
            methods,
            path: path.into(),
            handler_name: handler_name.into(),
            direct_auth: false,
            service,
        });
        self
    }

    /// Add an HTTP endpoint with a direct authentication requirement.
    /// Such endpoints are always served behind authentication, regardless
    /// of the group-level policy.
    #[must_use]
    pub fn authenticated_route(
        mut self,
        method: Method,
        path: impl Into<String>,
        handler_name: impl Into<String>,
        service: MethodRouter,
    ) -> Self {
        self.endpoints.push(EndpointDef {
            methods: vec![method],
            path: path.into(),
            handler_name: handler_name.into(),
            direct_auth: true,
            service,
        });
        self
    }

    /// Add a WebSocket endpoint (served as a GET upgrade).
    #[must_use]
    pub fn websocket(
        mut self,
        path: impl Into<String>,
        handler_name: impl Into<String>,
        service: MethodRouter,
    ) -> Self {
        self.ws_endpoints.push(WsEndpointDef {
            path: path.into(),
            handler_name: handler_name.into(),
            service,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> RouteGroup {
        RouteGroup {
            declared_public: self.declared_public,
            endpoints: self.endpoints,
            ws_endpoints: self.ws_endpoints,
        }
    }
}

impl Default for RouteGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
