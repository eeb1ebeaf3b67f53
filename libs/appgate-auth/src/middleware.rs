//! Request authentication middleware.
//!
//! A [`RoutePolicy`] answers "does this (method, path) require auth"
//! with one pattern matcher per HTTP method, built once at startup from
//! the assembled route table. The middleware resolves the policy, runs
//! the [`TokenAuthenticator`] when required and attaches the resulting
//! [`Identity`] as a request extension. WebSocket upgrades are rejected
//! with plain HTTP status codes before the upgrade completes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::{Method, StatusCode};

use crate::authenticator::{RequestContext, TokenAuthenticator};
use crate::error::AuthError;
use crate::extract::token_from_headers;
use crate::identity::Identity;

/// Per-method route matchers resolving the auth requirement for a path.
pub struct RoutePolicy {
    matchers: HashMap<Method, matchit::Router<bool>>,
}

impl RoutePolicy {
    #[must_use]
    pub fn builder() -> RoutePolicyBuilder {
        RoutePolicyBuilder::default()
    }

    /// `None` means the route is unknown to the policy; the middleware
    /// passes such requests through for the router to 404.
    #[must_use]
    pub fn requires_auth(&self, method: &Method, path: &str) -> Option<bool> {
        self.matchers
            .get(method)
            .and_then(|m| m.at(path).ok())
            .map(|m| *m.value)
    }
}

#[derive(Default)]
pub struct RoutePolicyBuilder {
    matchers: HashMap<Method, matchit::Router<bool>>,
}

impl RoutePolicyBuilder {
    /// Register one route. Paths use `{param}` segments.
    pub fn route(
        mut self,
        method: Method,
        path: &str,
        requires_auth: bool,
    ) -> anyhow::Result<Self> {
        self.matchers
            .entry(method)
            .or_default()
            .insert(path, requires_auth)
            .map_err(|e| anyhow::anyhow!("failed to insert route pattern '{path}': {e}"))?;
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> RoutePolicy {
        RoutePolicy {
            matchers: self.matchers,
        }
    }
}

/// Shared state for [`auth_middleware`].
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<TokenAuthenticator>,
    pub policy: Arc<RoutePolicy>,
}

/// Authenticate requests according to the route policy.
///
/// CORS preflights pass through untouched. Public and unknown routes are
/// served without an [`Identity`] extension; protected routes either get
/// one or are answered with the error's status.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let requires_auth = state
        .policy
        .requires_auth(req.method(), req.uri().path())
        .unwrap_or(false);
    if !requires_auth {
        return next.run(req).await;
    }

    let Some(token) = token_from_headers(req.headers()).map(str::to_owned) else {
        return error_response(&AuthError::MissingToken);
    };

    let client_id = state
        .authenticator
        .client_id_header()
        .and_then(|name| req.headers().get(name))
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let ctx = RequestContext {
        path: req.uri().path(),
        query: req.uri().query(),
        internal_client_id: client_id.as_deref(),
    };

    match state.authenticator.authenticate(&token, &ctx).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &AuthError) -> Response {
    let status = err.status();
    tracing::debug!(%err, "request rejected");
    let body = match status {
        StatusCode::SERVICE_UNAVAILABLE => "Authentication service unavailable",
        _ => "Unauthorized",
    };
    (status, body).into_response()
}

fn is_preflight_request(method: &Method, headers: &http::HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(http::header::ORIGIN)
        && headers.contains_key(http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Extractor for handlers on protected routes.
pub struct AuthorizedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthorizedUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
