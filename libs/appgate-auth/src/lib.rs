//! Multi-issuer JWT authentication.
//!
//! - [`config`] - issuer, internal-caller and bypass configuration
//! - [`authenticator`] - the verification pipeline
//! - [`jwks`] - key fetching and caching per JWKS URL
//! - [`middleware`] - axum integration: route policy, middleware,
//!   [`AuthorizedUser`] extractor
//!
//! Verification order: internal shared secret, unverified issuer
//! routing, algorithm allowlist, JWKS key lookup, signature and claim
//! validation, identity pinning, subject presentation.

pub mod audit;
pub mod authenticator;
pub mod config;
pub mod error;
pub mod extract;
pub mod identity;
pub mod jwks;
pub mod middleware;
pub mod options;
pub mod peek;

pub use audit::{AuditSink, AuthEvent, MemoryAudit, NoOpAudit, TracingAudit};
pub use authenticator::{PATH_PLACEHOLDER, RequestContext, TokenAuthenticator};
pub use config::{
    AuthSettings, Environment, InternalCallerConfig, IssuerConfig, ServiceVariant, TokenMatchMode,
};
pub use error::AuthError;
pub use extract::{
    WS_AUTH_PROTOCOL_PREFIX, bearer_token, is_websocket_upgrade, token_from_headers,
    websocket_token,
};
pub use identity::{INTERNAL_SUBJECT, Identity};
pub use jwks::{HttpKeySource, JwksKeyProvider, JwksProviderCache, KeySource};
pub use middleware::{AuthState, AuthorizedUser, RoutePolicy, RoutePolicyBuilder, auth_middleware};
pub use options::{DevBypassPolicy, VerifyOptions};
pub use peek::{UnverifiedJwt, peek};
