//! Authentication error taxonomy.

use http::StatusCode;

/// Everything that can go wrong between receiving a credential and
/// producing an [`crate::Identity`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unknown issuer: {0}")]
    UnknownIssuer(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("no signing key matches the token")]
    KeyNotFound,

    #[error("signature verification failed: {0}")]
    Verification(#[source] jsonwebtoken::errors::Error),

    #[error("token claims rejected: {0}")]
    ClaimsRejected(&'static str),

    #[error("token is not bound to this caller")]
    IdentityMismatch,

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

impl AuthError {
    /// HTTP status the serving layer should answer with. Every credential
    /// problem is a 401; only an unreachable key endpoint is surfaced as
    /// a server-side failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::KeyFetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
