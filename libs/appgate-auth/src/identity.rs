//! Authenticated caller identity.

use serde::Serialize;

/// Subject used for trusted internal callers authenticated by shared
/// secret rather than by JWT.
pub const INTERNAL_SUBJECT: &str = "internal";

/// The result of successful authentication, attached to the request as
/// an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Stable caller identifier. Either the token's `sub`, the issuer's
    /// configured presentation subject, or [`INTERNAL_SUBJECT`].
    pub subject: String,
    /// Secondary user id claim. Follows the subject when the issuer
    /// configures a presentation subject.
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
    /// Issuer URL the credential was verified against. `None` for
    /// internal callers.
    pub issuer: Option<String>,
}

impl Identity {
    /// Identity for a caller that presented the internal shared secret.
    /// The client id is self-reported and only used for display.
    #[must_use]
    pub fn internal(client_id: Option<&str>) -> Self {
        Self {
            subject: INTERNAL_SUBJECT.to_owned(),
            user_id: None,
            email: None,
            display_name: client_id.map(str::to_owned),
            picture_url: None,
            issuer: None,
        }
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.issuer.is_none() && self.subject == INTERNAL_SUBJECT
    }
}
