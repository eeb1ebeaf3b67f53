//! Authentication configuration model.
//!
//! Deserialized by the host application's config layer and handed to
//! [`crate::TokenAuthenticator`] at startup. Unknown fields are rejected
//! so a typo in an issuer block fails fast instead of silently changing
//! the trust policy.

use secrecy::SecretString;
use serde::Deserialize;

/// One trusted token issuer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerConfig {
    /// Short name used in logs.
    pub name: String,
    /// Expected `iss` claim, matched verbatim.
    pub issuer: String,
    /// Expected `aud` claim, matched verbatim. When set, the templates
    /// are ignored.
    #[serde(default)]
    pub audience: Option<String>,
    /// Ordered audience templates tried when no static audience is set.
    /// The literal `{path}` is replaced with the request path at
    /// verification time, so one issuer entry can bind tokens to
    /// individual endpoints.
    #[serde(default)]
    pub audience_templates: Vec<String>,
    /// JWKS endpoint serving this issuer's signing keys.
    pub jwks_url: String,
    /// When set, only tokens whose `sub` equals this value are accepted.
    #[serde(default)]
    pub pinned_subject: Option<String>,
    /// When set, only tokens whose `email` claim equals this value are
    /// accepted.
    #[serde(default)]
    pub pinned_email: Option<String>,
    /// When set, the produced identity carries this subject instead of
    /// the token's `sub`. Used for issuers whose subjects are opaque
    /// machine ids.
    #[serde(default)]
    pub present_as_subject: Option<String>,
}

/// Deployment environment, as declared by the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

/// What kind of installation this process is serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceVariant {
    /// Developer workspace instance.
    Workspace,
    /// Deployed, externally reachable instance.
    #[default]
    Deployed,
}

/// How the presented credential is compared against the internal secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMatchMode {
    #[default]
    Exact,
    /// The credential must start with the secret. Allows callers to
    /// append a per-request suffix for correlation.
    Prefix,
}

/// Shared-secret credential for trusted in-cluster callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InternalCallerConfig {
    pub token: SecretString,
    #[serde(default)]
    pub match_mode: TokenMatchMode,
    /// Header carrying the caller's self-reported client id, used only
    /// for display in the produced identity.
    #[serde(default = "default_client_id_header")]
    pub client_id_header: String,
}

fn default_client_id_header() -> String {
    "x-internal-client-id".to_owned()
}

/// Top-level authentication settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// Global switch. When false, route groups are served without
    /// authentication unless an endpoint declares a direct requirement.
    pub enabled: bool,
    pub issuers: Vec<IssuerConfig>,
    pub internal: Option<InternalCallerConfig>,
    /// Operator opt-in for the development verification bypass. Has no
    /// effect outside a development workspace.
    pub insecure_bypass_enabled: bool,
    pub environment: Environment,
    pub variant: ServiceVariant,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            issuers: Vec::new(),
            internal: None,
            insecure_bypass_enabled: false,
            environment: Environment::default(),
            variant: ServiceVariant::default(),
        }
    }
}
