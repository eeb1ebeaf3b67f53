//! Token authentication pipeline.
//!
//! Order matters: the internal shared secret is checked before any JWT
//! parsing (it is not a JWT), then the token is peeked to route it to an
//! issuer, and only then is key material fetched and the signature
//! verified. Identity pinning and subject presentation run last, on
//! verified claims only.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode};
use secrecy::ExposeSecret as _;

use crate::audit::{AuditSink, AuthEvent, TracingAudit};
use crate::config::{AuthSettings, InternalCallerConfig, IssuerConfig, TokenMatchMode};
use crate::error::AuthError;
use crate::identity::Identity;
use crate::jwks::JwksProviderCache;
use crate::options::{DevBypassPolicy, VerifyOptions};
use crate::peek::{UnverifiedJwt, peek};

/// Placeholder in an issuer's audience template, replaced with the
/// request path at verification time.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Per-request inputs the pipeline needs besides the token itself.
pub struct RequestContext<'a> {
    /// Request path, as matched by the router.
    pub path: &'a str,
    /// Raw query string, read only for development bypass markers.
    pub query: Option<&'a str>,
    /// Self-reported internal client id header value, if present.
    pub internal_client_id: Option<&'a str>,
}

pub struct TokenAuthenticator {
    issuers: Vec<IssuerConfig>,
    jwks: JwksProviderCache,
    bypass: DevBypassPolicy,
    internal: Option<InternalCallerConfig>,
    audit: Arc<dyn AuditSink>,
}

impl TokenAuthenticator {
    #[must_use]
    pub fn new(settings: &AuthSettings) -> Self {
        Self::with_audit(settings, Arc::new(TracingAudit))
    }

    #[must_use]
    pub fn with_audit(settings: &AuthSettings, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            issuers: settings.issuers.clone(),
            jwks: JwksProviderCache::default(),
            bypass: DevBypassPolicy::new(
                settings.insecure_bypass_enabled,
                settings.environment,
                settings.variant,
            ),
            internal: settings.internal.clone(),
            audit,
        }
    }

    /// Header name carrying the internal caller's client id, when an
    /// internal credential is configured.
    #[must_use]
    pub fn client_id_header(&self) -> Option<&str> {
        self.internal.as_ref().map(|c| c.client_id_header.as_str())
    }

    /// Authenticate one credential and produce the caller's identity.
    pub async fn authenticate(
        &self,
        token: &str,
        ctx: &RequestContext<'_>,
    ) -> Result<Identity, AuthError> {
        let result = self.authenticate_inner(token, ctx).await;
        match &result {
            Ok(identity) => self.audit.record(AuthEvent::Accepted {
                issuer: identity
                    .issuer
                    .clone()
                    .unwrap_or_else(|| crate::identity::INTERNAL_SUBJECT.to_owned()),
                subject: identity.subject.clone(),
            }),
            Err(err) => self.audit.record(AuthEvent::Rejected {
                reason: err.to_string(),
            }),
        }
        result
    }

    async fn authenticate_inner(
        &self,
        token: &str,
        ctx: &RequestContext<'_>,
    ) -> Result<Identity, AuthError> {
        if let Some(internal) = &self.internal {
            if matches_internal(internal, token) {
                return Ok(Identity::internal(ctx.internal_client_id));
            }
        }

        let options = self.bypass.options_for_query(ctx.query);
        let peeked = peek(token)?;

        let issuer = peeked
            .str_claim("iss")
            .ok_or(AuthError::ClaimsRejected("missing iss"))?
            .to_owned();
        let (issuer_cfg, audience) =
            self.select_issuer_config(&peeked, &issuer, ctx.path, options)?;

        let algorithm = supported_algorithm(&peeked.header.alg)?;

        let claims = if options.verify_signature {
            self.verified_claims(
                token,
                &peeked,
                issuer_cfg,
                audience.as_deref(),
                algorithm,
                options,
            )
            .await?
        } else {
            tracing::warn!(path = %ctx.path, "serving request with signature verification disabled");
            bypass_claims(peeked, audience.as_deref(), options)?
        };

        let subject = claims
            .get("sub")
            .and_then(serde_json::Value::as_str)
            .ok_or(AuthError::ClaimsRejected("missing sub"))?;

        if let Some(pinned) = &issuer_cfg.pinned_subject {
            if pinned != subject {
                return Err(AuthError::IdentityMismatch);
            }
        }
        let email = claims.get("email").and_then(serde_json::Value::as_str);
        if let Some(pinned) = &issuer_cfg.pinned_email {
            let verified = claims
                .get("email_verified")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false);
            if !verified || email != Some(pinned.as_str()) {
                return Err(AuthError::IdentityMismatch);
            }
        }

        // The presentation subject replaces both identifier fields so
        // downstream code sees one consistent caller.
        let (subject, user_id) = match &issuer_cfg.present_as_subject {
            Some(presented) => (presented.clone(), Some(presented.clone())),
            None => (
                subject.to_owned(),
                claims
                    .get("user_id")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned),
            ),
        };

        Ok(Identity {
            subject,
            user_id,
            email: email.map(str::to_owned),
            display_name: claims
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned),
            picture_url: claims
                .get("picture")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned),
            issuer: Some(issuer),
        })
    }

    /// Scan issuer configs in declared order. Several configs may share
    /// one `iss` value with different audiences, so an audience mismatch
    /// moves on to the next config instead of rejecting outright.
    fn select_issuer_config(
        &self,
        peeked: &UnverifiedJwt,
        issuer: &str,
        path: &str,
        options: VerifyOptions,
    ) -> Result<(&IssuerConfig, Option<String>), AuthError> {
        let mut issuer_seen = false;
        for cfg in &self.issuers {
            if cfg.issuer != issuer {
                continue;
            }
            issuer_seen = true;
            if !options.verify_audience {
                return Ok((cfg, None));
            }
            if let Some(expected) = expected_audience(cfg, peeked, path) {
                return Ok((cfg, Some(expected)));
            }
        }
        if issuer_seen {
            Err(AuthError::ClaimsRejected("audience mismatch"))
        } else {
            Err(AuthError::UnknownIssuer(issuer.to_owned()))
        }
    }

    async fn verified_claims(
        &self,
        token: &str,
        peeked: &UnverifiedJwt,
        issuer_cfg: &IssuerConfig,
        audience: Option<&str>,
        algorithm: Algorithm,
        options: VerifyOptions,
    ) -> Result<serde_json::Value, AuthError> {
        let provider = self.jwks.provider_for(&issuer_cfg.jwks_url);
        let key = provider.decoding_key(peeked.header.kid.as_deref()).await?;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&issuer_cfg.issuer]);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation.validate_exp = options.verify_expiry;
        let mut required = vec!["iss"];
        if audience.is_some() {
            required.push("aud");
        }
        if options.verify_expiry {
            required.push("exp");
        }
        validation.set_required_spec_claims(&required);

        let data =
            decode::<serde_json::Value>(token, &key, &validation).map_err(map_jwt_error)?;
        Ok(data.claims)
    }
}

/// Asymmetric algorithms only. Accepting an HMAC algorithm against JWKS
/// material would let a public key be used as a shared secret.
fn supported_algorithm(alg: &str) -> Result<Algorithm, AuthError> {
    match alg {
        "RS256" => Ok(Algorithm::RS256),
        "ES256" => Ok(Algorithm::ES256),
        other => Err(AuthError::UnsupportedAlgorithm(other.to_owned())),
    }
}

/// Resolve the audience a config expects for this request, if the
/// token's unverified `aud` satisfies it. A static audience is matched
/// verbatim; templates are compared only after `{path}` substitution,
/// so a token carrying the raw template string never matches.
fn expected_audience(cfg: &IssuerConfig, peeked: &UnverifiedJwt, path: &str) -> Option<String> {
    if let Some(audience) = &cfg.audience {
        return peeked.audience_contains(audience).then(|| audience.clone());
    }
    cfg.audience_templates.iter().find_map(|template| {
        let expected = template.replace(PATH_PLACEHOLDER, path);
        peeked.audience_contains(&expected).then_some(expected)
    })
}

fn matches_internal(cfg: &InternalCallerConfig, token: &str) -> bool {
    let secret = cfg.token.expose_secret();
    if secret.is_empty() {
        return false;
    }
    match cfg.match_mode {
        TokenMatchMode::Exact => token == secret,
        TokenMatchMode::Prefix => token.starts_with(secret),
    }
}

/// Claim checks applied when the development bypass skipped signature
/// verification. Audience and expiry still hold unless their markers
/// were also present.
fn bypass_claims(
    peeked: UnverifiedJwt,
    audience: Option<&str>,
    options: VerifyOptions,
) -> Result<serde_json::Value, AuthError> {
    if let Some(audience) = audience {
        if !peeked.audience_contains(audience) {
            return Err(AuthError::ClaimsRejected("audience mismatch"));
        }
    }
    if options.verify_expiry {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        match peeked.expiry() {
            Some(exp) if exp > now => {}
            Some(_) => return Err(AuthError::ClaimsRejected("token expired")),
            None => return Err(AuthError::ClaimsRejected("missing required claim")),
        }
    }
    Ok(peeked.claims)
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => return AuthError::ClaimsRejected("token expired"),
        ErrorKind::ImmatureSignature => return AuthError::ClaimsRejected("token not yet valid"),
        ErrorKind::InvalidAudience => return AuthError::ClaimsRejected("audience mismatch"),
        ErrorKind::InvalidIssuer => return AuthError::ClaimsRejected("issuer mismatch"),
        ErrorKind::MissingRequiredClaim(_) => {
            return AuthError::ClaimsRejected("missing required claim");
        }
        _ => {}
    }
    AuthError::Verification(err)
}
