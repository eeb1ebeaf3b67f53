//! Unverified token inspection.
//!
//! Issuer routing has to read the `iss` claim before any key material is
//! known, so the header and claims are decoded without checking the
//! signature. Nothing read here is trusted until the token has been
//! verified against the selected issuer's keys.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::AuthError;

/// Decoded JOSE header fields the authenticator routes on.
#[derive(Debug, Clone, Deserialize)]
pub struct PeekedHeader {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
}

/// A structurally valid but unverified JWT.
#[derive(Debug, Clone)]
pub struct UnverifiedJwt {
    pub header: PeekedHeader,
    /// Raw claims object. Read-only until verification succeeds.
    pub claims: serde_json::Value,
}

impl UnverifiedJwt {
    #[must_use]
    pub fn str_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(serde_json::Value::as_str)
    }

    /// Whether the `aud` claim (string or array) contains `expected`.
    #[must_use]
    pub fn audience_contains(&self, expected: &str) -> bool {
        match self.claims.get("aud") {
            Some(serde_json::Value::String(aud)) => aud == expected,
            Some(serde_json::Value::Array(auds)) => {
                auds.iter().any(|a| a.as_str() == Some(expected))
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn expiry(&self) -> Option<i64> {
        self.claims.get("exp").and_then(serde_json::Value::as_i64)
    }
}

/// Decode header and claims without verifying the signature.
pub fn peek(token: &str) -> Result<UnverifiedJwt, AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(claims), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::Malformed("expected three dot-separated segments".to_owned()));
    };

    let header: PeekedHeader = decode_segment(header, "header")?;
    let claims: serde_json::Value = decode_segment(claims, "claims")?;
    if !claims.is_object() {
        return Err(AuthError::Malformed("claims segment is not an object".to_owned()));
    }

    Ok(UnverifiedJwt { header, claims })
}

fn decode_segment<T: serde::de::DeserializeOwned>(
    segment: &str,
    what: &str,
) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::Malformed(format!("{what} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::Malformed(format!("{what} is not valid JSON: {e}")))
}
