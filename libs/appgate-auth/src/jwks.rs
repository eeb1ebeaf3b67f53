//! JWKS key material: fetching, caching and selection.
//!
//! One [`JwksKeyProvider`] per JWKS URL, shared across every issuer that
//! points at it. Readers take the current key set lock-free via
//! `ArcSwapOption`; a miss (cold start or unknown `kid` after rotation)
//! funnels through a single async mutex so concurrent misses produce one
//! upstream fetch, not a stampede.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{Jwk, JwkSet, KeyAlgorithm};

use crate::error::AuthError;

/// Source of a JWKS document. Abstracted so tests can serve key sets
/// without a network.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the key set over HTTP.
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("{}: {e}", self.url)))?
            .error_for_status()
            .map_err(|e| AuthError::KeyFetch(format!("{}: {e}", self.url)))?;
        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("{}: invalid JWKS document: {e}", self.url)))
    }
}

/// Cached key set for one JWKS URL.
pub struct JwksKeyProvider {
    source: Box<dyn KeySource>,
    keys: ArcSwapOption<JwkSet>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl JwksKeyProvider {
    #[must_use]
    pub fn new(source: impl KeySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            keys: ArcSwapOption::const_empty(),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Resolve the decoding key for a token's `kid`.
    ///
    /// A `kid` unknown to the cached set triggers at most one refresh;
    /// if the fresh set still has no match the token is rejected rather
    /// than retried.
    pub async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        if let Some(set) = self.keys.load_full() {
            if let Some(jwk) = select_key(&set, kid) {
                return build_key(jwk);
            }
        }

        let _guard = self.refresh_lock.lock().await;
        // Another miss may have refreshed while we waited.
        if let Some(set) = self.keys.load_full() {
            if let Some(jwk) = select_key(&set, kid) {
                return build_key(jwk);
            }
        }

        let fresh = self.source.fetch().await?;
        tracing::debug!(keys = fresh.keys.len(), "refreshed JWKS key set");
        let fresh = Arc::new(fresh);
        self.keys.store(Some(fresh.clone()));

        match select_key(&fresh, kid) {
            Some(jwk) => build_key(jwk),
            None => Err(AuthError::KeyNotFound),
        }
    }
}

/// Pick a key by `kid`. A token without a `kid` is accepted only against
/// a single-key set; guessing among several keys would make acceptance
/// depend on set ordering.
fn select_key<'a>(set: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    match kid {
        Some(kid) => set.find(kid),
        None if set.keys.len() == 1 => set.keys.first(),
        None => None,
    }
}

/// Build a decoding key, holding the matched JWK to the same RS256/ES256
/// allowlist the token header is held to.
fn build_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    if let Some(alg) = jwk.common.key_algorithm {
        if !matches!(alg, KeyAlgorithm::RS256 | KeyAlgorithm::ES256) {
            return Err(AuthError::UnsupportedAlgorithm(alg.to_string()));
        }
    }
    DecodingKey::from_jwk(jwk)
        .map_err(|e| AuthError::KeyFetch(format!("unusable key material: {e}")))
}

/// Lazily constructed providers keyed by JWKS URL.
pub struct JwksProviderCache {
    client: reqwest::Client,
    providers: DashMap<String, Arc<JwksKeyProvider>>,
}

impl JwksProviderCache {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            providers: DashMap::new(),
        }
    }

    /// Get or create the provider for a JWKS URL. Issuers sharing a URL
    /// share the provider and its cached keys.
    #[must_use]
    pub fn provider_for(&self, url: &str) -> Arc<JwksKeyProvider> {
        self.providers
            .entry(url.to_owned())
            .or_insert_with(|| {
                Arc::new(JwksKeyProvider::new(HttpKeySource::new(
                    self.client.clone(),
                    url,
                )))
            })
            .clone()
    }
}

impl Default for JwksProviderCache {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
