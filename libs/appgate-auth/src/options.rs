//! Development verification bypass.
//!
//! A request may relax individual verification steps via query markers,
//! but only when the operator opted in AND the process is a development
//! workspace. The gate is evaluated once at construction; per-request
//! marker parsing is inert everywhere else.

use crate::config::{Environment, ServiceVariant};

/// Which verification steps apply to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    pub verify_signature: bool,
    pub verify_audience: bool,
    pub verify_expiry: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            verify_signature: true,
            verify_audience: true,
            verify_expiry: true,
        }
    }
}

/// Marker disabling signature verification.
const DISABLE_VERIFY: &str = "disable-verify";
/// Marker disabling audience matching.
const DISABLE_AUD: &str = "disable-aud";
/// Marker disabling expiry checking.
const DISABLE_EXP: &str = "disable-exp";

#[derive(Debug, Clone, Copy)]
pub struct DevBypassPolicy {
    enabled: bool,
}

impl DevBypassPolicy {
    /// The bypass is active only when all three conditions hold: the
    /// operator set the insecure flag, the environment is development,
    /// and this is a workspace instance.
    #[must_use]
    pub fn new(
        insecure_bypass_enabled: bool,
        environment: Environment,
        variant: ServiceVariant,
    ) -> Self {
        let enabled = insecure_bypass_enabled
            && environment == Environment::Development
            && variant == ServiceVariant::Workspace;
        if enabled {
            tracing::warn!("insecure auth bypass is active, token verification can be disabled per request");
        }
        Self { enabled }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve the verification options for one request from its query
    /// string. Markers are plain query keys; values are ignored.
    #[must_use]
    pub fn options_for_query(&self, query: Option<&str>) -> VerifyOptions {
        let mut options = VerifyOptions::default();
        if !self.enabled {
            return options;
        }
        let Some(query) = query else {
            return options;
        };
        for pair in query.split('&') {
            let key = pair.split('=').next().unwrap_or(pair);
            match key {
                DISABLE_VERIFY => options.verify_signature = false,
                DISABLE_AUD => options.verify_audience = false,
                DISABLE_EXP => options.verify_expiry = false,
                _ => {}
            }
        }
        options
    }
}
