//! Host configuration.
//!
//! Layered: built-in defaults, then an optional YAML file, then
//! `APPGATE_`-prefixed environment variables (`__` separates nesting,
//! e.g. `APPGATE_SERVER__PORT=9000`).

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use appgate_auth::AuthSettings;
use figment::Figment;
use figment::providers::{Env, Format as _, Yaml};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthSettings,
    pub modules: ModulesConfig,
    pub companion: Option<CompanionConfig>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix every module route is mounted under.
    pub route_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            route_prefix: "/routes".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModulesConfig {
    /// Per-module auth override: `true` forces the module's group
    /// public, `false` forces it authenticated.
    pub public_overrides: HashMap<String, bool>,
}

/// Sidecar process the host waits for before serving traffic.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanionConfig {
    /// Readiness URL polled until it answers 2xx.
    pub ready_url: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    50
}

fn default_interval_ms() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// tracing-subscriber filter directive, overridable via `RUST_LOG`.
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        figment = figment.merge(Yaml::file_exact(path));
    }
    figment = figment.merge(Env::prefixed("APPGATE_").split("__"));
    figment
        .extract()
        .context("failed to load host configuration")
}
