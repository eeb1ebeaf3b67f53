//! Startup report types.
//!
//! One [`ModuleImportResult`] per discovered module, created when loading
//! starts and finalized only after global conflict detection has run
//! (cross-module duplicates cannot be known earlier). The report is
//! serialized with camelCase field names because it crosses the process
//! boundary to operational tooling.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured rendering of a module constructor failure: the top-level
/// message plus the error's cause chain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorModel {
    pub message: String,
    pub causes: Vec<String>,
}

impl ImportErrorModel {
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            causes: err.chain().skip(1).map(|c| c.to_string()).collect(),
        }
    }
}

/// Description of one HTTP endpoint, with accumulated diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    /// Single method, or a comma-separated list when the handler illegally
    /// declared several (itself recorded in `errors`).
    pub http_method: String,
    pub path: String,
    pub handler_name: String,
    /// Load-time diagnostics plus conflicts discovered globally.
    pub errors: Vec<String>,
}

/// Description of one WebSocket endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WsEndpointDescriptor {
    pub path: String,
    pub handler_name: String,
    pub errors: Vec<String>,
}

/// Per-module outcome of the assembly process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleImportResult {
    pub module_name: String,
    /// Wall-clock construction time. Informational only.
    pub import_duration_seconds: f64,
    /// True iff construction succeeded, the module produced no load-time
    /// errors, and no endpoint carries an annotated error. Only valid
    /// after conflict detection has completed for all modules.
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_error: Option<ImportErrorModel>,
    pub errors: Vec<String>,
    pub endpoints: Vec<EndpointDescriptor>,
    pub web_socket_endpoints: Vec<WsEndpointDescriptor>,
}

impl ModuleImportResult {
    #[must_use]
    pub fn started(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            import_duration_seconds: 0.0,
            ok: false,
            import_error: None,
            errors: Vec::new(),
            endpoints: Vec::new(),
            web_socket_endpoints: Vec::new(),
        }
    }
}

/// The full assembly record, suitable for serialization to an external
/// monitoring channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupReport {
    pub timestamp: DateTime<Utc>,
    pub startup_duration_seconds: f64,
    /// True iff every module's result is ok.
    pub ok: bool,
    pub import_results: Vec<ModuleImportResult>,
}
