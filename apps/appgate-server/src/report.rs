//! Startup report logging.

use appgate_kit::StartupReport;

/// Emit the assembly outcome to the log stream: one line per module,
/// one line per problem, and a closing summary.
pub fn log_startup_report(report: &StartupReport) {
    for result in &report.import_results {
        if result.ok {
            tracing::info!(
                module = %result.module_name,
                endpoints = result.endpoints.len(),
                websockets = result.web_socket_endpoints.len(),
                duration_s = result.import_duration_seconds,
                "module loaded"
            );
            continue;
        }

        if let Some(error) = &result.import_error {
            tracing::error!(
                module = %result.module_name,
                message = %error.message,
                causes = ?error.causes,
                "module failed to load"
            );
        }
        for error in &result.errors {
            tracing::error!(module = %result.module_name, "{error}");
        }
        for endpoint in &result.endpoints {
            for error in &endpoint.errors {
                tracing::error!(
                    module = %result.module_name,
                    method = %endpoint.http_method,
                    path = %endpoint.path,
                    handler = %endpoint.handler_name,
                    "{error}"
                );
            }
        }
        for endpoint in &result.web_socket_endpoints {
            for error in &endpoint.errors {
                tracing::error!(
                    module = %result.module_name,
                    path = %endpoint.path,
                    handler = %endpoint.handler_name,
                    "{error}"
                );
            }
        }
    }

    let failed = report.import_results.iter().filter(|r| !r.ok).count();
    if report.ok {
        tracing::info!(
            modules = report.import_results.len(),
            duration_s = report.startup_duration_seconds,
            "all modules assembled"
        );
    } else {
        tracing::warn!(
            modules = report.import_results.len(),
            failed,
            duration_s = report.startup_duration_seconds,
            "assembly finished with errors"
        );
    }
}
