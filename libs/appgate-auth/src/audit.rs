//! Authentication audit events.

use std::sync::Arc;

/// One authentication decision, emitted after the pipeline finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Accepted {
        /// Issuer name from configuration, or `internal`.
        issuer: String,
        subject: String,
    },
    Rejected {
        reason: String,
    },
}

/// Sink for authentication decisions.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuthEvent);
}

/// Emits decisions as tracing events. Accepted tokens log at debug,
/// rejections at warn.
#[derive(Debug, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, event: AuthEvent) {
        match event {
            AuthEvent::Accepted { issuer, subject } => {
                tracing::debug!(%issuer, %subject, "token accepted");
            }
            AuthEvent::Rejected { reason } => {
                tracing::warn!(%reason, "token rejected");
            }
        }
    }
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NoOpAudit;

impl AuditSink for NoOpAudit {
    fn record(&self, _event: AuthEvent) {}
}

/// Collects events in memory. Test support.
#[derive(Debug, Default)]
pub struct MemoryAudit {
    events: parking_lot::Mutex<Vec<AuthEvent>>,
}

impl MemoryAudit {
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.lock().clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: AuthEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_audit_collects_in_order() {
        let audit = MemoryAudit::default();
        audit.record(AuthEvent::Rejected {
            reason: "unknown issuer".to_owned(),
        });
        audit.record(AuthEvent::Accepted {
            issuer: "main".to_owned(),
            subject: "user-1".to_owned(),
        });

        let events = audit.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AuthEvent::Rejected { .. }));
        assert!(matches!(events[1], AuthEvent::Accepted { .. }));
    }
}
