//! Readiness flag shared between the assembly task and health handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap clonable flag flipped exactly once, after assembly has finished
/// and the listener is accepting traffic.
#[derive(Clone, Default)]
pub struct ReadySignal(Arc<AtomicBool>);

impl ReadySignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
