//! Single-flight guard for mutating actions
//!
//! An action holds an [`InFlightToken`] for its whole confirm → request → apply
//! sequence. A second invocation while the token is alive is rejected instead of
//! interleaving with the first one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

#[derive(Debug, Clone)]
pub struct InFlight {
    label: &'static str,
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Returns `None` when another invocation still holds the guard.
    pub fn try_begin(&self) -> Option<InFlightToken> {
        if self.busy.swap(true, Ordering::SeqCst) {
            debug!(action = self.label, "Rejected overlapping invocation");
            return None;
        }
        Some(InFlightToken {
            busy: self.busy.clone(),
        })
    }
}

/// Releases the guard on drop, including on early returns and errors.
#[derive(Debug)]
pub struct InFlightToken {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
