//! Page lifetime handling
//!
//! Each mounted page owns an [`UnmountSignal`]; background work started by the
//! page (statistics polling, deferred message delivery) stops when it fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

/// Teardown signal that can be cloned and shared across tasks
#[derive(Clone)]
pub struct UnmountSignal {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl UnmountSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            info!("Page unmounted");
            let _ = self.sender.send(());
        }
    }

    /// Resolves once the page is torn down (immediately if it already was).
    pub async fn wait(&self) {
        let mut rx = self.sender.subscribe();
        if self.is_triggered() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for UnmountSignal {
    fn default() -> Self {
        Self::new()
    }
}
