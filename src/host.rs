use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{info, warn};

/// The environment hosting the coordinator: user alerts and page reloads
pub trait Host: Send + Sync {
    /// Blocking, user-facing warning
    fn alert(&self, message: &str);
    /// Tear the coordinator down and re-run startup from scratch
    fn reload(&self);
}

/// Terminal host: alerts go to stderr, reloads are queued for the CLI loop
#[derive(Default)]
pub struct ConsoleHost {
    pending_reloads: AtomicUsize,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a queued reload request, if any
    pub fn take_reload(&self) -> bool {
        self.pending_reloads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Host for ConsoleHost {
    fn alert(&self, message: &str) {
        warn!("alert: {}", message);
        eprintln!("⚠️  {}", message);
    }

    fn reload(&self) {
        info!("Reload requested");
        self.pending_reloads.fetch_add(1, Ordering::SeqCst);
    }
}
