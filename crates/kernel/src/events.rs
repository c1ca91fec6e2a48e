//! Permission change notifications.
//!
//! The host application calls [`PermissionEvents::notify`] once the current
//! user's permissions become available or change; subscribers such as
//! [`crate::menu::MenuBinding`] re-filter in response.

use tokio::sync::broadcast;
use tracing::debug;

/// Buffered notifications per subscriber before it starts lagging.
const CHANNEL_CAPACITY: usize = 16;

/// Broadcasts "permissions changed" to every subscriber.
#[derive(Debug, Clone)]
pub struct PermissionEvents {
    tx: broadcast::Sender<()>,
}

impl PermissionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Signal that permissions changed. Returns how many subscribers were
    /// notified.
    pub fn notify(&self) -> usize {
        let receivers = self.tx.send(()).unwrap_or(0);
        debug!(receivers, "permissions changed");
        receivers
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for PermissionEvents {
    fn default() -> Self {
        Self::new()
    }
}
