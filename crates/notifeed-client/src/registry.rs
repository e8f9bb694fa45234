use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::warn;

use notifeed_core::NotificationRecord;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked once per dispatch pass with the full changed batch.
///
/// Handlers run synchronously on the polling task and are expected to be
/// fast; long work should be offloaded by the handler itself.
pub trait NotificationHandler: Send + Sync {
    fn on_notifications(&self, batch: &[NotificationRecord]) -> Result<(), BoxError>;
}

impl<F> NotificationHandler for F
where
    F: Fn(&[NotificationRecord]) -> Result<(), BoxError> + Send + Sync,
{
    fn on_notifications(&self, batch: &[NotificationRecord]) -> Result<(), BoxError> {
        self(batch)
    }
}

/// Token returned by [`HandlerRegistry::add`], used to remove the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Insertion-ordered collection of handlers for one subscription.
///
/// Dispatch order is registration order. Each dispatch pass works on a
/// snapshot of the list, so additions and removals made during a pass
/// (including by a handler on itself) take effect on the next pass only.
pub struct HandlerRegistry {
    handlers: Mutex<Vec<(HandlerId, Arc<dyn NotificationHandler>)>>,
    next_id: AtomicU64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn add(&self, handler: Arc<dyn NotificationHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .expect("handler registry lock poisoned")
            .push((id, handler));
        id
    }

    /// Returns false if the handler was already removed.
    pub fn remove(&self, id: HandlerId) -> bool {
        let mut handlers = self
            .handlers
            .lock()
            .expect("handler registry lock poisoned");
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        handlers.len() < before
    }

    pub fn len(&self) -> usize {
        self.handlers
            .lock()
            .expect("handler registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every currently-registered handler with the batch.
    ///
    /// A failing handler is reported and skipped; the rest of the pass
    /// runs unaffected.
    pub fn dispatch(&self, batch: &[NotificationRecord]) {
        let snapshot: Vec<(HandlerId, Arc<dyn NotificationHandler>)> = self
            .handlers
            .lock()
            .expect("handler registry lock poisoned")
            .clone();

        for (id, handler) in snapshot {
            if let Err(e) = handler.on_notifications(batch) {
                warn!(
                    handler_id = id.0,
                    error = %e,
                    batch_size = batch.len(),
                    "Notification handler failed"
                );
            }
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
