use std::sync::Arc;

use time::OffsetDateTime;

use notifeed_core::NotifeedError;

use crate::config::ClientConfig;
use crate::engine::PollingEngine;
use crate::registry::{HandlerId, HandlerRegistry, NotificationHandler};
use crate::source::NotificationSource;

/// Caller-facing handle for one open polling session.
///
/// Dropping the handle closes the subscription.
pub struct Subscription {
    engine: PollingEngine,
    registry: Arc<HandlerRegistry>,
}

impl Subscription {
    /// Open a subscription: seed state with a full fetch, dispatch the
    /// initial batch to `handlers` and start polling at the configured
    /// interval.
    pub async fn open(
        source: Arc<dyn NotificationSource>,
        config: &ClientConfig,
        handlers: Vec<Arc<dyn NotificationHandler>>,
    ) -> Result<Self, NotifeedError> {
        config.validate()?;

        let registry = Arc::new(HandlerRegistry::new());
        for handler in handlers {
            registry.add(handler);
        }

        let engine = PollingEngine::new(source, registry.clone(), config.poll_interval());
        engine.open().await?;

        Ok(Self { engine, registry })
    }

    pub fn add_handler(
        &self,
        handler: Arc<dyn NotificationHandler>,
    ) -> Result<HandlerId, NotifeedError> {
        if self.engine.is_closed() {
            return Err(NotifeedError::Closed);
        }
        Ok(self.registry.add(handler))
    }

    pub fn remove_handler(&self, id: HandlerId) -> Result<bool, NotifeedError> {
        if self.engine.is_closed() {
            return Err(NotifeedError::Closed);
        }
        Ok(self.registry.remove(id))
    }

    /// Stop polling and release the subscription. Idempotent.
    pub fn close(&self) {
        self.engine.close();
    }

    pub fn is_closed(&self) -> bool {
        self.engine.is_closed()
    }

    /// Current delta cursor; `None` until a timestamped record was merged.
    pub fn watermark(&self) -> Option<OffsetDateTime> {
        self.engine.watermark()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.engine.close();
    }
}
