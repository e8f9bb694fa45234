use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use notifeed_core::NotifeedError;

use crate::registry::HandlerRegistry;
use crate::source::NotificationSource;
use crate::state::SubscriptionState;

/// Drives the fetch-merge-dispatch cycle for one subscription.
///
/// One tokio task runs each cycle to completion before the next tick, so
/// cycles never overlap and the watermark only moves between cycles. The
/// subscription state is never touched by anything else.
pub struct PollingEngine {
    inner: Arc<EngineInner>,
    poll_interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct EngineInner {
    source: Arc<dyn NotificationSource>,
    registry: Arc<HandlerRegistry>,
    state: Mutex<SubscriptionState>,
    closed: AtomicBool,
    shutdown: Notify,
}

impl PollingEngine {
    pub fn new(
        source: Arc<dyn NotificationSource>,
        registry: Arc<HandlerRegistry>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                source,
                registry,
                state: Mutex::new(SubscriptionState::new()),
                closed: AtomicBool::new(false),
                shutdown: Notify::new(),
            }),
            poll_interval,
            task: Mutex::new(None),
        }
    }

    /// Seed the subscription with a full fetch, dispatch the initial batch
    /// and start the polling loop.
    ///
    /// A failed initial fetch returns `OpenFailed` and leaves the engine
    /// idle; open() may be called again to retry.
    pub async fn open(&self) -> Result<(), NotifeedError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(NotifeedError::Closed);
        }
        if self.task.lock().expect("engine task lock poisoned").is_some() {
            return Ok(());
        }

        let initial = self
            .inner
            .source
            .fetch_all()
            .await
            .map_err(|e| NotifeedError::OpenFailed(Box::new(e)))?;

        let batch = self
            .inner
            .state
            .lock()
            .expect("subscription state lock poisoned")
            .merge(initial)?;

        info!(
            count = batch.len(),
            watermark = ?self.watermark(),
            "Subscription opened"
        );
        if !batch.is_empty() {
            self.inner.registry.dispatch(&batch);
        }

        let inner = self.inner.clone();
        let poll_interval = self.poll_interval;
        let handle = tokio::spawn(async move { inner.run(poll_interval).await });
        *self.task.lock().expect("engine task lock poisoned") = Some(handle);
        Ok(())
    }

    /// Stop polling. Idempotent.
    ///
    /// A scheduled but not-yet-started cycle is cancelled; a fetch already
    /// in flight completes but its result is discarded.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.shutdown.notify_one();
        // The loop exits on its own; no need to hold on to the handle.
        self.task
            .lock()
            .expect("engine task lock poisoned")
            .take();
        debug!("Subscription closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn watermark(&self) -> Option<OffsetDateTime> {
        self.inner
            .state
            .lock()
            .expect("subscription state lock poisoned")
            .watermark()
    }
}

impl EngineInner {
    async fn run(self: Arc<Self>, poll_interval: Duration) {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately; the
        // opening fetch already covered this cycle.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => break,
                _ = ticker.tick() => {}
            }
            if self.closed.load(Ordering::SeqCst) {
                break;
            }
            if let Err(e) = self.run_cycle().await {
                warn!(error = %e, "Poll cycle failed; watermark unchanged, retrying on the next tick");
            }
        }
        debug!("Polling loop stopped");
    }

    async fn run_cycle(&self) -> Result<(), NotifeedError> {
        let since = self
            .state
            .lock()
            .expect("subscription state lock poisoned")
            .since();

        let fetched = self
            .source
            .fetch_since(since)
            .await
            .map_err(|e| NotifeedError::PollCycleFailed(Box::new(e)))?;

        // close() may have raced with the fetch; a closed subscription must
        // not merge or dispatch anything.
        if self.closed.load(Ordering::SeqCst) {
            debug!("Subscription closed while a fetch was in flight; discarding result");
            return Ok(());
        }

        let changed = self
            .state
            .lock()
            .expect("subscription state lock poisoned")
            .merge(fetched)?;

        if !changed.is_empty() {
            debug!(count = changed.len(), "Dispatching changed notifications");
            self.registry.dispatch(&changed);
        }
        Ok(())
    }
}
