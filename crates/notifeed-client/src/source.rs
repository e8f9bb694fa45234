use async_trait::async_trait;
use time::OffsetDateTime;

use notifeed_core::{NotifeedError, NotificationRecord};

/// Capability the polling engine consumes to reach the notification service.
///
/// `fetch_all` and `fetch_since` feed the subscription engine; the remaining
/// operations are plain request/response calls available to callers
/// independent of any open subscription.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Full current read, filtered server-side to what the caller may see.
    async fn fetch_all(&self) -> Result<Vec<NotificationRecord>, NotifeedError>;

    /// Delta read: records with `lastUpdateTime >= since`. May be empty.
    async fn fetch_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, NotifeedError>;

    /// Current notifications on one topic.
    async fn fetch_by_topic(
        &self,
        topic: &str,
    ) -> Result<Vec<NotificationRecord>, NotifeedError>;

    /// Create a notification; returns the server-assigned id.
    async fn create(&self, record: &NotificationRecord) -> Result<String, NotifeedError>;

    /// Mark a notification resolved; returns the updated record.
    async fn resolve(&self, id: &str) -> Result<NotificationRecord, NotifeedError>;

    /// Dismiss a notification; returns the updated record.
    async fn dismiss(&self, id: &str) -> Result<NotificationRecord, NotifeedError>;

    /// Topics currently known to the service for this caller.
    async fn list_topics(&self) -> Result<Vec<String>, NotifeedError>;
}
