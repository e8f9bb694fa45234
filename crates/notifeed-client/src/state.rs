use std::collections::HashMap;

use time::OffsetDateTime;

use notifeed_core::{NotifeedError, NotificationRecord};

/// In-memory view of everything one subscription has seen so far.
///
/// Owned exclusively by the polling engine: created empty on open, mutated
/// only by [`merge`](SubscriptionState::merge), dropped on close.
#[derive(Debug, Default)]
pub struct SubscriptionState {
    watermark: Option<OffsetDateTime>,
    known: HashMap<String, NotificationRecord>,
}

impl SubscriptionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest `lastUpdateTime` merged so far. Monotonically non-decreasing.
    pub fn watermark(&self) -> Option<OffsetDateTime> {
        self.watermark
    }

    /// Cursor for the next delta fetch; the epoch until a timestamped
    /// record has been merged.
    pub fn since(&self) -> OffsetDateTime {
        self.watermark.unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Merge a fetched batch and return the changed subset, ascending by
    /// `(lastUpdateTime, id)`.
    ///
    /// A record is changed if its id is new, its `lastUpdateTime` is
    /// strictly greater than the stored version's, or (when timestamps tie
    /// or are absent) its `state` or `message` differs. The watermark
    /// advances to the maximum `lastUpdateTime` across the whole batch,
    /// changed or not, and never decreases.
    ///
    /// Nothing is committed until the whole batch has been validated: a
    /// record without an id fails the merge with `InvalidRecord` and leaves
    /// state untouched.
    pub fn merge(
        &mut self,
        incoming: Vec<NotificationRecord>,
    ) -> Result<Vec<NotificationRecord>, NotifeedError> {
        let mut changed: Vec<NotificationRecord> = Vec::new();
        let mut max_seen = self.watermark;

        for record in &incoming {
            let Some(id) = record.id.as_deref() else {
                return Err(NotifeedError::InvalidRecord(format!(
                    "record on topic '{}' has no id and cannot be tracked",
                    record.topic
                )));
            };

            if let Some(ts) = record.last_update_time
                && max_seen.is_none_or(|m| ts > m)
            {
                max_seen = Some(ts);
            }

            if self.is_changed(id, record) {
                changed.push(record.clone());
            }
        }

        for record in &changed {
            if let Some(id) = &record.id {
                self.known.insert(id.clone(), record.clone());
            }
        }
        self.watermark = max_seen;

        changed.sort_by(|a, b| {
            (a.last_update_time, a.id.as_deref()).cmp(&(b.last_update_time, b.id.as_deref()))
        });
        Ok(changed)
    }

    fn is_changed(&self, id: &str, record: &NotificationRecord) -> bool {
        match self.known.get(id) {
            None => true,
            Some(prev) => match (record.last_update_time, prev.last_update_time) {
                (Some(new), Some(old)) if new > old => true,
                (Some(new), Some(old)) if new < old => false,
                // Timestamps tie or are absent: fall back to field comparison.
                _ => record.state != prev.state || record.message != prev.message,
            },
        }
    }
}
