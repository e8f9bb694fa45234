use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Notification severity/kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alarm,
    Info,
    Warning,
    Success,
    Error,
}

/// A notification as delivered by the remote service.
///
/// `id` is assigned server-side: a record without one is a draft that has
/// not been created yet and cannot be tracked by a subscription.
/// `last_update_time` is the authoritative version marker used for delta
/// queries; `state` is an opaque status string (e.g. "open", "resolved",
/// "dismissed") that the engine only compares, never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Consuming application
    pub target_app: String,

    /// Logical channel within the application
    pub topic: String,

    pub kind: NotificationKind,

    pub state: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(with = "time::serde::rfc3339::option", default)]
    pub creation: Option<OffsetDateTime>,

    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_update_time: Option<OffsetDateTime>,
}

impl NotificationRecord {
    /// True for a record that has not been persisted server-side yet.
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_record_json_round_trip() {
        let record = NotificationRecord {
            id: Some("n-1".into()),
            target_app: "dashboard".into(),
            topic: "builds".into(),
            kind: NotificationKind::Warning,
            state: "open".into(),
            message: Some("build unstable".into()),
            creation: Some(datetime!(2024-05-01 10:00:00 UTC)),
            last_update_time: Some(datetime!(2024-05-01 10:05:00 UTC)),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"targetApp\":\"dashboard\""));
        assert!(json.contains("\"kind\":\"warning\""));
        assert!(json.contains("\"lastUpdateTime\""));

        let back: NotificationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_draft_record_omits_optional_fields() {
        let draft = NotificationRecord {
            id: None,
            target_app: "dashboard".into(),
            topic: "builds".into(),
            kind: NotificationKind::Info,
            state: "open".into(),
            message: None,
            creation: None,
            last_update_time: None,
        };

        assert!(draft.is_draft());
        let json = serde_json::to_string(&draft).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("\"message\""));
    }

    #[test]
    fn test_deserialize_without_timestamps() {
        let json = r#"{
            "id": "n-2",
            "targetApp": "dashboard",
            "topic": "deploys",
            "kind": "success",
            "state": "open"
        }"#;

        let record: NotificationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("n-2"));
        assert!(record.creation.is_none());
        assert!(record.last_update_time.is_none());
    }
}
