use async_trait::async_trait;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use notifeed_core::{NotifeedError, NotificationRecord};

use crate::config::ClientConfig;
use crate::source::NotificationSource;

/// HTTP implementation of [`NotificationSource`].
pub struct HttpNotificationSource {
    http: reqwest::Client,
    base_url: String,
    target_app: String,
}

impl HttpNotificationSource {
    pub fn new(config: &ClientConfig) -> Self {
        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            target_app: config.target_app.clone(),
        }
    }

    fn notifications_url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/notifications", self.base_url)
        } else {
            format!("{}/notifications/{}", self.base_url, path)
        }
    }

    async fn get_records(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Vec<NotificationRecord>, NotifeedError> {
        let resp = self
            .http
            .get(self.notifications_url(""))
            .query(params)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| NotifeedError::Transport(e.to_string()))?;
        handle_response(resp).await
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn fetch_all(&self) -> Result<Vec<NotificationRecord>, NotifeedError> {
        self.get_records(&[("targetApp", self.target_app.as_str())])
            .await
    }

    async fn fetch_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<NotificationRecord>, NotifeedError> {
        let since = since.format(&Rfc3339).unwrap_or_default();
        self.get_records(&[
            ("targetApp", self.target_app.as_str()),
            ("since", since.as_str()),
        ])
        .await
    }

    async fn fetch_by_topic(
        &self,
        topic: &str,
    ) -> Result<Vec<NotificationRecord>, NotifeedError> {
        self.get_records(&[("targetApp", self.target_app.as_str()), ("topic", topic)])
            .await
    }

    async fn create(&self, record: &NotificationRecord) -> Result<String, NotifeedError> {
        let resp = self
            .http
            .post(self.notifications_url(""))
            .header("Content-Type", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| NotifeedError::Transport(e.to_string()))?;
        let created: NotificationRecord = handle_response(resp).await?;
        created.id.ok_or_else(|| {
            NotifeedError::InvalidRecord("created notification came back without an id".into())
        })
    }

    async fn resolve(&self, id: &str) -> Result<NotificationRecord, NotifeedError> {
        let resp = self
            .http
            .put(self.notifications_url(&format!("{id}/resolve")))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| NotifeedError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    async fn dismiss(&self, id: &str) -> Result<NotificationRecord, NotifeedError> {
        let resp = self
            .http
            .put(self.notifications_url(&format!("{id}/dismiss")))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| NotifeedError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    async fn list_topics(&self) -> Result<Vec<String>, NotifeedError> {
        let resp = self
            .http
            .get(self.notifications_url("topics"))
            .query(&[("targetApp", self.target_app.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| NotifeedError::Transport(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, NotifeedError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(NotifeedError::Http {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(NotifeedError::from)
}
