// src/services/notifications.rs
use crate::core::endpoints::primary;
use crate::core::{ApiError, TransportClient};
use crate::types::{Notification, PagedBody};
use serde::de::IgnoredAny;
use serde_json::json;

#[derive(Clone)]
pub struct NotificationsService {
    client: TransportClient,
}

impl NotificationsService {
    pub fn new(client: TransportClient) -> Self {
        Self { client }
    }

    /// Notifications for the signed-in user; accepts a bare array or an `items` wrapper.
    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        let body: PagedBody<Notification> =
            self.client.get(primary::NOTIFICATIONS_LIST.path()).await?;
        Ok(body.into_items())
    }

    pub async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client
            .put(&primary::NOTIFICATIONS_MARK_READ.with_id(id), &json!({}))
            .await?;
        Ok(())
    }
}
