use super::{NotificationSender, SendError};
use crate::config::NotificationServiceConfig;
use crate::error::{AppError, Result};
use crate::models::NotificationRequest;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Notification service client over HTTP
pub struct HttpNotificationSender {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpNotificationSender {
    pub fn new(config: &NotificationServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Client(format!("HTTP client error: {e}")))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/v1/notifications", config.url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    async fn send(&self, request: NotificationRequest) -> std::result::Result<(), SendError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(recipient = ?request.recipient(), "Notification accepted by service");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            Err(SendError::Unavailable(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )))
        } else {
            Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
