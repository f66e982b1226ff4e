use crate::error::{AppError, Result};
use queue_listener::{ListenerConfig, RetryPolicy};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub queues: QueueConfig,
    pub kafka: ListenerConfig,
    pub notification_service: NotificationServiceConfig,
    pub retry: RetryPolicy,
}

/// `APP_*`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub env: String,
    /// Port of the health/metrics endpoint
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            port: 8080,
        }
    }
}

/// `NOTIFICATION_QUEUE`, `NOTIFICATION_DEAD_LETTER_QUEUE`
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_queue")]
    pub queue: String,
    #[serde(default)]
    pub dead_letter_queue: Option<String>,
}

fn default_queue() -> String {
    "notification.queue".to_string()
}

/// `NOTIFICATION_SERVICE_*`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationServiceConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for NotificationServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8082".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Load from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let mut queues: QueueConfig = envy::prefixed("NOTIFICATION_").from_iter(vars.clone())?;
        queues.queue = queues.queue.trim().to_string();
        queues.dead_letter_queue = queues
            .dead_letter_queue
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let config = Config {
            app: envy::prefixed("APP_").from_iter(vars.clone())?,
            queues,
            kafka: envy::prefixed("KAFKA_").from_iter(vars.clone())?,
            notification_service: envy::prefixed("NOTIFICATION_SERVICE_").from_iter(vars.clone())?,
            retry: envy::prefixed("RETRY_").from_iter(vars)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.queues.queue.is_empty() {
            return Err(AppError::Config("NOTIFICATION_QUEUE must not be empty".to_string()));
        }

        if self.queues.dead_letter_queue.as_deref() == Some(self.queues.queue.as_str()) {
            return Err(AppError::Config(
                "NOTIFICATION_DEAD_LETTER_QUEUE must differ from NOTIFICATION_QUEUE".to_string(),
            ));
        }

        let url = &self.notification_service.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "NOTIFICATION_SERVICE_URL must be an http(s) URL, got '{}'",
                url
            )));
        }

        if self.notification_service.timeout_ms == 0 {
            return Err(AppError::Config(
                "NOTIFICATION_SERVICE_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        if self.kafka.brokers.trim().is_empty() {
            return Err(AppError::Config("KAFKA_BROKERS must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_vars(Vec::new()).unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.queues.queue, "notification.queue");
        assert_eq!(config.queues.dead_letter_queue, None);
        assert_eq!(config.kafka.brokers, "localhost:9092");
        assert_eq!(config.kafka.group_id, "notification-consumer");
        assert_eq!(config.notification_service.url, "http://localhost:8082");
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_reads_prefixed_variables() {
        let config = Config::from_vars(vars(&[
            ("APP_PORT", "9100"),
            ("NOTIFICATION_QUEUE", "notifications"),
            ("NOTIFICATION_DEAD_LETTER_QUEUE", "notifications.dlq"),
            ("KAFKA_BROKERS", "kafka:9092"),
            ("KAFKA_GROUP_ID", "notif-group"),
            ("NOTIFICATION_SERVICE_URL", "http://notification:8080"),
            ("NOTIFICATION_SERVICE_TIMEOUT_MS", "1500"),
            ("RETRY_MAX_RETRIES", "5"),
        ]))
        .unwrap();

        assert_eq!(config.app.port, 9100);
        assert_eq!(config.queues.queue, "notifications");
        assert_eq!(
            config.queues.dead_letter_queue.as_deref(),
            Some("notifications.dlq")
        );
        assert_eq!(config.kafka.brokers, "kafka:9092");
        assert_eq!(config.kafka.group_id, "notif-group");
        assert_eq!(config.notification_service.url, "http://notification:8080");
        assert_eq!(config.notification_service.timeout_ms, 1500);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.backoff_ms, 100);
    }

    #[test]
    fn test_blank_dead_letter_queue_means_none() {
        let config =
            Config::from_vars(vars(&[("NOTIFICATION_DEAD_LETTER_QUEUE", "  ")])).unwrap();
        assert_eq!(config.queues.dead_letter_queue, None);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            Config::from_vars(vars(&[("APP_PORT", "not-a-port")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_vars(vars(&[("NOTIFICATION_QUEUE", " ")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_vars(vars(&[("NOTIFICATION_SERVICE_URL", "notification:8080")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_vars(vars(&[
                ("NOTIFICATION_QUEUE", "q"),
                ("NOTIFICATION_DEAD_LETTER_QUEUE", "q"),
            ])),
            Err(AppError::Config(_))
        ));
    }
}
