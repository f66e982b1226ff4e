use rdkafka::config::ClientConfig;
use serde::Deserialize;

/// Broker connection settings shared by every queue bound in a process
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Kafka broker addresses (comma-separated)
    pub brokers: String,
    /// Consumer group ID
    pub group_id: String,
    /// Where to start when the group has no committed offset (`earliest` / `latest`)
    pub auto_offset_reset: String,
    pub session_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            group_id: "notification-consumer".to_string(),
            auto_offset_reset: "earliest".to_string(),
            session_timeout_ms: 30000,
        }
    }
}

impl ListenerConfig {
    /// Consumer settings: manual commits, so an offset only moves once a message is final
    pub fn consumer_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", &self.auto_offset_reset)
            .set("session.timeout.ms", self.session_timeout_ms.to_string())
            .set("enable.partition.eof", "false");
        config
    }

    /// Producer settings used for the dead-letter queue
    pub fn producer_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("message.timeout.ms", "30000");
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_config_disables_auto_commit() {
        let config = ListenerConfig::default().consumer_config();

        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
        assert_eq!(config.get("group.id"), Some("notification-consumer"));
        assert_eq!(config.get("enable.auto.commit"), Some("false"));
        assert_eq!(config.get("session.timeout.ms"), Some("30000"));
    }

    #[test]
    fn test_producer_config_is_idempotent() {
        let config = ListenerConfig {
            brokers: "kafka-1:9092,kafka-2:9092".to_string(),
            ..Default::default()
        }
        .producer_config();

        assert_eq!(config.get("bootstrap.servers"), Some("kafka-1:9092,kafka-2:9092"));
        assert_eq!(config.get("enable.idempotence"), Some("true"));
        assert_eq!(config.get("acks"), Some("all"));
    }
}
