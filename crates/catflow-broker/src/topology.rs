use catflow_core::{Config, ExchangeKind};

/// Suffix appended to a routing key to name its queue.
const QUEUE_SUFFIX: &str = "_queue";

/// Queue bound for `routing_key` at startup.
pub fn queue_name_for(routing_key: &str) -> String {
    format!("{}{}", routing_key, QUEUE_SUFFIX)
}

/// Everything needed to connect and declare the announcement topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyConfig {
    pub url: String,
    pub exchange: String,
    pub kind: ExchangeKind,
    /// One queue is declared and bound per key; empty means bindings are
    /// managed outside this service.
    pub routing_keys: Vec<String>,
}

impl TopologyConfig {
    pub fn new(url: impl Into<String>, exchange: impl Into<String>, kind: ExchangeKind) -> Self {
        Self {
            url: url.into(),
            exchange: exchange.into(),
            kind,
            routing_keys: Vec::new(),
        }
    }

    pub fn with_routing_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.rabbitmq_url(),
            config.rabbitmq_exchange(),
            config.rabbitmq_exchange_type(),
        )
        .with_routing_keys(config.rabbitmq_routing_keys().iter().cloned())
    }

    /// (queue, routing key) pairs to declare, in configuration order.
    pub fn bindings(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.routing_keys
            .iter()
            .map(|key| (queue_name_for(key), key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_name_is_deterministic() {
        assert_eq!(queue_name_for("ingest"), "ingest_queue");
        assert_eq!(queue_name_for("ingest"), queue_name_for("ingest"));
    }

    #[test]
    fn test_bindings_follow_routing_keys() {
        let topology = TopologyConfig::new("amqp://localhost", "catflow", ExchangeKind::Topic)
            .with_routing_keys(["ingest", "detect"]);
        let bindings: Vec<_> = topology.bindings().collect();
        assert_eq!(
            bindings,
            vec![
                ("ingest_queue".to_string(), "ingest"),
                ("detect_queue".to_string(), "detect"),
            ]
        );
    }

    #[test]
    fn test_no_routing_keys_no_bindings() {
        let topology = TopologyConfig::new("amqp://localhost", "catflow", ExchangeKind::Fanout);
        assert_eq!(topology.bindings().count(), 0);
    }
}
