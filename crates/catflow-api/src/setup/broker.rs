//! Broker producer setup and teardown

use catflow_broker::{Producer, Publisher, TopologyConfig};
use catflow_core::Config;
use std::sync::Arc;

/// Connect the process-wide producer and declare its topology.
///
/// Returns `None` on failure; the error is logged and the service keeps
/// running with `/status` reporting the broker as down. No retry is made.
pub async fn setup_broker(config: &Config) -> Option<Arc<dyn Publisher>> {
    let topology = TopologyConfig::from_config(config);
    tracing::info!(
        exchange = %topology.exchange,
        exchange_type = %topology.kind,
        routing_keys = %topology.routing_keys.join(","),
        "Connecting to RabbitMQ..."
    );

    match Producer::create(&topology).await {
        Ok(producer) => Some(Arc::new(producer)),
        Err(e) => {
            tracing::error!(
                error = %e,
                exchange = %topology.exchange,
                "RabbitMQ producer unavailable; ingestion disabled until restart"
            );
            None
        }
    }
}

/// Close the producer at shutdown. A failure is logged, never propagated.
pub async fn close_broker(broker: Option<&Arc<dyn Publisher>>) {
    let Some(broker) = broker else {
        return;
    };

    match broker.close().await {
        Ok(()) => tracing::info!(exchange = %broker.exchange(), "RabbitMQ connection closed"),
        Err(e) => tracing::warn!(error = %e, "Failed to close RabbitMQ connection"),
    }
}
