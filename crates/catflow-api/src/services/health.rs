//! Health reporting
//!
//! Reads local connection state only; never touches the network and never
//! fails.

use catflow_broker::Publisher;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Service version reported by `/status`.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusReport {
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Whether the broker connection is open
    pub rabbitmq_status: bool,
}

impl StatusReport {
    pub fn is_healthy(&self) -> bool {
        self.rabbitmq_status
    }
}

#[derive(Clone)]
pub struct HealthReporter {
    broker: Option<Arc<dyn Publisher>>,
}

impl HealthReporter {
    pub fn new(broker: Option<Arc<dyn Publisher>>) -> Self {
        Self { broker }
    }

    pub fn status(&self) -> StatusReport {
        let rabbitmq_status = self
            .broker
            .as_ref()
            .is_some_and(|broker| broker.is_connected());

        StatusReport {
            version: SERVICE_VERSION.to_string(),
            rabbitmq_status,
        }
    }
}
