//! Shared application state handed to every handler.

use catflow_broker::Publisher;
use catflow_core::Config;
use catflow_storage::Storage;
use std::sync::Arc;

use crate::services::health::HealthReporter;
use crate::services::ingest::IngestService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    /// `None` when the producer could not be created at startup
    pub broker: Option<Arc<dyn Publisher>>,
    pub ingest: IngestService,
    pub health: HealthReporter,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        broker: Option<Arc<dyn Publisher>>,
    ) -> Self {
        let ingest = IngestService::new(
            storage.clone(),
            broker.clone(),
            config.rabbitmq_routing_keys().to_vec(),
            config.announcement_format(),
        );
        let health = HealthReporter::new(broker.clone());

        Self {
            config,
            storage,
            broker,
            ingest,
            health,
        }
    }
}
