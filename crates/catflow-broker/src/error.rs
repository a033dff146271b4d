use thiserror::Error;

/// Broker operation errors
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Broker unreachable, authentication failed, or the channel is unusable
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Exchange or queue declaration/binding was refused
    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    /// The producer was closed explicitly
    #[error("Producer is closed")]
    Closed,
}

impl BrokerError {
    /// Whether the failure means the connection itself is gone.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, BrokerError::Connectivity(_) | BrokerError::Closed)
    }
}

/// Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;
