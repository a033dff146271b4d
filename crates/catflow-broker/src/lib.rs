//! Catflow Broker Library
//!
//! Owns the single long-lived AMQP connection, channel, and exchange the ingest
//! service announces uploads on, plus the optional queue-per-routing-key
//! topology declared once at startup.
//!
//! # Topology
//!
//! For every configured routing key `k` a queue named `k_queue` is declared
//! and bound to the exchange under `k`. Names are derived from the key, so
//! redeclaring on a later start is a no-op.

pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod producer;
pub mod publisher;
pub mod topology;

// Re-export commonly used types
pub use catflow_core::ExchangeKind;
pub use error::{BrokerError, BrokerResult};
#[cfg(feature = "memory")]
pub use memory::InMemoryBroker;
pub use producer::Producer;
pub use publisher::{ConnectionState, Publisher};
pub use topology::{queue_name_for, TopologyConfig};
