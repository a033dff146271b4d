//! Publisher abstraction
//!
//! The ingest coordinator and health reporter only see this trait, so the
//! AMQP producer can be swapped for the in-memory broker in tests.

use async_trait::async_trait;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::BrokerResult;

/// Externally visible connection state.
///
/// `Disconnected -> Connecting -> Connected -> Closed`. `Closed` is terminal
/// and only reached through an explicit close; a dropped connection shows up
/// as `Disconnected` and is never re-established by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Closed => write!(f, "closed"),
        }
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send `payload` to the exchange tagged with `routing_key`.
    ///
    /// Returns once the broker accepted the frame; consumer acknowledgement
    /// is not awaited.
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> BrokerResult<()>;

    /// Current connection state. Reads local state only.
    fn state(&self) -> ConnectionState;

    /// Whether publishing can currently succeed.
    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Release the connection. Call once, at shutdown.
    async fn close(&self) -> BrokerResult<()>;

    /// Name of the exchange messages are published to.
    fn exchange(&self) -> &str;
}
