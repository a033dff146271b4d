//! Process-local broker
//!
//! Routes published messages into named queues using the same
//! fanout/direct/topic rules an AMQP exchange applies, so services can be
//! exercised without a running RabbitMQ.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::publisher::{ConnectionState, Publisher};
use crate::topology::TopologyConfig;
use crate::{BrokerError, BrokerResult, ExchangeKind};

/// A message as it was handed to the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub routing_key: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct Inner {
    bindings: Vec<(String, String)>,
    queues: HashMap<String, VecDeque<Vec<u8>>>,
    published: Vec<PublishedMessage>,
    failing_keys: HashSet<String>,
}

pub struct InMemoryBroker {
    exchange: String,
    kind: ExchangeKind,
    inner: Mutex<Inner>,
    severed: AtomicBool,
    closed: AtomicBool,
}

impl InMemoryBroker {
    /// Build a broker with the queues and bindings `topology` would declare.
    pub fn new(topology: &TopologyConfig) -> Self {
        let broker = Self {
            exchange: topology.exchange.clone(),
            kind: topology.kind,
            inner: Mutex::new(Inner::default()),
            severed: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        };
        for (queue, routing_key) in topology.bindings() {
            broker.bind(&queue, routing_key);
        }
        broker
    }

    /// Declare `queue` if needed and bind it under `binding_key`.
    pub fn bind(&self, queue: &str, binding_key: &str) {
        let mut inner = self.lock();
        inner.queues.entry(queue.to_string()).or_default();
        let binding = (queue.to_string(), binding_key.to_string());
        if !inner.bindings.contains(&binding) {
            inner.bindings.push(binding);
        }
    }

    /// Remove and return every message waiting in `queue`.
    pub fn drain(&self, queue: &str) -> Vec<Vec<u8>> {
        self.lock()
            .queues
            .get_mut(queue)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of messages waiting in `queue`.
    pub fn queue_len(&self, queue: &str) -> usize {
        self.lock().queues.get(queue).map_or(0, VecDeque::len)
    }

    pub fn queue_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.lock().queues.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every accepted publish in order, whether or not it reached a queue.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.lock().published.clone()
    }

    /// Drop the connection as if the broker went away.
    pub fn sever(&self) {
        self.severed.store(true, Ordering::Release);
    }

    /// Make publishes under `routing_key` fail while the connection stays up.
    pub fn fail_routing_key(&self, routing_key: &str) {
        self.lock().failing_keys.insert(routing_key.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain collections behind
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Publisher for InMemoryBroker {
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> BrokerResult<()> {
        match self.state() {
            ConnectionState::Connected => {}
            ConnectionState::Closed => return Err(BrokerError::Closed),
            state => {
                return Err(BrokerError::Connectivity(format!(
                    "In-memory broker is {}",
                    state
                )))
            }
        }

        let mut inner = self.lock();
        if inner.failing_keys.contains(routing_key) {
            return Err(BrokerError::Publish(format!(
                "Publish rejected for routing key '{}'",
                routing_key
            )));
        }

        inner.published.push(PublishedMessage {
            routing_key: routing_key.to_string(),
            payload: payload.to_vec(),
        });

        // A queue bound several times still receives one copy
        let targets: HashSet<String> = inner
            .bindings
            .iter()
            .filter(|(_, binding_key)| routes(self.kind, binding_key, routing_key))
            .map(|(queue, _)| queue.clone())
            .collect();

        for queue in targets {
            inner
                .queues
                .entry(queue)
                .or_default()
                .push_back(payload.to_vec());
        }

        Ok(())
    }

    fn state(&self) -> ConnectionState {
        if self.closed.load(Ordering::Acquire) {
            ConnectionState::Closed
        } else if self.severed.load(Ordering::Acquire) {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Connected
        }
    }

    async fn close(&self) -> BrokerResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(BrokerError::Closed);
        }
        Ok(())
    }

    fn exchange(&self) -> &str {
        &self.exchange
    }
}

/// Whether a message published under `routing_key` reaches a queue bound
/// with `binding_key` on an exchange of `kind`.
fn routes(kind: ExchangeKind, binding_key: &str, routing_key: &str) -> bool {
    match kind {
        ExchangeKind::Fanout => true,
        ExchangeKind::Direct => binding_key == routing_key,
        ExchangeKind::Topic => {
            let pattern: Vec<&str> = binding_key.split('.').collect();
            let words: Vec<&str> = routing_key.split('.').collect();
            topic_matches(&pattern, &words)
        }
    }
}

// `*` matches exactly one word, `#` zero or more
fn topic_matches(pattern: &[&str], words: &[&str]) -> bool {
    match pattern.split_first() {
        None => words.is_empty(),
        Some((&"#", rest)) => (0..=words.len()).any(|skip| topic_matches(rest, &words[skip..])),
        Some((&"*", rest)) => !words.is_empty() && topic_matches(rest, &words[1..]),
        Some((word, rest)) => words.first() == Some(word) && topic_matches(rest, &words[1..]),
    }
}
