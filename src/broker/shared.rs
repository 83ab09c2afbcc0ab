//! Thread-safe broker handle
//!
//! `SharedBroker` puts one [`Broker`] behind a single `Mutex`, so every entry point
//! is serialized, and pairs it with a `Condvar` that is signalled after each
//! operation. `request` sleeps on that condition variable instead of spinning,
//! which lets a responder on another thread process the request and reply while
//! the requester waits.
//!
//! Handlers still run with the lock held and receive `&mut Broker`; they must use
//! that reference, not the `SharedBroker`, to talk to the broker.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::engine::{Broker, Handler};
use super::message::Message;
use super::stats::BrokerStats;
use crate::ids::{msg_name, priority};
use crate::utils::error::{BrokerError, Result};

#[derive(Debug)]
struct Inner {
    broker: Mutex<Broker>,
    changed: Condvar,
}

#[derive(Debug, Clone)]
pub struct SharedBroker {
    inner: Arc<Inner>,
}

impl SharedBroker {
    pub fn new(broker: Broker) -> Self {
        Self {
            inner: Arc::new(Inner {
                broker: Mutex::new(broker),
                changed: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Broker> {
        // a panicking handler poisons the lock but leaves the tables consistent
        self.inner
            .broker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the broker, then wakes any waiting
    /// `request`. Operations without a dedicated wrapper (topic creation,
    /// unsubscribe, introspection) go through here.
    pub fn with<R>(&self, f: impl FnOnce(&mut Broker) -> R) -> R {
        let result = {
            let mut broker = self.lock();
            f(&mut broker)
        };
        self.inner.changed.notify_all();
        result
    }

    pub fn register_server(&self, server_id: u16, handler: Option<Handler>) -> Result<()> {
        self.with(|broker| broker.register_server(server_id, handler))
    }

    pub fn unregister_server(&self, server_id: u16) -> Result<()> {
        self.with(|broker| broker.unregister_server(server_id))
    }

    pub fn subscribe(&self, topic_id: u16, server_id: u16, handler: Option<Handler>) -> Result<()> {
        self.with(|broker| broker.subscribe(topic_id, server_id, handler))
    }

    pub fn send(&self, src: u16, dst: u16, kind: u16, payload: &[u8], priority: u8) -> Result<()> {
        self.with(|broker| broker.send(src, dst, kind, payload, priority))
    }

    pub fn process(&self, server_id: u16, max_messages: u16) -> Result<usize> {
        self.with(|broker| broker.process(server_id, max_messages))
    }

    pub fn publish(
        &self,
        src: u16,
        topic_id: u16,
        kind: u16,
        payload: &[u8],
        priority: u8,
    ) -> Result<usize> {
        self.with(|broker| broker.publish(src, topic_id, kind, payload, priority))
    }

    pub fn respond(&self, request: &Message, payload: &[u8]) -> Result<()> {
        self.with(|broker| broker.respond(request, payload))
    }

    pub fn stats(&self) -> Result<BrokerStats> {
        self.lock().stats()
    }

    pub fn pending_count(&self, server_id: u16) -> Result<usize> {
        self.lock().pending_count(server_id)
    }

    /// Sends a request and blocks until a message reaches `src`'s queue or
    /// `timeout` of wall-clock time has passed.
    pub fn request(
        &self,
        src: u16,
        dst: u16,
        kind: u16,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<Message> {
        let started = Instant::now();
        let deadline = started + timeout;

        let mut broker = self.lock();
        broker.send(src, dst, kind, payload, priority::NORMAL)?;
        self.inner.changed.notify_all();

        loop {
            if let Some(reply) = broker.take_reply(src) {
                debug!(src, dst, seq = reply.seq, "reply received");
                return Ok(reply);
            }

            let now = Instant::now();
            if now >= deadline {
                let waited = now.duration_since(started).as_millis() as u64;
                warn!(src, dst, kind = msg_name(kind), waited, "request timed out");
                return Err(BrokerError::Timeout { waited });
            }

            broker = self
                .inner
                .changed
                .wait_timeout(broker, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

impl From<Broker> for SharedBroker {
    fn from(broker: Broker) -> Self {
        Self::new(broker)
    }
}
