//! Broker engine
//!
//! This module contains the broker implementation responsible for:
//! - registering servers and owning their inbound queues
//! - queued point-to-point delivery (`send`, then `process` on the destination)
//! - immediate publish/subscribe fan-out in subscription order
//! - request/response on top of `send`
//! - statistics and per-server/per-topic introspection
//!
//! Concurrency and usage notes:
//! - The API is synchronous and takes `&mut self`. The broker has no thread of
//!   its own: handlers run on the caller's stack inside `process` and `publish`.
//! - Handlers receive `&mut Broker`, so a handler may send, publish or respond
//!   while it runs. Such calls execute immediately and may recurse.
//! - To share one broker between threads, wrap it in
//!   [`SharedBroker`](super::shared::SharedBroker).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::clock::{Clock, TickClock};
use super::message::{Message, MessageFlags};
use super::registry::ServerRegistry;
use super::stats::{BrokerStats, ServerInfo, TopicInfo};
use super::topic::TopicTable;
use super::QUEUE_DEPTH;
use crate::ids::{msg_name, priority, server_name, topic_name};
use crate::utils::error::{BrokerError, Result};

/// Message callback. Any context the callback needs is captured by the closure.
pub type Handler = Arc<dyn Fn(&mut Broker, &Message) -> Result<()> + Send + Sync>;

/// Wraps a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Broker, &Message) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Single-owner message broker.
///
/// Every table is sized at construction; nothing grows afterwards. Operations
/// other than [`Broker::init`] and [`Broker::is_registered`] fail with
/// `NotInitialized` until `init` has been called.
pub struct Broker {
    servers: ServerRegistry,
    topics: TopicTable,
    stats: BrokerStats,
    seq: u16,
    clock: Arc<dyn Clock>,
    initialized: bool,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broker")
            .field("initialized", &self.initialized)
            .field("seq", &self.seq)
            .field("stats", &self.stats)
            .field("servers", &self.servers)
            .finish_non_exhaustive()
    }
}

impl Broker {
    /// Creates an uninitialized broker timed by a [`TickClock`].
    pub fn new() -> Self {
        Self::with_clock(Arc::new(TickClock::new()))
    }

    /// Creates an uninitialized broker timed by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            servers: ServerRegistry::new(),
            topics: TopicTable::new(),
            stats: BrokerStats::default(),
            seq: 0,
            clock,
            initialized: false,
        }
    }

    /// Clears every table and marks the broker ready. Calling it on a ready
    /// broker is a no-op.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.reset();
        self.initialized = true;
        info!("broker initialized");
        Ok(())
    }

    /// Clears every table and returns the broker to the uninitialized state.
    pub fn deinit(&mut self) -> Result<()> {
        self.ensure_ready()?;
        let servers = self.servers.active_count();
        let topics = self.topics.active_count();
        self.reset();
        self.initialized = false;
        info!(servers, topics, "broker deinitialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn reset(&mut self) {
        self.servers.clear();
        self.topics.clear();
        self.stats = BrokerStats::default();
        self.seq = 0;
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(BrokerError::NotInitialized)
        }
    }

    fn server_not_found(server_id: u16) -> BrokerError {
        BrokerError::NotFound {
            what: "server",
            id: server_id,
        }
    }

    /// Assigns the next sequence number and the current tick.
    fn stamp(&mut self, msg: &mut Message) {
        msg.seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        msg.timestamp = self.clock.now();
    }

    // ==================== Servers ====================

    /// Registers `server_id` with an optional default handler used by `process`.
    ///
    /// Fails with `InvalidParam` for id 0, `AlreadyExists` if the id is taken and
    /// `NoMemory` when every server slot is in use.
    pub fn register_server(&mut self, server_id: u16, handler: Option<Handler>) -> Result<()> {
        self.ensure_ready()?;
        if server_id == 0 {
            return Err(BrokerError::InvalidParam {
                reason: "server id must be non-zero",
            });
        }
        self.servers.register(server_id, handler)?;
        debug!(
            server = server_id,
            name = server_name(server_id),
            "server registered"
        );
        Ok(())
    }

    /// Frees `server_id`'s slot. Messages still queued for it are discarded.
    /// `NotFound` if the server is not registered.
    pub fn unregister_server(&mut self, server_id: u16) -> Result<()> {
        self.ensure_ready()?;
        let abandoned = self.servers.unregister(server_id)?;
        debug!(
            server = server_id,
            name = server_name(server_id),
            abandoned,
            "server unregistered"
        );
        Ok(())
    }

    /// `false` for unknown ids and on an uninitialized broker; never an error.
    pub fn is_registered(&self, server_id: u16) -> bool {
        self.initialized && self.servers.find(server_id).is_some()
    }

    // ==================== Point-to-point ====================

    /// Queues a message on `dst`'s inbound queue.
    ///
    /// `src` does not need to be registered; when it is, its sent counter is bumped.
    /// A full destination queue drops the new message and reports `QueueFull`.
    pub fn send(
        &mut self,
        src: u16,
        dst: u16,
        kind: u16,
        payload: &[u8],
        priority: u8,
    ) -> Result<()> {
        self.ensure_ready()?;
        let mut msg = Message::new(kind, payload)?;
        let index = self.servers.find(dst).ok_or(Self::server_not_found(dst))?;

        msg.src = src;
        msg.dst = dst;
        msg.priority = priority;
        self.stamp(&mut msg);
        let seq = msg.seq;

        let slot = self.servers.slot_mut(index);
        if slot.queue.enqueue(msg).is_err() {
            self.stats.total_dropped = self.stats.total_dropped.wrapping_add(1);
            self.stats.queue_overflows = self.stats.queue_overflows.wrapping_add(1);
            warn!(
                src,
                dst,
                dst_name = server_name(dst),
                kind = msg_name(kind),
                seq,
                "destination queue full, message dropped"
            );
            return Err(BrokerError::QueueFull {
                server: dst,
                depth: QUEUE_DEPTH,
            });
        }
        slot.received = slot.received.wrapping_add(1);
        self.stats.total_sent = self.stats.total_sent.wrapping_add(1);

        if let Some(source) = self.servers.get_mut(src) {
            source.sent = source.sent.wrapping_add(1);
        }

        debug!(
            src,
            dst,
            kind = msg_name(kind),
            seq,
            priority,
            "message queued"
        );
        Ok(())
    }

    /// Runs `server_id`'s default handler over its queued messages.
    ///
    /// At most `max_messages` are processed; `0` drains what was queued when the
    /// call started. Messages queued by the handler itself wait for the next call.
    /// Returns how many messages were handed to the handler.
    pub fn process(&mut self, server_id: u16, max_messages: u16) -> Result<usize> {
        self.ensure_ready()?;
        let slot = self
            .servers
            .get(server_id)
            .ok_or(Self::server_not_found(server_id))?;
        if slot.handler.is_none() {
            return Err(BrokerError::NoHandler { server: server_id });
        }

        let budget = match max_messages {
            0 => slot.queue.len(),
            n => usize::from(n),
        };

        let mut processed = 0;
        while processed < budget {
            // re-resolve every round: the handler may unregister its own server
            let Some(slot) = self.servers.get_mut(server_id) else {
                break;
            };
            let Some(handler) = slot.handler.clone() else {
                break;
            };
            let Some(msg) = slot.queue.dequeue() else {
                break;
            };

            if let Err(err) = handler(self, &msg) {
                warn!(
                    server = server_id,
                    kind = msg_name(msg.kind),
                    seq = msg.seq,
                    error = %err,
                    "handler failed"
                );
            }
            self.stats.total_delivered = self.stats.total_delivered.wrapping_add(1);
            processed += 1;
        }

        debug!(server = server_id, processed, "queue processed");
        Ok(processed)
    }

    /// Pops the oldest queued message for `server_id` without running any handler.
    pub fn receive(&mut self, server_id: u16) -> Result<Option<Message>> {
        self.ensure_ready()?;
        let slot = self
            .servers
            .get_mut(server_id)
            .ok_or(Self::server_not_found(server_id))?;
        Ok(slot.queue.dequeue())
    }

    /// Number of messages waiting in `server_id`'s queue. `NotFound` if the
    /// server is not registered.
    pub fn pending_count(&self, server_id: u16) -> Result<usize> {
        self.ensure_ready()?;
        self.servers
            .get(server_id)
            .map(|slot| slot.queue.len())
            .ok_or(Self::server_not_found(server_id))
    }

    /// Discards `server_id`'s pending messages. Statistics are left untouched.
    pub fn clear_queue(&mut self, server_id: u16) -> Result<()> {
        self.ensure_ready()?;
        let slot = self
            .servers
            .get_mut(server_id)
            .ok_or(Self::server_not_found(server_id))?;
        let discarded = slot.queue.len();
        slot.queue.clear();
        debug!(server = server_id, discarded, "queue cleared");
        Ok(())
    }

    // ==================== Publish/subscribe ====================

    /// Reserves a slot for `topic_id`.
    ///
    /// `AlreadyExists` if the topic has subscribers, `NoMemory` when the topic
    /// table is full. A topic without subscribers may be created again.
    pub fn create_topic(&mut self, topic_id: u16) -> Result<()> {
        self.ensure_ready()?;
        self.topics.create(topic_id)?;
        debug!(
            topic = topic_id,
            name = topic_name(topic_id),
            "topic created"
        );
        Ok(())
    }

    /// Adds `server_id` to the end of `topic_id`'s subscriber list, creating the
    /// topic if needed.
    pub fn subscribe(
        &mut self,
        topic_id: u16,
        server_id: u16,
        handler: Option<Handler>,
    ) -> Result<()> {
        self.ensure_ready()?;
        let handler = handler.ok_or(BrokerError::InvalidParam {
            reason: "subscriber handler is required",
        })?;

        let topic = self.topics.get_or_create(topic_id)?;
        topic.subscribe(server_id, handler)?;

        debug!(
            topic = topic_id,
            name = topic_name(topic_id),
            server = server_id,
            "subscribed"
        );
        Ok(())
    }

    /// Removes `server_id` from `topic_id`'s subscriber list, keeping the order of
    /// the others. `NotFound` if the topic or the subscription does not exist.
    pub fn unsubscribe(&mut self, topic_id: u16, server_id: u16) -> Result<()> {
        self.ensure_ready()?;
        let topic = self.topics.get_mut(topic_id).ok_or(BrokerError::NotFound {
            what: "topic",
            id: topic_id,
        })?;
        topic.unsubscribe(server_id)?;

        debug!(topic = topic_id, server = server_id, "unsubscribed");
        Ok(())
    }

    /// Delivers one message to every subscriber of `topic_id`, in subscription
    /// order, before returning.
    ///
    /// A subscriber removed by an earlier callback of the same publish is skipped;
    /// one added during the fan-out is not reached. Returns how many subscribers
    /// were invoked.
    pub fn publish(
        &mut self,
        src: u16,
        topic_id: u16,
        kind: u16,
        payload: &[u8],
        priority: u8,
    ) -> Result<usize> {
        self.ensure_ready()?;
        let mut msg = Message::new(kind, payload)?;
        let recipients = self
            .topics
            .get(topic_id)
            .map(|topic| topic.subscriber_ids())
            .ok_or(BrokerError::NotFound {
                what: "topic",
                id: topic_id,
            })?;

        msg.src = src;
        msg.topic = topic_id;
        msg.priority = priority;
        msg.flags = MessageFlags::BROADCAST;
        self.stamp(&mut msg);

        let mut delivered: usize = 0;
        for server_id in recipients {
            let Some(handler) = self.topics.handler_of(topic_id, server_id) else {
                continue;
            };
            if let Err(err) = handler(self, &msg) {
                warn!(
                    topic = topic_id,
                    server = server_id,
                    seq = msg.seq,
                    error = %err,
                    "subscriber failed"
                );
            }
            delivered += 1;
        }

        if delivered > 0 {
            if let Some(topic) = self.topics.get_mut(topic_id) {
                topic.publish_count = topic.publish_count.wrapping_add(1);
            }
            self.stats.total_sent = self.stats.total_sent.wrapping_add(1);
            self.stats.total_delivered = self
                .stats
                .total_delivered
                .wrapping_add(delivered as u32);
        }

        debug!(
            src,
            topic = topic_id,
            name = topic_name(topic_id),
            kind = msg_name(kind),
            seq = msg.seq,
            delivered,
            "published"
        );
        Ok(delivered)
    }

    // ==================== Request/response ====================

    /// Sends a request to `dst` and waits for the next message to land in `src`'s
    /// own queue, which is taken as the reply.
    ///
    /// Waiting is measured on the broker clock; between polls the clock's `idle`
    /// hook runs. A `src` that is not registered can never receive a reply and
    /// simply times out.
    pub fn request(
        &mut self,
        src: u16,
        dst: u16,
        kind: u16,
        payload: &[u8],
        timeout: u32,
    ) -> Result<Message> {
        self.send(src, dst, kind, payload, priority::NORMAL)?;

        let start = self.clock.now();
        loop {
            let waited = self.clock.now().wrapping_sub(start);
            if waited >= timeout {
                warn!(src, dst, kind = msg_name(kind), waited, "request timed out");
                return Err(BrokerError::Timeout {
                    waited: u64::from(waited),
                });
            }
            if let Some(reply) = self.take_reply(src) {
                debug!(src, dst, seq = reply.seq, waited, "reply received");
                return Ok(reply);
            }
            self.clock.idle();
        }
    }

    pub(crate) fn take_reply(&mut self, src: u16) -> Option<Message> {
        self.servers
            .get_mut(src)
            .and_then(|slot| slot.queue.dequeue())
    }

    /// Replies to `request`: the reply goes back to its source, keeping its kind
    /// and priority.
    pub fn respond(&mut self, request: &Message, payload: &[u8]) -> Result<()> {
        self.send(
            request.dst,
            request.src,
            request.kind,
            payload,
            request.priority,
        )
    }

    // ==================== Introspection ====================

    /// Snapshot of the global counters. Active server and topic counts are read
    /// from the tables at the time of the call.
    pub fn stats(&self) -> Result<BrokerStats> {
        self.ensure_ready()?;
        Ok(BrokerStats {
            active_servers: self.servers.active_count() as u32,
            active_topics: self.topics.active_count() as u32,
            ..self.stats
        })
    }

    /// Counters and queue state of one server. `NotFound` if it is not registered.
    pub fn server_info(&self, server_id: u16) -> Result<ServerInfo> {
        self.ensure_ready()?;
        let slot = self
            .servers
            .get(server_id)
            .ok_or(Self::server_not_found(server_id))?;
        Ok(ServerInfo {
            server_id,
            has_handler: slot.handler.is_some(),
            pending: slot.queue.len(),
            sent: slot.sent,
            received: slot.received,
            dropped: slot.queue.dropped(),
        })
    }

    /// Subscriber and publish counts of one topic. `NotFound` unless the topic has
    /// at least one subscriber.
    pub fn topic_info(&self, topic_id: u16) -> Result<TopicInfo> {
        self.ensure_ready()?;
        let topic = self.topics.get(topic_id).ok_or(BrokerError::NotFound {
            what: "topic",
            id: topic_id,
        })?;
        Ok(TopicInfo {
            topic_id,
            subscribers: topic.subscriber_count(),
            published: topic.publish_count,
        })
    }
}
