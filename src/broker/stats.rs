//! Broker statistics and introspection snapshots
//!
//! All types here are plain copies taken at the time of the call. They are
//! serializable so the binary and embedding code can dump them as JSON.

use serde::Serialize;

/// Aggregate counters for one broker instance.
///
/// `total_delivered` counts handler invocations: one per processed message and one
/// per subscriber reached by a publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BrokerStats {
    pub total_sent: u32,
    pub total_delivered: u32,
    pub total_dropped: u32,
    pub queue_overflows: u32,
    pub active_servers: u32,
    pub active_topics: u32,
}

/// Per-server counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub server_id: u16,
    pub has_handler: bool,
    pub pending: usize,
    pub sent: u32,
    pub received: u32,
    pub dropped: u32,
}

/// Per-topic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicInfo {
    pub topic_id: u16,
    pub subscribers: usize,
    pub published: u32,
}
