pub mod clock;
pub mod engine;
pub mod message;
pub mod queue;
pub mod registry;
pub mod shared;
pub mod stats;
pub mod topic;

pub use clock::{Clock, ManualClock, SystemClock, TickClock};
pub use engine::{Broker, Handler, handler};
pub use message::{Message, MessageFlags};
pub use shared::SharedBroker;
pub use stats::{BrokerStats, ServerInfo, TopicInfo};

/// Maximum number of registered servers.
pub const MAX_SERVERS: usize = 16;
/// Maximum number of active topics.
pub const MAX_TOPICS: usize = 64;
/// Maximum subscribers per topic.
pub const MAX_SUBSCRIBERS: usize = 32;
/// Inbound queue depth per server.
pub const QUEUE_DEPTH: usize = 32;
/// Maximum payload size in bytes.
pub const MAX_PAYLOAD: usize = 256;
