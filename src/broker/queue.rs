//! Per-server inbound queue
//!
//! A fixed-capacity FIFO backed by `heapless::Deque`. When the queue is full the
//! incoming message is refused and handed back to the caller; messages already
//! queued are never evicted.

use super::QUEUE_DEPTH;
use super::message::Message;

#[derive(Debug, Default)]
pub struct InboundQueue {
    messages: heapless::Deque<Message, QUEUE_DEPTH>,
    dropped: u32,
}

impl InboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` at the tail.
    ///
    /// Returns the message back if the queue is at capacity, after counting the drop.
    pub fn enqueue(&mut self, message: Message) -> Result<(), Message> {
        self.messages.push_back(message).inspect_err(|_| {
            self.dropped = self.dropped.wrapping_add(1);
        })
    }

    /// Removes and returns the oldest message.
    pub fn dequeue(&mut self) -> Option<Message> {
        self.messages.pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.messages.is_full()
    }

    /// Number of messages refused because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Discards every pending message. The drop counter is kept.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
