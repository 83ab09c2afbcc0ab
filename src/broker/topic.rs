//! Topic registry
//!
//! Each topic keeps its subscribers in registration order inside a bounded
//! `heapless::Vec`. A topic with no subscribers is treated as nonexistent and its
//! slot can be claimed by any other topic id.

use std::fmt;

use super::{Handler, MAX_SUBSCRIBERS, MAX_TOPICS};
use crate::utils::error::{BrokerError, Result};

#[derive(Clone)]
pub struct Subscriber {
    pub server_id: u16,
    pub handler: Handler,
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("server_id", &self.server_id)
            .finish_non_exhaustive()
    }
}

/// Represents a topic and its ordered subscriber list.
#[derive(Debug, Default)]
pub struct Topic {
    pub id: u16,
    pub subscribers: heapless::Vec<Subscriber, MAX_SUBSCRIBERS>,
    pub publish_count: u32,
}

impl Topic {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        !self.subscribers.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn contains(&self, server_id: u16) -> bool {
        self.subscribers.iter().any(|s| s.server_id == server_id)
    }

    /// Appends a subscriber at the end of the delivery order.
    pub fn subscribe(&mut self, server_id: u16, handler: Handler) -> Result<()> {
        if self.contains(server_id) {
            return Err(BrokerError::AlreadyExists {
                what: "subscription",
                id: server_id,
            });
        }
        self.subscribers
            .push(Subscriber { server_id, handler })
            .map_err(|_| BrokerError::NoMemory {
                table: "subscriber",
                max: MAX_SUBSCRIBERS,
            })
    }

    /// Removes a subscriber; later subscribers keep their relative order.
    pub fn unsubscribe(&mut self, server_id: u16) -> Result<()> {
        if !self.contains(server_id) {
            return Err(BrokerError::NotFound {
                what: "subscription",
                id: server_id,
            });
        }
        self.subscribers.retain(|s| s.server_id != server_id);
        Ok(())
    }

    pub fn handler_of(&self, server_id: u16) -> Option<Handler> {
        self.subscribers
            .iter()
            .find(|s| s.server_id == server_id)
            .map(|s| s.handler.clone())
    }

    /// Subscriber ids in delivery order.
    pub fn subscriber_ids(&self) -> heapless::Vec<u16, MAX_SUBSCRIBERS> {
        self.subscribers.iter().map(|s| s.server_id).collect()
    }
}

#[derive(Debug)]
pub struct TopicTable {
    slots: Box<[Topic]>,
}

impl Default for TopicTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicTable {
    pub fn new() -> Self {
        Self {
            slots: (0..MAX_TOPICS).map(|_| Topic::default()).collect(),
        }
    }

    /// Index of the active topic with this id.
    pub fn find(&self, topic_id: u16) -> Option<usize> {
        self.slots
            .iter()
            .position(|topic| topic.is_active() && topic.id == topic_id)
    }

    pub fn get(&self, topic_id: u16) -> Option<&Topic> {
        self.find(topic_id).map(|index| &self.slots[index])
    }

    pub fn get_mut(&mut self, topic_id: u16) -> Option<&mut Topic> {
        self.find(topic_id).map(|index| &mut self.slots[index])
    }

    /// Installs an empty topic, reusing a slot previously reserved for the same id.
    pub fn create(&mut self, topic_id: u16) -> Result<usize> {
        if self.find(topic_id).is_some() {
            return Err(BrokerError::AlreadyExists {
                what: "topic",
                id: topic_id,
            });
        }

        let index = self
            .slots
            .iter()
            .position(|topic| !topic.is_active() && topic.id == topic_id)
            .or_else(|| self.slots.iter().position(|topic| !topic.is_active()))
            .ok_or(BrokerError::NoMemory {
                table: "topic",
                max: MAX_TOPICS,
            })?;

        self.slots[index] = Topic::new(topic_id);
        Ok(index)
    }

    /// Active topic with this id, creating it when absent.
    pub fn get_or_create(&mut self, topic_id: u16) -> Result<&mut Topic> {
        let index = match self.find(topic_id) {
            Some(index) => index,
            None => self.create(topic_id)?,
        };
        Ok(&mut self.slots[index])
    }

    pub fn handler_of(&self, topic_id: u16, server_id: u16) -> Option<Handler> {
        self.get(topic_id).and_then(|topic| topic.handler_of(server_id))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|topic| topic.is_active()).count()
    }

    pub fn clear(&mut self) {
        self.slots
            .iter_mut()
            .for_each(|topic| *topic = Topic::default());
    }
}
