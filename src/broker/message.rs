//! Message definitions for the broker
//!
//! `Message` is the value handed from producers to consumers. It is built once by
//! the broker on `send`/`publish` and copied by value into queues and callbacks, so
//! nothing a caller owns is ever aliased by a queued message.
//!
//! Notes on fields:
//! - `kind`: caller-defined message code (see `crate::ids::msg`)
//! - `src` / `dst`: server ids; `0` means unset, `dst` is unused for publish
//! - `topic`: topic id for publish, unused for point-to-point
//! - `priority`: advisory metadata, never used to reorder delivery
//! - `flags`: informational bitset, not enforced by the broker
//! - `seq`: per-broker sequence number, wraps at `u16::MAX`
//! - `timestamp`: tick read from the broker's clock when the message was built

use super::MAX_PAYLOAD;
use crate::utils::error::{BrokerError, Result};

/// Bounded payload buffer. Its capacity is the broker-wide payload limit.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD>;

/// Message flag bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MessageFlags(u8);

impl MessageFlags {
    pub const NONE: Self = Self(0x00);
    pub const ACK_REQUIRED: Self = Self(0x01);
    /// Set on every message produced by `publish`.
    pub const BROADCAST: Self = Self(0x02);
    pub const PERSISTENT: Self = Self(0x04);
    pub const ENCRYPTED: Self = Self(0x08);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for MessageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub kind: u16,
    pub src: u16,
    pub dst: u16,
    pub topic: u16,
    pub priority: u8,
    pub flags: MessageFlags,
    pub seq: u16,
    pub timestamp: u32,
    pub payload: Payload,
}

impl Message {
    /// Builds a message of the given kind with a copy of `payload`.
    ///
    /// Fails with `InvalidParam` if the payload exceeds [`MAX_PAYLOAD`] bytes.
    pub fn new(kind: u16, payload: &[u8]) -> Result<Self> {
        let payload = Payload::from_slice(payload).map_err(|_| BrokerError::InvalidParam {
            reason: "payload exceeds maximum size",
        })?;
        Ok(Self {
            kind,
            payload,
            ..Self::default()
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_len(&self) -> u16 {
        // bounded by MAX_PAYLOAD, which fits in u16
        self.payload.len() as u16
    }

    pub fn is_broadcast(&self) -> bool {
        self.flags.contains(MessageFlags::BROADCAST)
    }
}
