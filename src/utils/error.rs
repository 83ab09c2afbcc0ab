//! The `error` module defines the error type returned by every broker operation.
//!
//! Errors are plain values: the broker never panics on a bad call, and a failed
//! operation leaves the instance fully usable. Each variant belongs to one of the
//! classes in [`ErrorKind`], and [`BrokerError::code`] gives the classic integer
//! return code for callers that log or forward numeric statuses.

use thiserror::Error;

/// Broad classification of a [`BrokerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Not initialized, or the target server has no handler.
    General,
    InvalidParam,
    NoMemory,
    QueueFull,
    NotFound,
    Timeout,
    AlreadyExists,
}

/// Errors reported by the broker.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    /// The broker was never initialized, or has been deinitialized.
    #[error("broker is not initialized")]
    NotInitialized,

    /// `process` was called on a server registered without a default handler.
    #[error("server {server:#06x} has no default handler")]
    NoHandler {
        /// Server that was asked to process its queue
        server: u16,
    },

    /// A zero id, an oversized payload or a missing handler.
    #[error("invalid parameter: {reason}")]
    InvalidParam {
        /// Which precondition was violated
        reason: &'static str,
    },

    /// A bounded table has no free slot.
    #[error("no free {table} slot (max {max})")]
    NoMemory {
        /// Name of the exhausted table
        table: &'static str,
        /// Capacity of that table
        max: usize,
    },

    /// The destination queue is at capacity; the message was dropped.
    #[error("queue of server {server:#06x} is full (depth {depth})")]
    QueueFull {
        /// Destination server
        server: u16,
        /// Queue capacity
        depth: usize,
    },

    /// Unknown server, topic or subscription.
    #[error("{what} {id:#06x} not found")]
    NotFound {
        /// Kind of object that was looked up
        what: &'static str,
        /// Identifier that was looked up
        id: u16,
    },

    /// A request did not receive a reply in time.
    #[error("request timed out after {waited} ticks")]
    Timeout {
        /// Time spent waiting, in clock ticks or milliseconds
        waited: u64,
    },

    /// Duplicate registration, subscription or topic.
    #[error("{what} {id:#06x} already exists")]
    AlreadyExists {
        /// Kind of object that already exists
        what: &'static str,
        /// Conflicting identifier
        id: u16,
    },
}

impl BrokerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrokerError::NotInitialized | BrokerError::NoHandler { .. } => ErrorKind::General,
            BrokerError::InvalidParam { .. } => ErrorKind::InvalidParam,
            BrokerError::NoMemory { .. } => ErrorKind::NoMemory,
            BrokerError::QueueFull { .. } => ErrorKind::QueueFull,
            BrokerError::NotFound { .. } => ErrorKind::NotFound,
            BrokerError::Timeout { .. } => ErrorKind::Timeout,
            BrokerError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
        }
    }

    /// Integer status code for this error. Success is `0`.
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::General => -1,
            ErrorKind::InvalidParam => -2,
            ErrorKind::NoMemory => -3,
            ErrorKind::QueueFull => -4,
            ErrorKind::NotFound => -5,
            ErrorKind::Timeout => -6,
            ErrorKind::AlreadyExists => -7,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BrokerError>;
