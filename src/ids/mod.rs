//! The `ids` module is the catalog of well-known identifiers shared by the
//! firmware domains: server ids, message kinds, topic ids, priority levels.
//!
//! None of these values are enforced by the broker. Domains are free to use any
//! non-zero server id and any kind or topic value; the `*_USER_BASE` constants mark
//! where application-defined ranges start.

pub mod names;

pub use names::{msg_name, server_name, topic_name};

/// Predefined server ids, one per system domain.
pub mod server {
    pub const SYSTEM: u16 = 0x0001;
    pub const POWER: u16 = 0x0002;
    pub const COMM: u16 = 0x0003;
    pub const SENSOR: u16 = 0x0004;
    pub const STORAGE: u16 = 0x0005;
    pub const DISPLAY: u16 = 0x0006;
    pub const NETWORK: u16 = 0x0007;
    pub const SECURITY: u16 = 0x0008;
    pub const TIMER: u16 = 0x0009;
    pub const LOG: u16 = 0x000A;
    pub const DEBUG: u16 = 0x000B;
    /// First id of the application-defined range.
    pub const USER_BASE: u16 = 0x0100;
}

/// Predefined message kinds, grouped by domain in 0x100 blocks.
pub mod msg {
    pub const SYSTEM_INIT: u16 = 0x0001;
    pub const SYSTEM_SHUTDOWN: u16 = 0x0002;
    pub const SYSTEM_RESET: u16 = 0x0003;
    pub const SYSTEM_STATUS: u16 = 0x0004;
    pub const SYSTEM_CONFIG: u16 = 0x0005;

    pub const POWER_ON: u16 = 0x0101;
    pub const POWER_OFF: u16 = 0x0102;
    pub const POWER_SLEEP: u16 = 0x0103;
    pub const POWER_WAKEUP: u16 = 0x0104;
    pub const POWER_BATTERY: u16 = 0x0105;

    pub const COMM_SEND: u16 = 0x0201;
    pub const COMM_RECEIVE: u16 = 0x0202;
    pub const COMM_CONNECT: u16 = 0x0203;
    pub const COMM_DISCONNECT: u16 = 0x0204;
    pub const COMM_STATUS: u16 = 0x0205;

    pub const SENSOR_DATA: u16 = 0x0301;
    pub const SENSOR_CALIBRATE: u16 = 0x0302;
    pub const SENSOR_CONFIG: u16 = 0x0303;
    pub const SENSOR_ALARM: u16 = 0x0304;

    pub const STORAGE_READ: u16 = 0x0401;
    pub const STORAGE_WRITE: u16 = 0x0402;
    pub const STORAGE_ERASE: u16 = 0x0403;
    pub const STORAGE_FORMAT: u16 = 0x0404;

    /// First kind of the application-defined range.
    pub const USER_BASE: u16 = 0x1000;
}

/// Reference topic ids for publish/subscribe.
pub mod topic {
    pub const SYSTEM_EVENT: u16 = 0x0001;
    pub const POWER_EVENT: u16 = 0x0002;
    pub const SENSOR_DATA: u16 = 0x0003;
    pub const NETWORK_EVENT: u16 = 0x0004;
    pub const ALARM_EVENT: u16 = 0x0005;
    pub const LOG_EVENT: u16 = 0x0006;
    /// First topic of the application-defined range.
    pub const USER_BASE: u16 = 0x0100;
}

/// Reference priority levels. Priority is carried on every message but never
/// changes delivery order.
pub mod priority {
    pub const LOW: u8 = 0;
    pub const NORMAL: u8 = 1;
    pub const HIGH: u8 = 2;
    pub const CRITICAL: u8 = 3;
}

#[cfg(test)]
mod tests;
