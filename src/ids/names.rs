//! Human-readable names for catalogued identifiers, for log lines only.

use super::{msg, priority, server, topic};

const UNKNOWN: &str = "UNKNOWN";

pub fn server_name(server_id: u16) -> &'static str {
    match server_id {
        server::SYSTEM => "SYSTEM",
        server::POWER => "POWER",
        server::COMM => "COMM",
        server::SENSOR => "SENSOR",
        server::STORAGE => "STORAGE",
        server::DISPLAY => "DISPLAY",
        server::NETWORK => "NETWORK",
        server::SECURITY => "SECURITY",
        server::TIMER => "TIMER",
        server::LOG => "LOG",
        server::DEBUG => "DEBUG",
        _ => UNKNOWN,
    }
}

pub fn msg_name(msg_kind: u16) -> &'static str {
    match msg_kind {
        msg::SYSTEM_INIT => "SYSTEM_INIT",
        msg::SYSTEM_SHUTDOWN => "SYSTEM_SHUTDOWN",
        msg::SYSTEM_RESET => "SYSTEM_RESET",
        msg::SYSTEM_STATUS => "SYSTEM_STATUS",
        msg::SYSTEM_CONFIG => "SYSTEM_CONFIG",
        msg::POWER_ON => "POWER_ON",
        msg::POWER_OFF => "POWER_OFF",
        msg::POWER_SLEEP => "POWER_SLEEP",
        msg::POWER_WAKEUP => "POWER_WAKEUP",
        msg::POWER_BATTERY => "POWER_BATTERY",
        msg::COMM_SEND => "COMM_SEND",
        msg::COMM_RECEIVE => "COMM_RECEIVE",
        msg::COMM_CONNECT => "COMM_CONNECT",
        msg::COMM_DISCONNECT => "COMM_DISCONNECT",
        msg::COMM_STATUS => "COMM_STATUS",
        msg::SENSOR_DATA => "SENSOR_DATA",
        msg::SENSOR_CALIBRATE => "SENSOR_CALIBRATE",
        msg::SENSOR_CONFIG => "SENSOR_CONFIG",
        msg::SENSOR_ALARM => "SENSOR_ALARM",
        msg::STORAGE_READ => "STORAGE_READ",
        msg::STORAGE_WRITE => "STORAGE_WRITE",
        msg::STORAGE_ERASE => "STORAGE_ERASE",
        msg::STORAGE_FORMAT => "STORAGE_FORMAT",
        _ => UNKNOWN,
    }
}

pub fn topic_name(topic_id: u16) -> &'static str {
    match topic_id {
        topic::SYSTEM_EVENT => "SYSTEM_EVENT",
        topic::POWER_EVENT => "POWER_EVENT",
        topic::SENSOR_DATA => "SENSOR_DATA",
        topic::NETWORK_EVENT => "NETWORK_EVENT",
        topic::ALARM_EVENT => "ALARM_EVENT",
        topic::LOG_EVENT => "LOG_EVENT",
        _ => UNKNOWN,
    }
}

pub fn priority_name(level: u8) -> &'static str {
    match level {
        priority::LOW => "LOW",
        priority::NORMAL => "NORMAL",
        priority::HIGH => "HIGH",
        priority::CRITICAL => "CRITICAL",
        _ => UNKNOWN,
    }
}
