use super::names::priority_name;
use super::{msg, msg_name, server, server_name, topic, topic_name};

#[test]
fn test_server_names() {
    assert_eq!(server_name(server::SYSTEM), "SYSTEM");
    assert_eq!(server_name(server::SENSOR), "SENSOR");
    assert_eq!(server_name(server::DEBUG), "DEBUG");
    assert_eq!(server_name(server::USER_BASE + 1), "UNKNOWN");
    assert_eq!(server_name(0), "UNKNOWN");
}

#[test]
fn test_msg_names() {
    assert_eq!(msg_name(msg::POWER_ON), "POWER_ON");
    assert_eq!(msg_name(msg::SENSOR_CALIBRATE), "SENSOR_CALIBRATE");
    assert_eq!(msg_name(msg::STORAGE_FORMAT), "STORAGE_FORMAT");
    assert_eq!(msg_name(msg::USER_BASE), "UNKNOWN");
}

#[test]
fn test_topic_names() {
    assert_eq!(topic_name(topic::SENSOR_DATA), "SENSOR_DATA");
    assert_eq!(topic_name(topic::LOG_EVENT), "LOG_EVENT");
    assert_eq!(topic_name(0xBEEF), "UNKNOWN");
}

#[test]
fn test_priority_names() {
    assert_eq!(priority_name(0), "LOW");
    assert_eq!(priority_name(3), "CRITICAL");
    assert_eq!(priority_name(7), "UNKNOWN");
}

#[test]
fn test_domain_ranges_do_not_overlap() {
    // Message kinds are grouped in 0x100 blocks per domain.
    assert_eq!(msg::POWER_ON >> 8, 0x01);
    assert_eq!(msg::COMM_SEND >> 8, 0x02);
    assert_eq!(msg::SENSOR_DATA >> 8, 0x03);
    assert_eq!(msg::STORAGE_READ >> 8, 0x04);
}
