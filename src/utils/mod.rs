//! The `utils` module provides the pieces shared by every other module of
//! `fixbus`: the broker error type and logging setup.

pub mod error;
pub mod logging;

pub use error::{BrokerError, ErrorKind, Result};

#[cfg(test)]
mod tests {
    use super::error::{BrokerError, ErrorKind};
    use super::logging;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("warn");
    }

    #[test]
    fn parse_level_falls_back_to_info() {
        assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
        assert_eq!(logging::parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(logging::parse_level("chatty"), tracing::Level::INFO);
    }

    #[test]
    fn error_codes_follow_taxonomy() {
        assert_eq!(BrokerError::NotInitialized.code(), -1);
        assert_eq!(BrokerError::NoHandler { server: 3 }.code(), -1);
        assert_eq!(BrokerError::InvalidParam { reason: "x" }.code(), -2);
        assert_eq!(
            BrokerError::NoMemory {
                table: "server",
                max: 16
            }
            .code(),
            -3
        );
        assert_eq!(BrokerError::QueueFull { server: 1, depth: 32 }.code(), -4);
        assert_eq!(BrokerError::NotFound { what: "topic", id: 9 }.code(), -5);
        assert_eq!(BrokerError::Timeout { waited: 50 }.code(), -6);
        assert_eq!(
            BrokerError::AlreadyExists {
                what: "server",
                id: 2
            }
            .kind(),
            ErrorKind::AlreadyExists
        );
    }

    #[test]
    fn error_messages_show_hex_ids() {
        let err = BrokerError::NotFound {
            what: "server",
            id: 0x0104,
        };
        assert_eq!(err.to_string(), "server 0x0104 not found");
    }
}
