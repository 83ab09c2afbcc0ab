use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Table sizes (servers, topics, queue depth, payload size) are compile-time
/// constants in [`crate::broker`].
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub broker: BrokerSettings,
}

/// Configuration settings for logging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Which tick source the broker is built with.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Milliseconds since start-up.
    System,
    /// Counter advanced on every read.
    Tick,
}

/// Configuration settings for the broker runtime.
///
/// Controls request timeouts, the processing batch size and the clock.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    pub request_timeout_ms: u64,
    /// Messages handled per `process` call, `0` drains the queue.
    pub process_batch: u16,
    pub clock: ClockKind,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub logging: Option<PartialLoggingSettings>,
    pub broker: Option<PartialBrokerSettings>,
}

/// Partial logging settings.
#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Partial broker settings.
#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub request_timeout_ms: Option<u64>,
    pub process_batch: Option<u16>,
    pub clock: Option<ClockKind>,
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings {
                level: "info".to_string(),
            },
            broker: BrokerSettings {
                request_timeout_ms: 500,
                process_batch: 0,
                clock: ClockKind::System,
            },
        }
    }
}
