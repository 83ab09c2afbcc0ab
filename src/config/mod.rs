mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{BrokerSettings, ClockKind, LoggingSettings, Settings};

/// Environment variable prefix, e.g. `FIXBUS__BROKER__PROCESS_BATCH=4`.
pub const ENV_PREFIX: &str = "FIXBUS";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the logging and broker configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(merge(partial, Settings::default()))
}

fn merge(partial: PartialSettings, default: Settings) -> Settings {
    let logging = partial.logging;
    let broker = partial.broker;

    Settings {
        logging: LoggingSettings {
            level: logging
                .and_then(|l| l.level)
                .unwrap_or(default.logging.level),
        },
        broker: BrokerSettings {
            request_timeout_ms: broker
                .as_ref()
                .and_then(|b| b.request_timeout_ms)
                .unwrap_or(default.broker.request_timeout_ms),
            process_batch: broker
                .as_ref()
                .and_then(|b| b.process_batch)
                .unwrap_or(default.broker.process_batch),
            clock: broker
                .as_ref()
                .and_then(|b| b.clock)
                .unwrap_or(default.broker.clock),
        },
    }
}

#[cfg(test)]
mod tests;
