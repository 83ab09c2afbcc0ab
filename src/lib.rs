//! # fixbus
//!
//! `fixbus` is an in-process message broker for firmware-style systems. Fixed
//! domains (power, comms, sensors, storage, ...) register as servers and talk to
//! each other through bounded per-server queues, topic fan-out and
//! request/response, without ever allocating after start-up.
//!
//! ## Core Modules
//!
//! - `broker`: server registry, inbound queues, topics, delivery and statistics.
//! - `config`: loads runtime settings from `config/default` and `FIXBUS__*` variables.
//! - `ids`: well-known server ids, message kinds, topic ids and priority levels.
//! - `utils`: error type and logging setup.

pub mod broker;
pub mod config;
pub mod ids;
pub mod utils;

#[cfg(test)]
mod tests;
