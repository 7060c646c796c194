//! Core shared library for the Pulse telemetry emitter.
//!
//! This crate exposes the primitives the agent depends on: configuration
//! loading, interval-grammar parsing, the common error types, the reading
//! payload and its synthetic value source, and logging setup.

pub mod config;
pub mod errors;
pub mod interval;
pub mod logging;
pub mod reading;

pub use config::{AgentConfig, ClientEntry, ClientSpec, DeliveryMode};
pub use errors::{ConfigError, PulseError, Result as CoreResult};
pub use interval::parse_interval;
pub use reading::{Reading, SyntheticSource, ValueSource};
