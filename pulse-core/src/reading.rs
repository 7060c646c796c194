use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One telemetry sample, labelled with its aligned wall-clock timestamp.
///
/// A reading is created fresh at each tick, serialized and discarded; it
/// carries no identity beyond the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub is_valid: bool,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value,
            // Always true today; hook for future invalidation logic.
            is_valid: true,
        }
    }

    /// Serializes the reading as one newline-terminated JSON record.
    pub fn to_ndjson_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Source of measurement values, one sample per tick.
///
/// Stateless and safely shared between all client runners.
pub trait ValueSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Synthetic generator standing in for a real measurement source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

impl ValueSource for SyntheticSource {
    fn sample(&self) -> f64 {
        let raw: f64 = rand::thread_rng().gen_range(0.0..100.0);
        (raw * 100.0).round() / 100.0
    }
}
