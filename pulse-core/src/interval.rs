use std::time::Duration;

use crate::errors::ConfigError;

/// Parses a textual cadence such as `"500ms"`, `"30s"`, `"5m"` or `"1h"`
/// into a duration.
///
/// The grammar is `\d+(ms|s|m|h)`. Anything else is a configuration error;
/// the caller treats that as fatal.
pub fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let trimmed = raw.trim();

    // `ms` must be tried before the bare `s` suffix.
    let (digits, multiplier) = if let Some(count) = trimmed.strip_suffix("ms") {
        (count, 1u64)
    } else if let Some(count) = trimmed.strip_suffix('s') {
        (count, 1_000)
    } else if let Some(count) = trimmed.strip_suffix('m') {
        (count, 60_000)
    } else if let Some(count) = trimmed.strip_suffix('h') {
        (count, 3_600_000)
    } else {
        return Err(ConfigError::InvalidInterval {
            value: raw.to_string(),
            reason: "unrecognized unit suffix, expected one of ms, s, m, h",
        });
    };

    let count: u64 = digits.parse().map_err(|_| ConfigError::InvalidInterval {
        value: raw.to_string(),
        reason: "expected an integer count before the unit",
    })?;

    if count == 0 {
        return Err(ConfigError::InvalidInterval {
            value: raw.to_string(),
            reason: "interval must be positive",
        });
    }

    let millis = count
        .checked_mul(multiplier)
        .ok_or(ConfigError::InvalidInterval {
            value: raw.to_string(),
            reason: "interval overflows the millisecond range",
        })?;

    Ok(Duration::from_millis(millis))
}
