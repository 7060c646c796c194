use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};

/// Alignment class of a cadence.
///
/// Only the two exact boundary durations get wall-clock alignment; every
/// other cadence fires immediately and re-arms on its fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceClass {
    SubMinute,
    Minute,
    Hour,
}

impl CadenceClass {
    pub fn classify(cadence: Duration) -> Self {
        match cadence.as_millis() {
            3_600_000 => CadenceClass::Hour,
            60_000 => CadenceClass::Minute,
            _ => CadenceClass::SubMinute,
        }
    }
}

/// Timestamp to label the next reading with: the start of the interval the
/// reading represents (floor of `now`), not the instant it fires.
pub fn label_timestamp(class: CadenceClass, now: DateTime<Utc>) -> DateTime<Utc> {
    match class {
        CadenceClass::SubMinute => now,
        CadenceClass::Minute => truncate_to_minute(now),
        CadenceClass::Hour => truncate_to_hour(now),
    }
}

/// Delay until the next aligned boundary for the class.
///
/// An instant already exactly on its boundary is due now (zero delay); the
/// label floors while the delay targets the next rollover.
pub fn delay_to_boundary(class: CadenceClass, now: DateTime<Utc>) -> Duration {
    let step = match class {
        CadenceClass::SubMinute => return Duration::ZERO,
        CadenceClass::Minute => chrono::Duration::minutes(1),
        CadenceClass::Hour => chrono::Duration::hours(1),
    };

    let floor = label_timestamp(class, now);
    if floor == now {
        return Duration::ZERO;
    }

    (floor + step - now).to_std().unwrap_or_default()
}

fn truncate_to_minute(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

fn truncate_to_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    truncate_to_minute(now)
        .with_minute(0)
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s)
            .unwrap()
            .with_nanosecond(ms * 1_000_000)
            .unwrap()
    }

    #[test]
    fn classifies_only_the_exact_boundary_durations() {
        assert_eq!(
            CadenceClass::classify(Duration::from_millis(60_000)),
            CadenceClass::Minute
        );
        assert_eq!(
            CadenceClass::classify(Duration::from_millis(3_600_000)),
            CadenceClass::Hour
        );
        assert_eq!(
            CadenceClass::classify(Duration::from_millis(500)),
            CadenceClass::SubMinute
        );
        // Near misses are not aligned.
        assert_eq!(
            CadenceClass::classify(Duration::from_millis(59_999)),
            CadenceClass::SubMinute
        );
        assert_eq!(
            CadenceClass::classify(Duration::from_millis(120_000)),
            CadenceClass::SubMinute
        );
    }

    #[test]
    fn minute_cadence_truncates_label_to_the_minute() {
        let now = at(12, 34, 56, 789);
        assert_eq!(
            label_timestamp(CadenceClass::Minute, now),
            at(12, 34, 0, 0)
        );
    }

    #[test]
    fn minute_cadence_delay_targets_the_next_rollover() {
        let now = at(12, 34, 56, 789);
        assert_eq!(
            delay_to_boundary(CadenceClass::Minute, now),
            Duration::from_millis(3_211)
        );
    }

    #[test]
    fn hour_cadence_truncates_label_to_the_hour() {
        let now = at(12, 34, 56, 789);
        assert_eq!(label_timestamp(CadenceClass::Hour, now), at(12, 0, 0, 0));
    }

    #[test]
    fn hour_cadence_delay_targets_the_next_rollover() {
        let now = at(12, 34, 56, 789);
        // Remaining until 13:00:00.000.
        assert_eq!(
            delay_to_boundary(CadenceClass::Hour, now),
            Duration::from_millis(25 * 60_000 + 3_211)
        );
    }

    #[test]
    fn exact_boundaries_are_due_now() {
        assert_eq!(
            delay_to_boundary(CadenceClass::Minute, at(12, 35, 0, 0)),
            Duration::ZERO
        );
        assert_eq!(
            delay_to_boundary(CadenceClass::Hour, at(12, 0, 0, 0)),
            Duration::ZERO
        );
    }

    #[test]
    fn minute_boundary_is_not_an_hour_boundary() {
        let now = at(12, 35, 0, 0);
        assert_eq!(
            delay_to_boundary(CadenceClass::Hour, now),
            Duration::from_millis(25 * 60_000)
        );
    }

    #[test]
    fn sub_minute_cadence_never_aligns() {
        let now = at(12, 34, 56, 789);
        assert_eq!(label_timestamp(CadenceClass::SubMinute, now), now);
        assert_eq!(
            delay_to_boundary(CadenceClass::SubMinute, now),
            Duration::ZERO
        );
    }
}
