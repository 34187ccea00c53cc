//! Conversion between wall-clock times and hour offsets from the simulation origin.

use crate::error::{PKError, PKResult};
use chrono::{Duration, NaiveTime};

const CLOCK_FORMAT: &str = "%H:%M";

pub fn parse_clock(value: &str) -> PKResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT).map_err(|e| {
        PKError::Validation(format!("Invalid clock time '{}' (expected HH:MM): {}", value, e))
    })
}

/// Hours from `origin` until the next occurrence of `time`. Times earlier
/// than the origin fall on the following day.
pub fn hours_since(origin: NaiveTime, time: NaiveTime) -> f64 {
    let mut seconds = time.signed_duration_since(origin).num_seconds();
    if seconds < 0 {
        seconds += 24 * 3600;
    }
    seconds as f64 / 3600.0
}

pub fn offset_of(origin: NaiveTime, value: &str) -> PKResult<f64> {
    Ok(hours_since(origin, parse_clock(value)?))
}

/// Wall-clock label for an hour offset, wrapping past midnight.
pub fn label(origin: NaiveTime, offset_hours: f64) -> String {
    let seconds = (offset_hours * 3600.0).round() as i64;
    let (time, _) = origin.overflowing_add_signed(Duration::seconds(seconds));
    time.format(CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_from_origin() {
        let origin = parse_clock("00:00").unwrap();
        assert_eq!(offset_of(origin, "08:00").unwrap(), 8.0);
        assert_eq!(offset_of(origin, "22:30").unwrap(), 22.5);

        let morning = parse_clock("07:00").unwrap();
        assert_eq!(offset_of(morning, "07:00").unwrap(), 0.0);
        assert_eq!(offset_of(morning, "06:00").unwrap(), 23.0);
        assert_eq!(offset_of(morning, "01:15").unwrap(), 18.25);
    }

    #[test]
    fn test_labels_wrap_midnight() {
        let origin = parse_clock("08:00").unwrap();
        assert_eq!(label(origin, 0.0), "08:00");
        assert_eq!(label(origin, 2.25), "10:15");
        assert_eq!(label(origin, 17.0), "01:00");
    }

    #[test]
    fn test_rejects_malformed_time() {
        assert!(matches!(parse_clock("25:00"), Err(PKError::Validation(_))));
        assert!(parse_clock("eight").is_err());
    }
}
