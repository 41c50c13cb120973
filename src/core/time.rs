//! Wall-clock arithmetic over HH:mm strings.
//!
//! Shift windows and punch times are stored as plain 24-hour HH:mm strings,
//! never timezone-aware timestamps; all arithmetic happens on minute-of-day.

/// Parses an HH:mm string into minutes since midnight.
/// Returns `None` for anything outside 00:00..=23:59 or malformed input.
pub fn minute_of_day(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn is_valid_time(s: &str) -> bool {
    minute_of_day(s).is_some()
}

/// Elapsed hours between two HH:mm times as a fraction.
///
/// When `end` is numerically earlier than `start` the span is assumed to cross
/// midnight (a night shift) and 24 hours are added before subtracting, so the
/// result is always non-negative. Unparseable input yields 0.0.
pub fn elapsed_hours(start: &str, end: &str) -> f64 {
    let (Some(start_min), Some(end_min)) = (minute_of_day(start), minute_of_day(end)) else {
        return 0.0;
    };
    let span = if end_min < start_min {
        end_min + 24 * 60 - start_min
    } else {
        end_min - start_min
    };
    span as f64 / 60.0
}

/// Strict lateness check: late iff the actual check-in minute-of-day exceeds
/// the scheduled start minute-of-day. No grace period.
///
/// Known limitation kept for compatibility with historical data: for a shift
/// scheduled to start late in the evening (e.g. 22:00), a check-in shortly
/// after midnight compares as earlier in the day and is not flagged late.
pub fn is_late(actual_in: &str, scheduled_start: &str) -> bool {
    match (minute_of_day(actual_in), minute_of_day(scheduled_start)) {
        (Some(actual), Some(scheduled)) => actual > scheduled,
        _ => false,
    }
}

/// Minutes of delay past the scheduled start; 0 when on time or unparseable.
pub fn delay_minutes(actual_in: &str, scheduled_start: &str) -> u32 {
    match (minute_of_day(actual_in), minute_of_day(scheduled_start)) {
        (Some(actual), Some(scheduled)) if actual > scheduled => actual - scheduled,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(minute_of_day("00:00"), Some(0));
        assert_eq!(minute_of_day("09:05"), Some(545));
        assert_eq!(minute_of_day("23:59"), Some(1439));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["24:00", "09:60", "9:00", "09:5", "0900", "", "ab:cd", "09:00:00"] {
            assert!(!is_valid_time(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn same_day_span() {
        assert_eq!(elapsed_hours("09:00", "18:00"), 9.0);
        assert_eq!(elapsed_hours("09:00", "09:30"), 0.5);
        assert_eq!(elapsed_hours("09:00", "09:00"), 0.0);
    }

    #[test]
    fn overnight_span_wraps() {
        assert_eq!(elapsed_hours("22:00", "06:00"), 8.0);
        assert_eq!(elapsed_hours("23:30", "00:15"), 0.75);
    }

    #[test]
    fn lateness_is_strict_minute_comparison() {
        assert!(!is_late("09:00", "09:00"));
        assert!(is_late("09:01", "09:00"));
        assert!(!is_late("08:59", "09:00"));
    }

    #[test]
    fn overnight_shift_lateness_limitation_preserved() {
        // Check-in after midnight against a 22:00 start reads as early.
        assert!(!is_late("00:10", "22:00"));
    }

    #[test]
    fn delay_minutes_only_when_late() {
        assert_eq!(delay_minutes("09:10", "09:00"), 10);
        assert_eq!(delay_minutes("09:00", "09:00"), 0);
        assert_eq!(delay_minutes("08:00", "09:00"), 0);
    }
}
