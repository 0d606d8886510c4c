//! Clock times as shown on the results page.
//!
//! Times are compared as plain `(hour, minute)` tuples. No range check is
//! applied: the only use is deciding whether arrival rolls over to the
//! next day.

use std::cmp::Ordering;

/// Error returned when a clock string is not `H:M`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time {input:?}: {reason}")]
pub struct ClockError {
    input: String,
    reason: &'static str,
}

impl ClockError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// An `(hour, minute)` pair, ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Parse `"HH:MM"`. Exactly one colon, both sides decimal.
    pub fn parse(s: &str) -> Result<Self, ClockError> {
        let mut parts = s.split(':');
        let (Some(hour), Some(minute), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ClockError::new(s, "expected exactly one ':'"));
        };

        let hour = hour
            .trim()
            .parse()
            .map_err(|_| ClockError::new(s, "invalid hour"))?;
        let minute = minute
            .trim()
            .parse()
            .map_err(|_| ClockError::new(s, "invalid minute"))?;

        Ok(Self { hour, minute })
    }
}

/// Whether a train arriving at `arrival` after departing at `departure`
/// is assumed to arrive the next calendar day.
///
/// Journeys longer than 24 hours are not detected.
pub fn arrives_next_day(departure: ClockTime, arrival: ClockTime) -> bool {
    arrival.cmp(&departure) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> ClockTime {
        ClockTime { hour, minute }
    }

    #[test]
    fn parse_valid() {
        assert_eq!(ClockTime::parse("22:10").unwrap(), t(22, 10));
        assert_eq!(ClockTime::parse("05:30").unwrap(), t(5, 30));
        assert_eq!(ClockTime::parse("5:3").unwrap(), t(5, 3));
        assert_eq!(ClockTime::parse(" 07 : 45 ").unwrap(), t(7, 45));
    }

    #[test]
    fn parse_invalid() {
        assert!(ClockTime::parse("N/A").is_err());
        assert!(ClockTime::parse("").is_err());
        assert!(ClockTime::parse("2210").is_err());
        assert!(ClockTime::parse("22:10:00").is_err());
        assert!(ClockTime::parse("ab:cd").is_err());
        assert!(ClockTime::parse("22:").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(t(5, 30) < t(22, 10));
        assert!(t(22, 9) < t(22, 10));
        assert!(t(22, 10) == t(22, 10));
    }

    #[test]
    fn next_day_only_when_strictly_earlier() {
        assert!(arrives_next_day(t(22, 10), t(5, 30)));
        assert!(!arrives_next_day(t(5, 30), t(22, 10)));
        assert!(!arrives_next_day(t(12, 0), t(12, 0)));
    }

    #[test]
    fn error_display() {
        let err = ClockTime::parse("N/A").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid clock time \"N/A\": expected exactly one ':'"
        );
    }
}
