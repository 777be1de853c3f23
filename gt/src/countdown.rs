//! Countdown computation and display timing
//!
//! Remaining time is derived from a goal's deadline and the current time.
//! [`CountdownClock`] decides when the display should be recomputed, so the
//! UI can redraw the countdown on a fixed cadence without blocking input.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};

/// Default countdown refresh cadence
pub const DEFAULT_COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// Label shown once a deadline has passed
pub const EXPIRED_LABEL: &str = "Time's up!";

/// Time left until a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Left(Duration),
    Expired,
}

/// Time left between `now` and `end_time`
pub fn remaining<Tz: TimeZone>(end_time: &DateTime<Tz>, now: &DateTime<Tz>) -> Remaining {
    match end_time.clone().signed_duration_since(now.clone()).to_std() {
        Ok(left) if !left.is_zero() => Remaining::Left(left),
        _ => Remaining::Expired,
    }
}

/// Render remaining time as `HH:MM:SS`, or the expiry label
pub fn format_remaining(remaining: Remaining) -> String {
    match remaining {
        Remaining::Left(left) => {
            let total = left.as_secs();
            let hours = total / 3600;
            let minutes = (total % 3600) / 60;
            let seconds = total % 60;
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        }
        Remaining::Expired => EXPIRED_LABEL.to_string(),
    }
}

/// Render a timestamp as 12-hour clock time, e.g. `03:45 PM`
pub fn format_clock(time: &DateTime<Local>) -> String {
    time.format("%I:%M %p").to_string()
}

/// Decides when the countdown display is due for a recompute
#[derive(Debug, Clone)]
pub struct CountdownClock {
    interval: Duration,
    last: Option<Instant>,
}

impl CountdownClock {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True (and resets the clock) when the interval has elapsed since the
    /// last recompute, or when nothing has been computed yet
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Make the next [`CountdownClock::due`] call return true
    pub fn force(&mut self) {
        self.last = None;
    }
}

impl Default for CountdownClock {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_remaining_left_and_expired() {
        let now = Local::now();
        let end = now + TimeDelta::seconds(90);

        assert_eq!(remaining(&end, &now), Remaining::Left(Duration::from_secs(90)));
        assert_eq!(remaining(&now, &now), Remaining::Expired);
        assert_eq!(remaining(&now, &end), Remaining::Expired);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Remaining::Left(Duration::from_secs(0))), "00:00:00");
        assert_eq!(format_remaining(Remaining::Left(Duration::from_secs(65))), "00:01:05");
        assert_eq!(format_remaining(Remaining::Left(Duration::from_secs(45 * 60))), "00:45:00");
        assert_eq!(
            format_remaining(Remaining::Left(Duration::from_millis(5_400_999))),
            "01:30:00"
        );
        assert_eq!(format_remaining(Remaining::Left(Duration::from_secs(26 * 3600))), "26:00:00");
        assert_eq!(format_remaining(Remaining::Expired), "Time's up!");
    }

    #[test]
    fn test_format_clock() {
        let time = Local.with_ymd_and_hms(2026, 10, 19, 15, 5, 0).unwrap();
        assert_eq!(format_clock(&time), "03:05 PM");

        let time = Local.with_ymd_and_hms(2026, 10, 19, 0, 30, 0).unwrap();
        assert_eq!(format_clock(&time), "12:30 AM");
    }

    #[test]
    fn test_countdown_clock_cadence() {
        let mut clock = CountdownClock::new(Duration::from_secs(1));
        let start = Instant::now();

        assert!(clock.due(start));
        assert!(!clock.due(start + Duration::from_millis(500)));
        assert!(clock.due(start + Duration::from_millis(1000)));
        assert!(!clock.due(start + Duration::from_millis(1500)));

        clock.force();
        assert!(clock.due(start + Duration::from_millis(1600)));
    }
}
