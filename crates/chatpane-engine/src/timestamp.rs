//! Hour:minute timestamps and the clocks that produce them.

use chrono::{Local, Timelike};
use thiserror::Error;

/// Wall-clock time of day at minute resolution, shown as `HH:MM` (24-hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    hour: u8,
    minute: u8,
}

impl Timestamp {
    /// Create a timestamp, rejecting hours past 23 and minutes past 59.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            hour: u8::try_from(hour).ok()?,
            minute: u8::try_from(minute).ok()?,
        })
    }

    /// Truncate any chrono time value to hour and minute.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono guarantees hour() < 24 and minute() < 60.
        Self {
            hour: u8::try_from(time.hour()).unwrap_or(0),
            minute: u8::try_from(time.minute()).unwrap_or(0),
        }
    }

    pub fn hour(self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minute)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Error parsing an `HH:MM` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {0:?}, expected HH:MM")]
pub struct ParseTimestampError(String);

impl std::str::FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimestampError(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(err)?;
        let two_digits =
            |field: &str| field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(err());
        }
        let hour = hour.parse().map_err(|_| err())?;
        let minute = minute.parse().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }
}

/// Source of the current time of day.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_time(&Local::now())
    }
}

/// Clock stuck at one time. Used by tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> Timestamp,
{
    fn now(&self) -> Timestamp {
        self()
    }
}
