//! Time-of-day and waking window model.
//!
//! # Responsibility
//! - Represent wall-clock times as minutes since midnight.
//! - Parse the persisted `HH:MM` and legacy `hh:mm AM|PM` shapes.
//!
//! # Invariants
//! - `TimeOfDay` is always within `00:00..=23:59`.
//! - `WakingWindow` is constructed only when `wake_time < bed_time`.
//!   Windows that wrap past midnight are rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MINUTES_PER_HOUR: u16 = 60;
const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?:\s*([AaPp])\.?\s*[Mm]\.?)?$")
        .expect("valid time-of-day regex")
});

/// Wall-clock time within one calendar day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Builds a time from hour and minute, rejecting out-of-range parts.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour > 23 || minute > 59 {
            return Err(TimeParseError::OutOfRange { hour, minute });
        }
        Ok(Self {
            minutes: u16::from(hour) * MINUTES_PER_HOUR + u16::from(minute),
        })
    }

    /// Caller guarantees `minutes < 24 * 60`.
    pub(crate) fn from_minutes_within_day(minutes: u16) -> Self {
        debug_assert!(minutes < MINUTES_PER_DAY);
        Self { minutes }
    }

    pub fn hour(self) -> u8 {
        (self.minutes / MINUTES_PER_HOUR) as u8
    }

    pub fn minute(self) -> u8 {
        (self.minutes % MINUTES_PER_HOUR) as u8
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    /// Accepts `HH:MM` (24-hour) and `hh:mm AM|PM` (12-hour).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = TIME_OF_DAY_RE
            .captures(trimmed)
            .ok_or_else(|| TimeParseError::Malformed(trimmed.to_string()))?;

        let hour: u8 = captures[1]
            .parse()
            .map_err(|_| TimeParseError::Malformed(trimmed.to_string()))?;
        let minute: u8 = captures[2]
            .parse()
            .map_err(|_| TimeParseError::Malformed(trimmed.to_string()))?;

        let hour = match captures.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
            None => hour,
            Some(meridiem) => {
                if !(1..=12).contains(&hour) {
                    return Err(TimeParseError::OutOfRange { hour, minute });
                }
                match (meridiem.as_str(), hour) {
                    ("a", 12) => 0,
                    ("a", h) => h,
                    (_, 12) => 12,
                    (_, h) => h + 12,
                }
            }
        };

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Time-of-day parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    Malformed(String),
    OutOfRange { hour: u8, minute: u8 },
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "time of day is malformed: `{value}`"),
            Self::OutOfRange { hour, minute } => {
                write!(f, "time of day is out of range: hour={hour} minute={minute}")
            }
        }
    }
}

impl Error for TimeParseError {}

/// Raised when `bed_time` is not strictly after `wake_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWindow {
    pub wake_time: TimeOfDay,
    pub bed_time: TimeOfDay,
}

impl Display for InvalidWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid waking window: bed time {} must be after wake time {}",
            self.bed_time, self.wake_time
        )
    }
}

impl Error for InvalidWindow {}

/// Daily interval between wake time and bed time used to space reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WakingWindow {
    wake_time: TimeOfDay,
    bed_time: TimeOfDay,
}

impl WakingWindow {
    /// Creates a window, rejecting empty or midnight-wrapping intervals.
    pub fn new(wake_time: TimeOfDay, bed_time: TimeOfDay) -> Result<Self, InvalidWindow> {
        if bed_time <= wake_time {
            return Err(InvalidWindow {
                wake_time,
                bed_time,
            });
        }
        Ok(Self {
            wake_time,
            bed_time,
        })
    }

    pub fn wake_time(&self) -> TimeOfDay {
        self.wake_time
    }

    pub fn bed_time(&self) -> TimeOfDay {
        self.bed_time
    }

    /// Length of the waking interval in minutes. Always positive.
    pub fn duration_minutes(&self) -> u16 {
        self.bed_time.minutes_since_midnight() - self.wake_time.minutes_since_midnight()
    }
}

impl Default for WakingWindow {
    /// `08:00–22:00`, the window offered before the user picks their own.
    fn default() -> Self {
        Self {
            wake_time: TimeOfDay { minutes: 8 * 60 },
            bed_time: TimeOfDay { minutes: 22 * 60 },
        }
    }
}
