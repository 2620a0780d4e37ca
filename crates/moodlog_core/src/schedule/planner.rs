//! Even spacing of reminders inside a waking window.
//!
//! # Invariants
//! - Output length equals the requested count.
//! - First point equals wake time, last point equals bed time.
//! - Points are non-decreasing; arithmetic is whole minutes since midnight,
//!   independent of dates, time zones and DST.

use crate::model::window::{InvalidWindow, TimeOfDay, WakingWindow};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest count that still pins both window edges.
pub const MIN_REMINDER_COUNT: usize = 2;
/// iOS keeps at most 64 pending local notifications per app.
pub const MAX_REMINDER_COUNT: usize = 64;

/// Reminder planning errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    InvalidWindow(InvalidWindow),
    InvalidCount(usize),
}

impl Display for PlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(err) => write!(f, "{err}"),
            Self::InvalidCount(count) => write!(
                f,
                "reminder count {count} is outside {MIN_REMINDER_COUNT}..={MAX_REMINDER_COUNT}"
            ),
        }
    }
}

impl Error for PlanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWindow(err) => Some(err),
            Self::InvalidCount(_) => None,
        }
    }
}

impl From<InvalidWindow> for PlanError {
    fn from(value: InvalidWindow) -> Self {
        Self::InvalidWindow(value)
    }
}

/// Computes `count` reminder times evenly spread over `window`.
///
/// The waking interval is split into `count - 1` equal gaps; point `i` sits
/// at `wake + floor(duration * i / (count - 1))` minutes.
///
/// # Errors
/// - `InvalidCount` when `count` is outside
///   `MIN_REMINDER_COUNT..=MAX_REMINDER_COUNT`.
pub fn plan_reminders(window: &WakingWindow, count: usize) -> Result<Vec<TimeOfDay>, PlanError> {
    if !(MIN_REMINDER_COUNT..=MAX_REMINDER_COUNT).contains(&count) {
        return Err(PlanError::InvalidCount(count));
    }

    let wake = u32::from(window.wake_time().minutes_since_midnight());
    let duration = u32::from(window.duration_minutes());
    let gaps = (count - 1) as u32;

    let times = (0..count as u32)
        .map(|i| {
            let offset = duration * i / gaps;
            // wake + offset <= bed < 24:00
            TimeOfDay::from_minutes_within_day((wake + offset) as u16)
        })
        .collect();
    Ok(times)
}

/// Validates raw wake/bed times, then plans reminders.
///
/// # Errors
/// - `InvalidWindow` when `bed_time <= wake_time`.
/// - `InvalidCount` as in `plan_reminders`.
pub fn plan_reminders_between(
    wake_time: TimeOfDay,
    bed_time: TimeOfDay,
    count: usize,
) -> Result<Vec<TimeOfDay>, PlanError> {
    let window = WakingWindow::new(wake_time, bed_time)?;
    plan_reminders(&window, count)
}
