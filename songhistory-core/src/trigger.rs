//! The trigger window: when an invocation is allowed to do any work.
//!
//! The binary is invoked by an external scheduler (logoff script, scheduled
//! task, cron) on every trigger event; this gate decides whether the event
//! falls inside the configured window. The check is pure and idempotent:
//! running several times inside the same window is safe, as the upload
//! overwrites the same remote file.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// A weekly window: a weekday, optionally restricted to "from this hour on".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerWindow {
    pub weekday: Weekday,
    /// Earliest local hour (0-23) at which the window opens; `None` means the
    /// whole day.
    pub from_hour: Option<u32>,
}

impl Default for TriggerWindow {
    /// Sunday from 7pm, matching the evening-service upload slot.
    fn default() -> Self {
        Self {
            weekday: Weekday::Sun,
            from_hour: Some(19),
        }
    }
}

impl TriggerWindow {
    /// Whether `now` (local time) falls inside the window.
    pub fn permits(&self, now: NaiveDateTime) -> bool {
        now.weekday() == self.weekday && self.from_hour.map_or(true, |hour| now.hour() >= hour)
    }
}
