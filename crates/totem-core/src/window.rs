//! Time Windows
//!
//! The three UTC day segments that window-gated actions may be used in once
//! each per day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{day_start, TimeWindows, SECONDS_PER_DAY};

/// One of the three daily windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Window {
    First,
    Second,
    Third,
}

impl Window {
    pub fn number(self) -> u8 {
        match self {
            Window::First => 1,
            Window::Second => 2,
            Window::Third => 3,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Window {}", self.number())
    }
}

impl TimeWindows {
    /// Window containing `offset` seconds since UTC midnight
    pub fn classify(&self, offset: u64) -> Window {
        if offset < self.window2_start {
            Window::First
        } else if offset < self.window3_start {
            Window::Second
        } else {
            Window::Third
        }
    }

    /// Window containing the epoch timestamp `now`
    pub fn current(&self, now: u64) -> Window {
        self.classify(now - day_start(now))
    }

    /// Start offset of a window
    pub fn start_of(&self, window: Window) -> u64 {
        match window {
            Window::First => self.window1_start,
            Window::Second => self.window2_start,
            Window::Third => self.window3_start,
        }
    }

    /// End offset (exclusive) of a window
    pub fn end_of(&self, window: Window) -> u64 {
        match window {
            Window::First => self.window2_start,
            Window::Second => self.window3_start,
            Window::Third => SECONDS_PER_DAY,
        }
    }

    /// Seconds from `now` until the next window opens
    pub fn seconds_until_next_window(&self, now: u64) -> u64 {
        let offset = now - day_start(now);
        self.end_of(self.classify(offset)).saturating_sub(offset)
    }

    /// Human-readable window ranges, e.g. `UTC 00:00-08:00`
    pub fn formatted(&self) -> [String; 3] {
        [Window::First, Window::Second, Window::Third].map(|window| {
            let end = match window {
                Window::Third => "24:00".to_string(),
                _ => format_utc_hour(self.end_of(window)),
            };
            format!("UTC {}-{}", format_utc_hour(self.start_of(window)), end)
        })
    }
}

fn format_utc_hour(seconds: u64) -> String {
    format!("{:02}:00", seconds / 3600)
}

/// Whether a window-gated action last used at `last_used` may be used at `now`.
///
/// A strictly later UTC day always reopens every window. Within the same day
/// the action is allowed only if the last use fell outside the window that
/// contains `now`, using half-open `[start, end)` boundaries.
pub fn can_use_in_window(last_used: u64, now: u64, windows: &TimeWindows) -> bool {
    let today = day_start(now);
    let last_used_day = day_start(last_used);

    if today > last_used_day {
        return true;
    }

    let now_offset = now - today;
    // saturating: a future `last_used` from clock skew can sit on a later day
    let last_offset = last_used.saturating_sub(last_used_day);

    if now_offset < windows.window2_start {
        last_offset >= windows.window2_start || last_offset < windows.window1_start
    } else if now_offset < windows.window3_start {
        last_offset < windows.window2_start || last_offset >= windows.window3_start
    } else {
        last_offset < windows.window3_start
    }
}
