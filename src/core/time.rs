//! Millisecond time primitives.
//!
//! All positions in the engine are integer milliseconds; 0 is the start of
//! audio and negative times are invalid.

use serde::{Deserialize, Serialize};

/// Half-open time interval `[begin, end)` in milliseconds with `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    begin: i64,
    end: i64,
}

impl TimeRange {
    /// Creates a range, swapping the endpoints if they arrive reversed.
    #[must_use]
    pub fn new(begin: i64, end: i64) -> Self {
        if begin <= end {
            Self { begin, end }
        } else {
            Self {
                begin: end,
                end: begin,
            }
        }
    }

    #[must_use]
    pub fn begin(self) -> i64 {
        self.begin
    }

    #[must_use]
    pub fn end(self) -> i64 {
        self.end
    }

    #[must_use]
    pub fn length(self) -> i64 {
        self.end - self.begin
    }

    #[must_use]
    pub fn contains(self, time_ms: i64) -> bool {
        time_ms >= self.begin && time_ms < self.end
    }

    #[must_use]
    pub fn overlaps(self, other: TimeRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

/// Formats a time as `H:MM:SS.CC`, the clock format used for cursor labels.
#[must_use]
pub fn format_clock_time(time_ms: i64) -> String {
    let time_ms = time_ms.max(0);
    let centis = (time_ms / 10) % 100;
    let seconds = (time_ms / 1_000) % 60;
    let minutes = (time_ms / 60_000) % 60;
    let hours = time_ms / 3_600_000;
    format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
}
