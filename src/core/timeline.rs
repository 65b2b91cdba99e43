//! Timeline ruler model: scale tier selection and tick generation.
//!
//! The ruler picks a tick granularity from decade-spaced pixel-density
//! thresholds, then emits ticks at integer multiples of the tier divisor.
//! Every `major_modulo`-th multiple is a major tick and may carry a label.

use serde::{Deserialize, Serialize};

/// Tick granularity tiers, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScaleUnit {
    Millisecond,
    Centisecond,
    Decisecond,
    Second,
    Decasecond,
    Minute,
    Decaminute,
    Hour,
}

/// Selected tick granularity: unit, divisor and major-tick period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineScale {
    pub unit: ScaleUnit,
    pub divisor_ms: i64,
    pub major_modulo: i64,
}

impl TimelineScale {
    /// Picks the tier for a zoom expressed as milliseconds per pixel.
    #[must_use]
    pub fn for_ms_per_pixel(ms_per_pixel: f64) -> Self {
        let px_sec = 1000.0 / ms_per_pixel;

        if px_sec > 3000.0 {
            Self::tier(ScaleUnit::Millisecond, 1, 10)
        } else if px_sec > 300.0 {
            Self::tier(ScaleUnit::Centisecond, 10, 10)
        } else if px_sec > 30.0 {
            Self::tier(ScaleUnit::Decisecond, 100, 10)
        } else if px_sec > 3.0 {
            Self::tier(ScaleUnit::Second, 1_000, 10)
        } else if px_sec > 1.0 / 3.0 {
            Self::tier(ScaleUnit::Decasecond, 10_000, 6)
        } else if px_sec > 1.0 / 9.0 {
            Self::tier(ScaleUnit::Minute, 60_000, 10)
        } else if px_sec > 1.0 / 90.0 {
            Self::tier(ScaleUnit::Decaminute, 600_000, 6)
        } else {
            Self::tier(ScaleUnit::Hour, 3_600_000, 10)
        }
    }

    fn tier(unit: ScaleUnit, divisor_ms: i64, major_modulo: i64) -> Self {
        Self {
            unit,
            divisor_ms,
            major_modulo,
        }
    }
}

/// One ruler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Multiple of the tier divisor this tick sits at.
    pub index: i64,
    pub time_ms: i64,
    /// Pixel position relative to the left edge of the visible window.
    pub relative_x: i64,
    pub major: bool,
}

/// A label placed at a major tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickLabel {
    pub relative_x: i64,
    pub text: String,
}

/// Timeline ruler state for the current audio, zoom and scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    duration_ms: i64,
    ms_per_pixel: f64,
    pixel_left: i64,
    scale: TimelineScale,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            duration_ms: 0,
            ms_per_pixel: 1.0,
            pixel_left: 0,
            scale: TimelineScale::for_ms_per_pixel(1.0),
        }
    }

    pub fn change_audio(&mut self, duration_ms: i64) {
        self.duration_ms = duration_ms;
    }

    pub fn change_zoom(&mut self, ms_per_pixel: f64) {
        self.ms_per_pixel = ms_per_pixel;
        self.scale = TimelineScale::for_ms_per_pixel(ms_per_pixel);
    }

    pub fn set_position(&mut self, pixel_left: i64) {
        self.pixel_left = pixel_left.max(0);
    }

    #[must_use]
    pub fn scale(&self) -> TimelineScale {
        self.scale
    }

    #[must_use]
    pub fn pixel_left(&self) -> i64 {
        self.pixel_left
    }

    /// Ticks visible in a window of `width_px` pixels.
    #[must_use]
    pub fn ticks(&self, width_px: i64) -> Vec<Tick> {
        let divisor = self.scale.divisor_ms as f64;
        let ms_left = self.pixel_left as f64 * self.ms_per_pixel;

        let mut index = (ms_left / divisor) as i64;
        if (index as f64) * divisor < ms_left {
            index += 1;
        }

        let mut out = Vec::new();
        loop {
            let relative_x = ((index as f64) * divisor / self.ms_per_pixel) as i64 - self.pixel_left;
            if relative_x >= width_px {
                break;
            }
            out.push(Tick {
                index,
                time_ms: index * self.scale.divisor_ms,
                relative_x,
                major: index % self.scale.major_modulo == 0,
            });
            index += 1;
        }
        out
    }

    /// Labels for the major ticks in a window of `width_px` pixels.
    ///
    /// The hour prefix is only printed for audio longer than one hour, and
    /// hour/minute prefixes are omitted while unchanged from the previous
    /// label. Labels that would overlap the previous one are skipped;
    /// `char_width_px` is the caller's text-measurement estimate.
    #[must_use]
    pub fn labels(&self, width_px: i64, char_width_px: i64) -> Vec<TickLabel> {
        let mut last_text_right = -1;
        let mut last_hour = if self.duration_ms < 3_600_000 { 0 } else { -1 };
        let mut last_minute = -1;

        let mut out = Vec::new();
        for tick in self.ticks(width_px) {
            if !tick.major || tick.relative_x <= last_text_right {
                continue;
            }

            let mark_time = tick.time_ms as f64 / 1000.0;
            let mark_hour = (mark_time / 3600.0) as i64;
            let mark_minute = (mark_time / 60.0) as i64 % 60;
            let mark_second = mark_time - (mark_hour as f64) * 3600.0 - (mark_minute as f64) * 60.0;

            let mut text = String::new();
            if mark_hour != last_hour {
                text.push_str(&format!("{mark_hour}:{mark_minute:02}:"));
                last_hour = mark_hour;
                last_minute = mark_minute;
            } else if mark_minute != last_minute {
                text.push_str(&format!("{mark_minute}:"));
                last_minute = mark_minute;
            }
            if self.scale.unit >= ScaleUnit::Decisecond {
                text.push_str(&format!("{:02}", mark_second as i64));
            } else if self.scale.unit == ScaleUnit::Centisecond {
                text.push_str(&format!("{mark_second:.1}"));
            } else {
                text.push_str(&format!("{mark_second:.2}"));
            }

            last_text_right = tick.relative_x + text.chars().count() as i64 * char_width_px;
            out.push(TickLabel {
                relative_x: tick.relative_x,
                text,
            });
        }
        out
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
