//! Reference marker providers: keyframes and the video playback position.

use crate::core::TimeRange;
use crate::markers::marker::{BoundaryFeet, MarkerStyle, MarkerView};

/// Source of reference markers the view paints and the snap search targets.
pub trait MarkerProvider {
    fn markers_in(&self, range: TimeRange, out: &mut Vec<MarkerView>);
}

/// Video keyframe positions, fed by the host's keyframe source.
#[derive(Debug, Default, Clone)]
pub struct KeyframeMarkers {
    times: Vec<i64>,
    enabled: bool,
}

impl KeyframeMarkers {
    #[must_use]
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            enabled: true,
        }
    }

    /// Replaces the keyframe list. Input need not be sorted.
    pub fn set_keyframes(&mut self, mut times: Vec<i64>) {
        times.sort_unstable();
        times.dedup();
        self.times = times;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn keyframes(&self) -> &[i64] {
        &self.times
    }
}

impl MarkerProvider for KeyframeMarkers {
    fn markers_in(&self, range: TimeRange, out: &mut Vec<MarkerView>) {
        if !self.enabled {
            return;
        }
        let begin = self.times.partition_point(|&t| t < range.begin());
        let end = self.times.partition_point(|&t| t < range.end());
        out.extend(self.times[begin..end].iter().map(|&time_ms| MarkerView {
            time_ms,
            style: MarkerStyle::Keyframe,
            feet: BoundaryFeet::None,
        }));
    }
}

/// The current video playback position as a single marker, when known.
#[derive(Debug, Default, Clone)]
pub struct VideoPositionMarkers {
    position: Option<i64>,
}

impl VideoPositionMarkers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, position: Option<i64>) {
        self.position = position;
    }

    #[must_use]
    pub fn position(&self) -> Option<i64> {
        self.position
    }
}

impl MarkerProvider for VideoPositionMarkers {
    fn markers_in(&self, range: TimeRange, out: &mut Vec<MarkerView>) {
        if let Some(time_ms) = self.position {
            if range.contains(time_ms) {
                out.push(MarkerView {
                    time_ms,
                    style: MarkerStyle::VideoPosition,
                    feet: BoundaryFeet::None,
                });
            }
        }
    }
}
