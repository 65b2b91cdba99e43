//! A single dialogue line under timing control.

use crate::core::TimeRange;
use crate::markers::marker::{BoundaryFeet, BoundaryMarker, MarkerSlot, MarkerStyle};
use crate::subs::{LineId, SubtitleFile};

/// Tracks one dialogue line and exposes its two boundary markers.
///
/// After every mutation the leftmost marker's position is `<=` the rightmost
/// marker's; when a move would violate that, the styles and feet of the two
/// physical markers are swapped and the left/right indirection flips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeableLine {
    line: Option<LineId>,
    markers: [BoundaryMarker; 2],
    left: MarkerSlot,
}

impl TimeableLine {
    /// Creates an unbound line whose markers carry the given styles.
    #[must_use]
    pub fn new(style_left: MarkerStyle, style_right: MarkerStyle) -> Self {
        Self {
            line: None,
            markers: [
                BoundaryMarker {
                    position: 0,
                    style: style_left,
                    feet: BoundaryFeet::Right,
                },
                BoundaryMarker {
                    position: 0,
                    style: style_right,
                    feet: BoundaryFeet::Left,
                },
            ],
            left: MarkerSlot::M1,
        }
    }

    #[must_use]
    pub fn line_id(&self) -> Option<LineId> {
        self.line
    }

    /// Binds to a dialogue line, resetting the markers to the line's times
    /// when this is the first binding or the new line has a real end time.
    ///
    /// Returns `true` when the markers were reset. When `false`, the caller's
    /// pending marker positions are preserved and remain to be committed.
    pub fn set_line(&mut self, id: LineId, file: &SubtitleFile) -> bool {
        let Some(line) = file.line(id) else {
            return false;
        };
        if self.line.is_none() || line.end_ms > 0 {
            self.line = Some(id);
            self.set_marker_position(MarkerSlot::M1, line.start_ms);
            self.set_marker_position(MarkerSlot::M2, line.end_ms);
            true
        } else {
            self.line = Some(id);
            false
        }
    }

    /// Moves one physical marker, then re-establishes the left/right order.
    pub fn set_marker_position(&mut self, slot: MarkerSlot, position: i64) {
        self.markers[slot.index()].position = position;
        self.check_markers();
    }

    /// Swaps marker styles and the left/right indirection when the markers
    /// have crossed.
    pub fn check_markers(&mut self) {
        let right = self.left.other();
        if self.markers[right.index()].position < self.markers[self.left.index()].position {
            let [m1, m2] = &mut self.markers;
            std::mem::swap(&mut m1.style, &mut m2.style);
            std::mem::swap(&mut m1.feet, &mut m2.feet);
            self.left = right;
        }
    }

    #[must_use]
    pub fn marker(&self, slot: MarkerSlot) -> &BoundaryMarker {
        &self.markers[slot.index()]
    }

    #[must_use]
    pub fn marker_position(&self, slot: MarkerSlot) -> i64 {
        self.markers[slot.index()].position
    }

    #[must_use]
    pub fn left_slot(&self) -> MarkerSlot {
        self.left
    }

    #[must_use]
    pub fn right_slot(&self) -> MarkerSlot {
        self.left.other()
    }

    #[must_use]
    pub fn left(&self) -> &BoundaryMarker {
        self.marker(self.left_slot())
    }

    #[must_use]
    pub fn right(&self) -> &BoundaryMarker {
        self.marker(self.right_slot())
    }

    /// Does either marker lie inside `range`?
    #[must_use]
    pub fn contains_marker(&self, range: TimeRange) -> bool {
        range.contains(self.markers[0].position) || range.contains(self.markers[1].position)
    }

    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.left().position, self.right().position)
    }

    /// Writes the marker positions back into the tracked dialogue line.
    /// Nothing happens when no line is bound.
    pub fn apply(&self, file: &mut SubtitleFile) {
        if let Some(id) = self.line {
            file.set_line_times(id, self.left().position, self.right().position);
        }
    }
}
