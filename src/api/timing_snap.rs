//! Snap search for marker drags.

use smallvec::SmallVec;

use crate::api::timing::DialogueTimingController;
use crate::core::TimeRange;
use crate::markers::{LineSlot, MarkerHandle, MarkerProvider, MarkerSlot, MarkerView};

impl DialogueTimingController {
    /// Finds the smallest displacement that lands one of the dragged markers
    /// on a reference position, searching keyframes, the video position and
    /// the markers not being dragged, in that order.
    ///
    /// Returns `0` when nothing lies within `snap_range`. The first candidate
    /// seen at the minimum distance wins ties. During a group drag the
    /// controller's own markers are not candidates, because all of them move
    /// together.
    pub(super) fn snap_markers(&self, snap_range: i64, active: &[MarkerHandle]) -> i64 {
        if snap_range <= 0 || active.is_empty() {
            return 0;
        }

        let positions: SmallVec<[i64; 4]> = active
            .iter()
            .filter_map(|&handle| self.marker_position(handle))
            .collect();
        let Some(&min) = positions.iter().min() else {
            return 0;
        };
        let max = *positions.iter().max().expect("non-empty");
        let envelope = TimeRange::new(min - snap_range, max + snap_range);

        let mut inactive: Vec<i64> = Vec::new();
        if self.group_anchor().is_none() {
            let mut add_inactive = |handle: MarkerHandle| {
                if active.contains(&handle) {
                    return;
                }
                if let Some(pos) = self.marker_position(handle) {
                    if envelope.contains(pos) {
                        inactive.push(pos);
                    }
                }
            };
            for i in 0..self.selected_lines().len() {
                add_inactive(MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M1));
                add_inactive(MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M2));
            }
            add_inactive(MarkerHandle::new(LineSlot::Active, MarkerSlot::M1));
            add_inactive(MarkerHandle::new(LineSlot::Active, MarkerSlot::M2));
            inactive.sort_unstable();
            inactive.dedup();
        }

        let mut best: Option<i64> = None;
        let mut seen: SmallVec<[i64; 4]> = SmallVec::new();
        let mut views: Vec<MarkerView> = Vec::new();
        for &pos in &positions {
            if seen.contains(&pos) {
                continue;
            }
            seen.push(pos);

            let range = TimeRange::new(pos - snap_range, pos + snap_range);
            views.clear();
            self.keyframes_provider().markers_in(range, &mut views);
            self.video_provider().markers_in(range, &mut views);
            for view in &views {
                let d = view.time_ms - pos;
                if best.is_none_or(|b| d.abs() < b.abs()) {
                    best = Some(d);
                }
                if best == Some(0) {
                    return 0;
                }
            }

            let start = inactive.partition_point(|&m| m < range.begin());
            for &m in &inactive[start..] {
                let d = m - pos;
                if best.is_none_or(|b| d.abs() < b.abs()) {
                    best = Some(d);
                }
                if best == Some(0) {
                    return 0;
                }
                if m > pos {
                    break;
                }
            }
        }

        match best {
            Some(d) if d.abs() <= snap_range => d,
            _ => 0,
        }
    }
}
