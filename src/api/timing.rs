//! Dialogue timing controller.
//!
//! Tracks the active dialogue line plus a companion line per other selected
//! line, keeps a globally sorted index over all of their markers, dispatches
//! click and drag intents, snaps dragged markers against reference positions
//! and writes results into the document with commit coalescing.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

use crate::api::context::TimingContext;
use crate::core::TimeRange;
use crate::markers::{
    IndexKey, KeyframeMarkers, LineSlot, MarkerHandle, MarkerIndex, MarkerProvider, MarkerSlot,
    MarkerStyle, MarkerView, TimeableLine, VideoPositionMarkers,
};
use crate::options::OptionStore;
use crate::signal::{Connection, Signal};
use crate::subs::CommitFlags;

/// Marker groups returned by click intents; two markers for a plain click,
/// two per line for a group drag.
pub type MarkerHandles = SmallVec<[MarkerHandle; 4]>;

/// A text label over a time range, for timing modes that produce them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioLabel {
    pub range: TimeRange,
    pub text: String,
}

/// External events recorded by listener connections and drained at the next
/// controller entry point, on the same event-loop turn.
#[derive(Debug, Default, Clone, Copy)]
struct PendingEvents {
    commit_flags: CommitFlags,
    active_line_changed: bool,
    selection_changed: bool,
    options_changed: bool,
}

#[derive(Debug, Clone, Copy)]
struct CachedOptions {
    draw_keyframes: bool,
    inactive_comments: bool,
    drag_timing: bool,
}

impl CachedOptions {
    fn read(options: &OptionStore) -> Self {
        Self {
            draw_keyframes: options.get_bool("Audio/Display/Draw/Keyframes"),
            inactive_comments: options.get_bool("Audio/Display/Draw/Inactive Comments"),
            drag_timing: options.get_bool("Audio/Drag Timing"),
        }
    }
}

/// Default timing mode for dialogue lines.
///
/// The active line's two markers can be dragged individually; alt-clicking
/// grabs the whole selection and shifts every marker by the same delta,
/// anchored to the click position.
#[derive(Debug)]
pub struct DialogueTimingController {
    active_line: TimeableLine,
    selected_lines: Vec<TimeableLine>,
    markers: MarkerIndex,
    keyframes: KeyframeMarkers,
    video_position: VideoPositionMarkers,
    /// Lines with marker movements not yet applied to the document.
    modified_lines: BTreeSet<LineSlot>,
    /// Coalescing hint for auto-commits; `-1` opens a fresh undo step.
    commit_id: i64,
    /// Anchor time of a live group drag.
    clicked_ms: Option<i64>,
    cached: CachedOptions,
    pending: Rc<RefCell<PendingEvents>>,
    commit_connection: Connection,
    _listener_connections: Vec<Connection>,
    marker_moved: Signal<()>,
    primary_range_updated: Signal<()>,
}

impl DialogueTimingController {
    pub fn new(ctx: &TimingContext) -> Self {
        let pending: Rc<RefCell<PendingEvents>> = Rc::default();

        let commit_connection = {
            let pending = Rc::clone(&pending);
            ctx.file
                .add_commit_listener(move |flags| pending.borrow_mut().commit_flags |= *flags)
        };

        let mut listeners = Vec::new();
        {
            let pending = Rc::clone(&pending);
            listeners.push(ctx.selection.add_active_line_listener(move |_| {
                pending.borrow_mut().active_line_changed = true;
            }));
        }
        {
            let pending = Rc::clone(&pending);
            listeners.push(ctx.selection.add_selection_listener(move |_| {
                pending.borrow_mut().selection_changed = true;
            }));
        }
        for key in [
            "Audio/Display/Draw/Keyframes",
            "Audio/Display/Draw/Inactive Comments",
            "Audio/Drag Timing",
        ] {
            let pending = Rc::clone(&pending);
            listeners.push(
                ctx.options
                    .subscribe(key, move |_| pending.borrow_mut().options_changed = true),
            );
        }

        let cached = CachedOptions::read(&ctx.options);
        let mut keyframes = KeyframeMarkers::new();
        keyframes.set_enabled(cached.draw_keyframes);

        let mut controller = Self {
            active_line: TimeableLine::new(MarkerStyle::BoundaryStart, MarkerStyle::BoundaryEnd),
            selected_lines: Vec::new(),
            markers: MarkerIndex::new(),
            keyframes,
            video_position: VideoPositionMarkers::new(),
            modified_lines: BTreeSet::new(),
            commit_id: -1,
            clicked_ms: None,
            cached,
            pending,
            commit_connection,
            _listener_connections: listeners,
            marker_moved: Signal::new(),
            primary_range_updated: Signal::new(),
        };
        controller.revert(ctx);
        controller
    }

    /// Drains events recorded by the listener connections since the last
    /// entry point and reacts to them.
    pub fn pump(&mut self, ctx: &TimingContext) {
        let events = std::mem::take(&mut *self.pending.borrow_mut());

        if events.options_changed {
            self.cached = CachedOptions::read(&ctx.options);
            self.keyframes.set_enabled(self.cached.draw_keyframes);
        }

        if events.active_line_changed || events.commit_flags.contains(CommitFlags::DIAG_TIME) {
            self.revert(ctx);
        } else if events.options_changed
            || events.selection_changed
            || events.commit_flags.contains(CommitFlags::DIAG_ADDREM)
        {
            self.regenerate_selected_lines(ctx);
        }
    }

    // ---- marker provision ------------------------------------------------

    /// Appends every marker intersecting `range`, controller markers first in
    /// sorted order, then keyframes.
    ///
    /// The order matters: later markers are painted on top of earlier ones,
    /// and the sort places the active line's markers after companions at equal
    /// positions. The video position marker is drawn separately.
    pub fn get_markers(&self, range: TimeRange, out: &mut Vec<MarkerView>) {
        let active = &self.active_line;
        let companions = &self.selected_lines;
        for &handle in self
            .markers
            .range(range, |h| index_key(h, active, companions))
        {
            if let Some(line) = self.line(handle.line) {
                let marker = line.marker(handle.slot);
                out.push(MarkerView {
                    time_ms: marker.position,
                    style: marker.style,
                    feet: marker.feet,
                });
            }
        }
        self.keyframes.markers_in(range, out);
    }

    /// Labels over `range`. Dialogue timing produces none; the hook exists
    /// for symmetry with timing modes that do.
    pub fn labels_in(&self, _range: TimeRange, _out: &mut Vec<AudioLabel>) {}

    // ---- hit testing and click intents -----------------------------------

    /// Is a draggable marker within `sensitivity` of `ms`? Alt grabs the
    /// whole line group, so with alt held this is always true.
    #[must_use]
    pub fn is_nearby_marker(&self, ms: i64, sensitivity: i64, alt_down: bool) -> bool {
        alt_down
            || self
                .active_line
                .contains_marker(TimeRange::new(ms - sensitivity, ms + sensitivity))
    }

    /// Left-click intent. Returns the markers a drag started here would move.
    ///
    /// Alt-clicks anchor a group drag over the active and companion markers.
    /// A click near one of the active line's markers picks the closer one
    /// (ties go left) and, when that is the left marker, immediately moves it
    /// to the click position. A click away from both markers is a selection
    /// change request: the first line whose range contains `ms` becomes the
    /// active selection, and no drag starts.
    pub fn on_left_click(
        &mut self,
        ctx: &mut TimingContext,
        ms: i64,
        _ctrl_down: bool,
        alt_down: bool,
        sensitivity: i64,
        snap_range: i64,
    ) -> MarkerHandles {
        self.pump(ctx);
        self.clicked_ms = None;

        let mut ret = MarkerHandles::new();
        if alt_down {
            self.clicked_ms = Some(ms);
            ret.push(self.active_left_handle());
            ret.push(self.active_right_handle());
            if self.cached.drag_timing {
                for i in 0..self.selected_lines.len() {
                    ret.push(MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M1));
                    ret.push(MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M2));
                }
            }
            return ret;
        }

        let dist_l = (self.active_line.left().position - ms).abs();
        let dist_r = (self.active_line.right().position - ms).abs();

        if dist_l > sensitivity && dist_r > sensitivity {
            let hit = ctx
                .file
                .events()
                .find(|(_, line)| ms >= line.start_ms && ms <= line.end_ms)
                .map(|(id, _)| id);
            if let Some(id) = hit {
                ctx.selection.set_selection_and_active(vec![id], id);
                self.pump(ctx);
            }
            return MarkerHandles::new();
        }

        let clicked = if dist_l <= dist_r {
            self.active_left_handle()
        } else {
            self.active_right_handle()
        };
        ret.push(clicked);

        // A left-click within drag range still moves the left marker to the
        // clicked position, but never the right one.
        if clicked == self.active_left_handle() {
            self.set_markers(ctx, &ret, ms, snap_range);
        }

        ret
    }

    /// Right-click intent; reserved for other timing modes, always empty here.
    pub fn on_right_click(
        &mut self,
        ctx: &mut TimingContext,
        _ms: i64,
        _ctrl_down: bool,
        _sensitivity: i64,
        _snap_range: i64,
    ) -> MarkerHandles {
        self.pump(ctx);
        MarkerHandles::new()
    }

    /// Drag dispatch from the display's interaction object.
    pub fn on_marker_drag(
        &mut self,
        ctx: &mut TimingContext,
        handles: &[MarkerHandle],
        new_position: i64,
        snap_range: i64,
    ) {
        self.pump(ctx);
        self.set_markers(ctx, handles, new_position, snap_range);
    }

    // ---- the central mutator ---------------------------------------------

    /// Moves a marker group to `ms` (or by the group-drag delta), runs the
    /// snap search, restores the index sort over the affected slice, and
    /// auto-commits when configured.
    pub fn set_markers(
        &mut self,
        ctx: &mut TimingContext,
        handles: &[MarkerHandle],
        ms: i64,
        snap_range: i64,
    ) {
        if handles.is_empty() {
            return;
        }
        trace!(count = handles.len(), ms, snap_range, "set markers");

        let shift = match self.clicked_ms {
            Some(anchor) => {
                let shift = ms - anchor;
                self.clicked_ms = Some(ms);
                shift
            }
            None => 0,
        };

        // The sorted index only needs a re-sort over the slice that covers
        // every moved marker's old and new position. Widening by the snap
        // range keeps a snap displacement from carrying a marker outside it.
        let mut min_ms = ms;
        let mut max_ms = ms;
        for &handle in handles {
            let Some(pos) = self.marker_position(handle) else {
                continue;
            };
            if shift < 0 {
                min_ms = min_ms.min(pos + shift);
                max_ms = max_ms.max(pos);
            } else {
                min_ms = min_ms.min(pos);
                max_ms = max_ms.max(pos + shift);
            }
        }
        let bounds = {
            let active = &self.active_line;
            let companions = &self.selected_lines;
            self.markers.bounds(min_ms - snap_range, max_ms + snap_range, |h| {
                index_key(h, active, companions)
            })
        };

        let group_drag = self.clicked_ms.is_some();
        for &handle in handles {
            let Some(pos) = self.marker_position(handle) else {
                continue;
            };
            let target = if group_drag { pos + shift } else { ms };
            if let Some(line) = self.line_mut(handle.line) {
                line.set_marker_position(handle.slot, target);
            }
            self.modified_lines.insert(handle.line);
        }

        let snap = self.snap_markers(snap_range, handles);
        if snap != 0 {
            for &handle in handles {
                if let Some(pos) = self.marker_position(handle) {
                    if let Some(line) = self.line_mut(handle.line) {
                        line.set_marker_position(handle.slot, pos + snap);
                    }
                }
            }
        }
        if let Some(anchor) = self.clicked_ms {
            self.clicked_ms = Some(anchor + snap);
        }

        {
            let markers = &mut self.markers;
            let active = &self.active_line;
            let companions = &self.selected_lines;
            markers.resort_slice(bounds, |h| index_key(h, active, companions));
        }

        if ctx.options.get_bool("Audio/Auto/Commit") {
            self.do_commit(ctx, false);
        }
        self.primary_range_updated.emit(&());
        self.marker_moved.emit(&());
    }

    // ---- line bookkeeping ------------------------------------------------

    pub(super) fn regenerate_selected_lines(&mut self, ctx: &TimingContext) {
        self.selected_lines.clear();
        let active = ctx.selection.active_line();
        for &id in ctx.selection.selected_set() {
            if Some(id) == active {
                continue;
            }
            let Some(line) = ctx.file.line(id) else {
                continue;
            };
            if line.comment && !self.cached.inactive_comments {
                continue;
            }
            let mut timeable =
                TimeableLine::new(MarkerStyle::BoundaryInactive, MarkerStyle::BoundaryInactive);
            timeable.set_line(id, &ctx.file);
            self.selected_lines.push(timeable);
        }
        self.regenerate_markers();
    }

    pub(super) fn regenerate_markers(&mut self) {
        let mut handles = Vec::with_capacity(2 + 2 * self.selected_lines.len());
        handles.push(MarkerHandle::new(LineSlot::Active, MarkerSlot::M1));
        handles.push(MarkerHandle::new(LineSlot::Active, MarkerSlot::M2));
        for i in 0..self.selected_lines.len() {
            handles.push(MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M1));
            handles.push(MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M2));
        }

        let markers = &mut self.markers;
        let active = &self.active_line;
        let companions = &self.selected_lines;
        markers.rebuild(handles, |h| index_key(h, active, companions));

        self.marker_moved.emit(&());
    }

    pub(super) fn resort_all_markers(&mut self) {
        let markers = &mut self.markers;
        let active = &self.active_line;
        let companions = &self.selected_lines;
        markers.resort_all(|h| index_key(h, active, companions));
    }

    pub(super) fn line(&self, slot: LineSlot) -> Option<&TimeableLine> {
        match slot {
            LineSlot::Active => Some(&self.active_line),
            LineSlot::Companion(i) => self.selected_lines.get(i),
        }
    }

    pub(super) fn line_mut(&mut self, slot: LineSlot) -> Option<&mut TimeableLine> {
        match slot {
            LineSlot::Active => Some(&mut self.active_line),
            LineSlot::Companion(i) => self.selected_lines.get_mut(i),
        }
    }

    pub(super) fn active_line(&self) -> &TimeableLine {
        &self.active_line
    }

    pub(super) fn active_line_mut(&mut self) -> &mut TimeableLine {
        &mut self.active_line
    }

    pub(super) fn selected_lines(&self) -> &[TimeableLine] {
        &self.selected_lines
    }

    pub(super) fn keyframes_provider(&self) -> &KeyframeMarkers {
        &self.keyframes
    }

    pub(super) fn video_provider(&self) -> &VideoPositionMarkers {
        &self.video_position
    }

    pub(super) fn commit_connection(&self) -> &Connection {
        &self.commit_connection
    }

    pub(super) fn modified_lines(&self) -> &BTreeSet<LineSlot> {
        &self.modified_lines
    }

    pub(super) fn modified_lines_mut(&mut self) -> &mut BTreeSet<LineSlot> {
        &mut self.modified_lines
    }

    pub(super) fn commit_id(&self) -> i64 {
        self.commit_id
    }

    pub(super) fn set_commit_id(&mut self, id: i64) {
        self.commit_id = id;
    }

    pub(super) fn group_anchor(&self) -> Option<i64> {
        self.clicked_ms
    }

    pub(super) fn announce_primary_range_updated(&self) {
        self.primary_range_updated.emit(&());
    }

    // ---- public accessors -------------------------------------------------

    /// Physical handle of the active line's current left marker.
    #[must_use]
    pub fn active_left_handle(&self) -> MarkerHandle {
        MarkerHandle::new(LineSlot::Active, self.active_line.left_slot())
    }

    /// Physical handle of the active line's current right marker.
    #[must_use]
    pub fn active_right_handle(&self) -> MarkerHandle {
        MarkerHandle::new(LineSlot::Active, self.active_line.right_slot())
    }

    /// Current position of a marker, `None` when the handle no longer
    /// resolves (its companion line was rebuilt away).
    #[must_use]
    pub fn marker_position(&self, handle: MarkerHandle) -> Option<i64> {
        self.line(handle.line)
            .map(|line| line.marker_position(handle.slot))
    }

    /// Range that should be played for the active line.
    #[must_use]
    pub fn primary_playback_range(&self) -> TimeRange {
        self.active_line.time_range()
    }

    /// Range the view should keep visible.
    #[must_use]
    pub fn ideal_visible_time_range(&self) -> TimeRange {
        self.active_line.time_range()
    }

    #[must_use]
    pub fn active_line_range(&self) -> TimeRange {
        self.active_line.time_range()
    }

    #[must_use]
    pub fn video_position(&self) -> Option<i64> {
        self.video_position.position()
    }

    /// Replaces the keyframe reference markers.
    pub fn set_keyframes(&mut self, times: Vec<i64>) {
        self.keyframes.set_keyframes(times);
        self.marker_moved.emit(&());
    }

    /// Updates the video playback position reference marker.
    pub fn set_video_position(&mut self, position: Option<i64>) {
        self.video_position.set_position(position);
        self.marker_moved.emit(&());
    }

    pub fn add_marker_moved_listener(&self, callback: impl FnMut(&()) + 'static) -> Connection {
        self.marker_moved.connect(callback)
    }

    pub fn add_updated_primary_range_listener(
        &self,
        callback: impl FnMut(&()) + 'static,
    ) -> Connection {
        self.primary_range_updated.connect(callback)
    }
}

/// Sort key of a marker handle: position, then active-line-last, then the
/// physical slot so the order is total.
pub(super) fn index_key(
    handle: MarkerHandle,
    active: &TimeableLine,
    companions: &[TimeableLine],
) -> IndexKey {
    let (position, rank) = match handle.line {
        LineSlot::Active => (active.marker_position(handle.slot), u32::MAX),
        LineSlot::Companion(i) => match companions.get(i) {
            Some(line) => (line.marker_position(handle.slot), i as u32),
            None => (i64::MAX, i as u32),
        },
    };
    IndexKey {
        position,
        rank,
        slot: handle.slot.index() as u8,
    }
}
