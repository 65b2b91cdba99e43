//! Audio display facade: viewport state, pointer interaction, cursor policy.
//!
//! The display owns the timing controller and a renderer backend. Hosts feed
//! it pointer events, playback positions and timer ticks; it keeps the
//! scroll/zoom state legal and drives the controller.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::AudioDisplayConfig;
use crate::api::context::TimingContext;
use crate::api::timing::DialogueTimingController;
use crate::audio::{self, AudioProvider, LoadProgress};
use crate::core::{TimePixelMap, Timeline, format_clock_time};
use crate::error::{TimingError, TimingResult};
use crate::interaction::{
    CursorShape, DragState, MarkerDrag, MouseButton, PointerEvent, PointerEventKind,
};
use crate::render::Renderer;
use crate::signal::{Connection, Signal};

#[derive(Debug, Default, Clone, Copy)]
pub(super) struct DisplayPings {
    pub(super) marker_moved: bool,
    pub(super) primary_range_updated: bool,
}

pub struct AudioDisplay<R: Renderer> {
    pub(super) renderer: R,
    pub(super) timing: DialogueTimingController,
    pub(super) scroll_left: i64,
    pub(super) ms_per_pixel: f64,
    pub(super) zoom_level: i32,
    pub(super) pixel_audio_width: i64,
    pub(super) client_width: i64,
    pub(super) client_height: i64,
    pub(super) timeline_height: i64,
    pub(super) duration_ms: i64,
    pub(super) timeline: Timeline,
    pub(super) track_cursor_pos: Option<i64>,
    pub(super) track_cursor_label: Option<String>,
    pub(super) state: DragState,
    pub(super) cursor: CursorShape,
    pub(super) drag_scroll_timer_armed: bool,
    pub(super) load_progress: Option<LoadProgress>,
    pub(super) load_position_ms: Option<i64>,
    pub(super) playing: bool,
    pub(super) pings: Rc<RefCell<DisplayPings>>,
    _timing_connections: Vec<Connection>,
    pub(super) seek_requested: Signal<i64>,
}

impl<R: Renderer> AudioDisplay<R> {
    pub fn new(renderer: R, ctx: &TimingContext) -> Self {
        Self::with_config(renderer, ctx, AudioDisplayConfig::default())
    }

    pub fn with_config(renderer: R, ctx: &TimingContext, config: AudioDisplayConfig) -> Self {
        let timing = DialogueTimingController::new(ctx);
        let pings: Rc<RefCell<DisplayPings>> = Rc::default();

        let mut connections = Vec::new();
        {
            let pings = Rc::clone(&pings);
            connections.push(
                timing.add_marker_moved_listener(move |_| pings.borrow_mut().marker_moved = true),
            );
        }
        {
            let pings = Rc::clone(&pings);
            connections.push(timing.add_updated_primary_range_listener(move |_| {
                pings.borrow_mut().primary_range_updated = true;
            }));
        }

        let mut display = Self {
            renderer,
            timing,
            scroll_left: 0,
            ms_per_pixel: 0.0,
            zoom_level: config.zoom_level,
            pixel_audio_width: 1,
            client_width: config.client_width,
            client_height: config.client_height,
            timeline_height: config.timeline_height,
            duration_ms: 0,
            timeline: Timeline::new(),
            track_cursor_pos: None,
            track_cursor_label: None,
            state: DragState::Idle,
            cursor: CursorShape::default(),
            drag_scroll_timer_armed: false,
            load_progress: None,
            load_position_ms: None,
            playing: false,
            pings,
            _timing_connections: connections,
            seek_requested: Signal::new(),
        };
        let audio_height = display.audio_height();
        display.renderer.set_height(audio_height);
        display.set_zoom_level(config.zoom_level);
        display
    }

    // ---- geometry --------------------------------------------------------

    pub fn set_client_size(&mut self, width: i64, height: i64) -> TimingResult<()> {
        if width <= 0 || height <= 0 {
            return Err(TimingError::InvalidClientSize { width, height });
        }
        self.client_width = width;
        self.client_height = height;
        let audio_height = self.audio_height();
        self.renderer.set_height(audio_height);
        self.scroll_pixel_to_left(self.scroll_left);
        Ok(())
    }

    /// Height of the audio strip below the timeline ruler.
    #[must_use]
    pub fn audio_height(&self) -> i64 {
        (self.client_height - self.timeline_height).max(0)
    }

    #[must_use]
    pub fn client_width(&self) -> i64 {
        self.client_width
    }

    #[must_use]
    pub fn scroll_left(&self) -> i64 {
        self.scroll_left
    }

    #[must_use]
    pub fn ms_per_pixel(&self) -> f64 {
        self.ms_per_pixel
    }

    #[must_use]
    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    #[must_use]
    pub fn pixel_audio_width(&self) -> i64 {
        self.pixel_audio_width
    }

    #[must_use]
    pub fn time_pixel_map(&self) -> TimePixelMap {
        TimePixelMap::new(self.scroll_left, self.ms_per_pixel)
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn timing(&self) -> &DialogueTimingController {
        &self.timing
    }

    #[must_use]
    pub fn timing_mut(&mut self) -> &mut DialogueTimingController {
        &mut self.timing
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    // ---- audio lifecycle -------------------------------------------------

    /// Takes over a newly opened audio stream: recomputes duration-dependent
    /// state and starts load-progress tracking when decoding is still going.
    pub fn on_audio_open(&mut self, provider: &dyn AudioProvider) {
        self.duration_ms = audio::duration_ms(provider);
        self.timeline.change_audio(self.duration_ms);
        self.ms_per_pixel = 0.0;
        self.set_zoom_level(self.zoom_level);

        let decoded = provider.decoded_samples();
        if decoded != provider.num_samples() {
            self.load_progress = Some(LoadProgress::begin(decoded));
        } else {
            self.load_progress = None;
        }
        self.load_position_ms = None;
        self.renderer.invalidate();
    }

    /// Periodic load timer tick while the provider decodes in the background.
    pub fn on_load_timer(&mut self, provider: &dyn AudioProvider, elapsed_ms: i64) {
        let Some(progress) = &mut self.load_progress else {
            return;
        };
        self.load_position_ms = progress.poll(provider, elapsed_ms);
        if progress.is_done() {
            self.load_progress = None;
        }
        self.renderer.invalidate();
    }

    /// Predicted decode position while audio is still loading.
    #[must_use]
    pub fn load_position_ms(&self) -> Option<i64> {
        self.load_position_ms
    }

    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    // ---- track cursor ----------------------------------------------------

    /// Moves the visual cursor line, optionally labelling it with the time.
    pub fn set_track_cursor(&mut self, new_pos: i64, show_time: bool) {
        let new_pos = (new_pos >= 0).then_some(new_pos);
        if new_pos == self.track_cursor_pos {
            return;
        }
        self.track_cursor_pos = new_pos;
        self.track_cursor_label = match new_pos {
            Some(pos) if show_time => {
                Some(format_clock_time(self.time_pixel_map().time_from_absolute_x(pos)))
            }
            _ => None,
        };
        self.renderer.invalidate();
    }

    pub fn remove_track_cursor(&mut self) {
        self.set_track_cursor(-1, false);
    }

    #[must_use]
    pub fn track_cursor_pos(&self) -> Option<i64> {
        self.track_cursor_pos
    }

    #[must_use]
    pub fn track_cursor_label(&self) -> Option<&str> {
        self.track_cursor_label.as_deref()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        if !playing {
            self.remove_track_cursor();
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    // ---- pointer interaction ---------------------------------------------

    /// Cursor shape the host should show.
    #[must_use]
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Pointer capture must be held exactly while this is true.
    #[must_use]
    pub fn has_capture(&self) -> bool {
        !self.state.is_idle()
    }

    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        &self.state
    }

    /// Whether a mouse enter should focus the audio widget.
    #[must_use]
    pub fn on_mouse_enter(&self, ctx: &TimingContext) -> bool {
        ctx.options.get_bool("Audio/Auto/Focus")
    }

    pub fn on_mouse_leave(&mut self) {
        if !self.playing {
            self.remove_track_cursor();
        }
    }

    /// Feeds one pointer event through the drag state machine.
    pub fn on_pointer_event(&mut self, ctx: &mut TimingContext, event: &PointerEvent) {
        self.timing.pump(ctx);

        let mut new_state = std::mem::take(&mut self.state);

        if !new_state.is_idle() && event.capture_lost {
            // Capture loss cancels the drag; partial movements are kept.
            new_state = DragState::Idle;
            self.cursor = CursorShape::Default;
            self.drag_scroll_timer_armed = false;
        } else if new_state.is_idle() {
            if event.y < self.timeline_height {
                if event.kind == PointerEventKind::ButtonDown(MouseButton::Left) {
                    self.jump_to_time(ctx, event.x);
                    new_state = DragState::DraggingTimeline;
                }
            } else {
                let drag_sensitivity_ms = (ctx.options.get_int("Audio/Start Drag Sensitivity")
                    as f64
                    * self.ms_per_pixel) as i64;
                let snap_enabled = ctx.options.get_bool("Audio/Snap/Enable");
                let snap_range_px = ctx.options.get_int("Audio/Snap/Distance");
                let snap_ms = if snap_enabled != event.shift {
                    (snap_range_px as f64 * self.ms_per_pixel) as i64
                } else {
                    0
                };

                match event.kind {
                    PointerEventKind::Motion => {
                        let timepos = self.time_pixel_map().time_from_relative_x(event.x);
                        self.cursor = if self.timing.is_nearby_marker(
                            timepos,
                            drag_sensitivity_ms,
                            event.alt,
                        ) {
                            CursorShape::SizeWe
                        } else {
                            CursorShape::Default
                        };
                        self.state = new_state;
                        self.after_timing(ctx);
                        return;
                    }
                    PointerEventKind::ButtonDown(
                        button @ (MouseButton::Left | MouseButton::Right),
                    ) => {
                        let old_scroll_pos = self.scroll_left;
                        let timepos = self.time_pixel_map().time_from_relative_x(event.x);
                        let markers = if button == MouseButton::Left {
                            self.timing.on_left_click(
                                ctx,
                                timepos,
                                event.ctrl,
                                event.alt,
                                drag_sensitivity_ms,
                                snap_ms,
                            )
                        } else {
                            self.timing.on_right_click(
                                ctx,
                                timepos,
                                event.ctrl,
                                drag_sensitivity_ms,
                                snap_ms,
                            )
                        };

                        // Clicking never scrolls the display: drain any
                        // selection-triggered scroll, then put it back.
                        self.after_timing(ctx);
                        self.scroll_pixel_to_left(old_scroll_pos);

                        if !markers.is_empty() {
                            self.remove_track_cursor();
                            new_state = DragState::DraggingMarker(MarkerDrag {
                                markers,
                                button,
                                default_snap: snap_enabled,
                                snap_range_px,
                            });
                        }
                    }
                    _ => {}
                }
            }
        } else if new_state == DragState::DraggingTimeline {
            self.jump_to_time(ctx, event.x);
            if !event.left_down {
                new_state = DragState::Idle;
            }
        } else {
            let (markers, button) = match &new_state {
                DragState::DraggingMarker(drag) => (drag.markers.clone(), drag.button),
                _ => unreachable!("state machine covers idle and timeline above"),
            };
            if event.kind == PointerEventKind::Motion {
                let snap_ms = self.effective_snap_ms(&new_state, event.shift);
                let timepos = self.time_pixel_map().time_from_relative_x(event.x);
                self.timing.on_marker_drag(ctx, &markers, timepos, snap_ms);
            }
            if event.kind == PointerEventKind::ButtonUp(button) {
                self.drag_scroll_timer_armed = false;
                new_state = DragState::Idle;
                self.cursor = CursorShape::Default;
            }
        }

        self.state = new_state;

        if self.state.is_idle() {
            if event.middle_down {
                self.jump_to_time(ctx, event.x);
            } else if !self.playing {
                self.remove_track_cursor();
            }
        }

        self.after_timing(ctx);
    }

    fn effective_snap_ms(&self, state: &DragState, shift_down: bool) -> i64 {
        match state {
            DragState::DraggingMarker(drag) if drag.default_snap != shift_down => self
                .time_pixel_map()
                .time_from_absolute_x(drag.snap_range_px),
            _ => 0,
        }
    }

    /// Scrub: request a seek to the time under the pointer and plant the
    /// visual cursor there.
    pub(super) fn jump_to_time(&mut self, ctx: &TimingContext, x: i64) {
        let time = self.time_pixel_map().time_from_relative_x(x);
        self.seek_requested.emit(&time);
        let show_time = ctx.options.get_bool("Audio/Display/Draw/Cursor Time");
        self.set_track_cursor(self.scroll_left + x, show_time);
    }

    /// Subscribes to scrub seek requests.
    pub fn add_seek_listener(&self, callback: impl FnMut(&i64) + 'static) -> Connection {
        self.seek_requested.connect(callback)
    }

    // ---- timing controller announcements ----------------------------------

    /// Drains controller events after external document or selection changes.
    pub fn pump(&mut self, ctx: &TimingContext) {
        self.timing.pump(ctx);
        self.after_timing(ctx);
    }

    pub(super) fn after_timing(&mut self, ctx: &TimingContext) {
        let pings = std::mem::take(&mut *self.pings.borrow_mut());
        if pings.primary_range_updated {
            self.on_primary_range_updated(ctx);
        }
        if pings.marker_moved {
            self.renderer.invalidate();
        }
    }

    fn on_primary_range_updated(&mut self, ctx: &TimingContext) {
        if let DragState::DraggingMarker(drag) = &self.state {
            // A dragged marker pushed out of view arms the one-shot scroll
            // timer instead of scrolling immediately.
            if !self.drag_scroll_timer_armed {
                if let Some(pos) = drag
                    .markers
                    .first()
                    .and_then(|&handle| self.timing.marker_position(handle))
                {
                    let rel_x = self.time_pixel_map().relative_x_from_time(pos);
                    if rel_x < 0 || rel_x >= self.client_width {
                        self.drag_scroll_timer_armed = true;
                    }
                }
            }
        } else if ctx.options.get_bool("Audio/Auto/Scroll") {
            let range = self.timing.primary_playback_range();
            if range.end() != 0 {
                self.scroll_time_range_in_view(range);
            }
        }
    }

    /// Is the one-shot drag auto-scroll timer armed? The host should fire
    /// [`AudioDisplay::fire_drag_scroll_timer`] about 50 ms after it arms.
    #[must_use]
    pub fn drag_scroll_timer_armed(&self) -> bool {
        self.drag_scroll_timer_armed
    }

    /// One-shot timer tick: scrolls the dragged marker back into view with a
    /// 5% margin.
    pub fn fire_drag_scroll_timer(&mut self) {
        self.drag_scroll_timer_armed = false;

        let pos = match &self.state {
            DragState::DraggingMarker(drag) => drag
                .markers
                .first()
                .and_then(|&handle| self.timing.marker_position(handle)),
            _ => return,
        };
        let Some(pos) = pos else { return };

        let rel_x = self.time_pixel_map().relative_x_from_time(pos);
        let width = self.client_width;
        if rel_x < 0 {
            self.scroll_by(rel_x - width / 20);
        } else if rel_x >= width {
            self.scroll_by(rel_x - width + width / 20);
        }
    }
}
