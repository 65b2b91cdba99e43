//! Keyboard-driven navigation and nudge operations.

use crate::api::context::TimingContext;
use crate::api::timing::DialogueTimingController;
use crate::markers::LineSlot;

/// What "go to next" means for the timing controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextMode {
    /// Advance to the next line in the document.
    Unit,
    /// Create a line after the active one and move onto it.
    Line,
    /// Like [`NextMode::Line`], but always reset the new line to the default
    /// duration even when it already carries times.
    LineResetDefault,
}

impl DialogueTimingController {
    /// Advances to the next timing unit or line, creating one when asked.
    ///
    /// A created line starts where the previous one ended; when it has no end
    /// time (or the mode demands a reset) it is given the configured default
    /// duration and marked modified so the next commit writes those times.
    pub fn next(&mut self, ctx: &mut TimingContext, mode: NextMode) {
        self.pump(ctx);

        if mode == NextMode::Unit {
            ctx.selection.next_line(&ctx.file);
            self.pump(ctx);
            return;
        }

        let new_end_ms = self.active_line().right().position;

        if ctx.selection.create_line_after_active(&mut ctx.file).is_none() {
            return;
        }
        self.pump(ctx);

        let line_end = self
            .active_line()
            .line_id()
            .and_then(|id| ctx.file.line(id))
            .map(|line| line.end_ms);
        if mode == NextMode::LineResetDefault || line_end == Some(0) {
            let default_duration = ctx.options.get_int("Timing/Default Duration");
            // Right first, so the pair is never crossed mid-update and the
            // same physical marker set twice.
            let right = self.active_line().right_slot();
            self.active_line_mut()
                .set_marker_position(right, new_end_ms + default_duration);
            let left = self.active_line().left_slot();
            self.active_line_mut().set_marker_position(left, new_end_ms);
            self.resort_all_markers();
            self.modified_lines_mut().insert(LineSlot::Active);
            self.announce_primary_range_updated();
        }
    }

    /// Moves to the previous line.
    pub fn prev(&mut self, ctx: &mut TimingContext) {
        self.pump(ctx);
        ctx.selection.prev_line(&ctx.file);
        self.pump(ctx);
    }

    /// Moves the start marker outward by the configured lead-in.
    pub fn add_lead_in(&mut self, ctx: &mut TimingContext) {
        self.pump(ctx);
        let handle = self.active_left_handle();
        let target = self.active_line().left().position - ctx.options.get_int("Audio/Lead/IN");
        self.set_markers(ctx, &[handle], target, 0);
    }

    /// Moves the end marker outward by the configured lead-out.
    pub fn add_lead_out(&mut self, ctx: &mut TimingContext) {
        self.pump(ctx);
        let handle = self.active_right_handle();
        let target = self.active_line().right().position + ctx.options.get_int("Audio/Lead/OUT");
        self.set_markers(ctx, &[handle], target, 0);
    }

    /// Nudges the end marker by `delta` centiseconds, never past the start.
    pub fn modify_length(&mut self, ctx: &mut TimingContext, delta: i64) {
        self.pump(ctx);
        let handle = self.active_right_handle();
        let target =
            (self.active_line().right().position + delta * 10).max(self.active_line().left().position);
        self.set_markers(ctx, &[handle], target, 0);
    }

    /// Nudges the start marker by `delta` centiseconds, never past the end.
    pub fn modify_start(&mut self, ctx: &mut TimingContext, delta: i64) {
        self.pump(ctx);
        let handle = self.active_left_handle();
        let target =
            (self.active_line().left().position + delta * 10).min(self.active_line().right().position);
        self.set_markers(ctx, &[handle], target, 0);
    }
}
