//! Commit and revert for the dialogue timing controller.

use tracing::debug;

use crate::api::context::TimingContext;
use crate::api::timing::DialogueTimingController;
use crate::markers::LineSlot;
use crate::subs::CommitFlags;

impl DialogueTimingController {
    /// User-triggered commit. Never coalesces, and breaks the coalescing
    /// chain of surrounding auto-commits.
    pub fn commit(&mut self, ctx: &mut TimingContext) {
        self.pump(ctx);
        self.do_commit(ctx, true);
    }

    /// Applies pending marker movements to the document and commits.
    ///
    /// Auto-commits pass the previous commit id back to the document so a
    /// run of drags on one line collapses into a single undo step. The
    /// controller's own commit listener is blocked around the call so the
    /// commit does not trigger a self-revert.
    pub(super) fn do_commit(&mut self, ctx: &mut TimingContext, user_triggered: bool) {
        if self.modified_lines().is_empty() {
            return;
        }
        debug!(
            lines = self.modified_lines().len(),
            user_triggered, "commit timing changes"
        );

        for &slot in self.modified_lines() {
            if let Some(line) = self.line(slot) {
                line.apply(&mut ctx.file);
            }
        }

        self.commit_connection().block();
        if user_triggered {
            ctx.file.commit("timing", CommitFlags::DIAG_TIME, -1, None);
            self.set_commit_id(-1);
        } else {
            let amend = if self.modified_lines().len() == 1 {
                self.modified_lines()
                    .first()
                    .and_then(|&slot| self.line(slot))
                    .and_then(|line| line.line_id())
            } else {
                None
            };
            let id = ctx
                .file
                .commit("timing", CommitFlags::DIAG_TIME, self.commit_id(), amend);
            self.set_commit_id(id);
        }
        self.commit_connection().unblock();
        self.modified_lines_mut().clear();
    }

    /// Discards pending movements and rebinds to the current active line.
    ///
    /// When the new active line has no end time yet its times are not taken
    /// over; instead the line is marked modified so the next commit writes
    /// the marker positions as its times.
    pub fn revert(&mut self, ctx: &TimingContext) {
        self.set_commit_id(-1);

        if let Some(active) = ctx.selection.active_line() {
            self.modified_lines_mut().clear();
            if self.active_line_mut().set_line(active, &ctx.file) {
                self.announce_primary_range_updated();
            } else {
                self.modified_lines_mut().insert(LineSlot::Active);
            }
        }

        self.regenerate_selected_lines(ctx);
    }
}
