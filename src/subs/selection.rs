//! Active-line and selection tracking.

use tracing::debug;

use crate::signal::{Connection, Signal};
use crate::subs::file::{CommitFlags, LineId, SubtitleFile, SubtitleLine};

/// Tracks the active dialogue line plus the selected set, announcing changes.
#[derive(Debug, Default)]
pub struct SelectionController {
    active: Option<LineId>,
    selection: Vec<LineId>,
    active_line_changed: Signal<()>,
    selection_changed: Signal<()>,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active_line(&self) -> Option<LineId> {
        self.active
    }

    #[must_use]
    pub fn selected_set(&self) -> &[LineId] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: LineId) -> bool {
        self.selection.contains(&id)
    }

    /// Replaces the selection and the active line in one step.
    ///
    /// The selection announcement always fires; the active-line announcement
    /// only fires when the active line actually changed.
    pub fn set_selection_and_active(&mut self, selection: Vec<LineId>, active: LineId) {
        debug!(?active, count = selection.len(), "selection change");
        let active_changed = self.active != Some(active);
        self.selection = selection;
        self.active = Some(active);
        self.selection_changed.emit(&());
        if active_changed {
            self.active_line_changed.emit(&());
        }
    }

    /// Moves selection and active line to the next line in document order.
    pub fn next_line(&mut self, file: &SubtitleFile) {
        self.step_line(file, 1);
    }

    /// Moves selection and active line to the previous line in document order.
    pub fn prev_line(&mut self, file: &SubtitleFile) {
        self.step_line(file, -1);
    }

    fn step_line(&mut self, file: &SubtitleFile, delta: i64) {
        let Some(active) = self.active else { return };
        let Some(index) = file.index_of(active) else {
            return;
        };
        let target = index as i64 + delta;
        if target < 0 {
            return;
        }
        if let Some(id) = file.line_at(target as usize) {
            self.set_selection_and_active(vec![id], id);
        }
    }

    /// Creates an untimed line after the active one, commits the insertion and
    /// makes the new line the active selection.
    ///
    /// The new line starts where the previous active line ends and carries a
    /// zero end time until the timing engine assigns one.
    pub fn create_line_after_active(&mut self, file: &mut SubtitleFile) -> Option<LineId> {
        let active = self.active?;
        let start = file.line(active)?.end_ms;
        let id = file.insert_after(active, SubtitleLine::new(start, 0))?;
        file.commit("new line", CommitFlags::DIAG_ADDREM, -1, None);
        self.set_selection_and_active(vec![id], id);
        Some(id)
    }

    pub fn add_active_line_listener(&self, callback: impl FnMut(&()) + 'static) -> Connection {
        self.active_line_changed.connect(callback)
    }

    pub fn add_selection_listener(&self, callback: impl FnMut(&()) + 'static) -> Connection {
        self.selection_changed.connect(callback)
    }
}
