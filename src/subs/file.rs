//! Subtitle document model: ordered dialogue lines plus a committing undo log.
//!
//! Parsing and serialising subtitle formats is out of scope; the document here
//! is the in-memory collaborator the timing engine writes into. The commit API
//! carries the coalescing contract: offering the same `(commit_id, amend)`
//! pair again merges the edit into the open undo step, while `-1` always opens
//! a fresh step.

use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::signal::{Connection, Signal};

bitflags! {
    /// What a commit touched. Listeners filter on these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CommitFlags: u32 {
        /// Dialogue line times changed.
        const DIAG_TIME = 1 << 0;
        /// Dialogue lines were added or removed.
        const DIAG_ADDREM = 1 << 1;
    }
}

/// Stable identity of one dialogue line, valid for the life of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(u32);

/// One dialogue line as seen by the timing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleLine {
    pub start_ms: i64,
    pub end_ms: i64,
    pub comment: bool,
}

impl SubtitleLine {
    #[must_use]
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self {
            start_ms,
            end_ms,
            comment: false,
        }
    }

    #[must_use]
    pub fn comment(start_ms: i64, end_ms: i64) -> Self {
        Self {
            start_ms,
            end_ms,
            comment: true,
        }
    }
}

/// One entry of the undo log, observable by tests and hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStep {
    pub tag: String,
    pub commit_id: i64,
    pub amend: Option<LineId>,
    pub flags: CommitFlags,
    /// How many later commits were coalesced into this step.
    pub merges: u32,
}

/// In-memory subtitle document.
#[derive(Debug, Default)]
pub struct SubtitleFile {
    lines: IndexMap<LineId, SubtitleLine>,
    next_line_id: u32,
    undo: Vec<UndoStep>,
    next_commit_id: i64,
    commit_signal: Signal<CommitFlags>,
}

impl SubtitleFile {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: IndexMap::new(),
            next_line_id: 0,
            undo: Vec::new(),
            next_commit_id: 1,
            commit_signal: Signal::new(),
        }
    }

    /// Appends a line at the end of the document.
    pub fn push_line(&mut self, line: SubtitleLine) -> LineId {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.insert(id, line);
        id
    }

    /// Inserts a line directly after `after`. Returns `None` when `after` is
    /// not in the document.
    pub fn insert_after(&mut self, after: LineId, line: SubtitleLine) -> Option<LineId> {
        let index = self.lines.get_index_of(&after)?;
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.shift_insert(index + 1, id, line);
        Some(id)
    }

    #[must_use]
    pub fn line(&self, id: LineId) -> Option<&SubtitleLine> {
        self.lines.get(&id)
    }

    /// Writes new times into a line without committing. Returns `false` when
    /// the line is gone.
    pub fn set_line_times(&mut self, id: LineId, start_ms: i64, end_ms: i64) -> bool {
        match self.lines.get_mut(&id) {
            Some(line) => {
                line.start_ms = start_ms;
                line.end_ms = end_ms;
                true
            }
            None => false,
        }
    }

    /// Lines in document order.
    pub fn events(&self) -> impl Iterator<Item = (LineId, &SubtitleLine)> {
        self.lines.iter().map(|(id, line)| (*id, line))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.lines.get_index_of(&id)
    }

    #[must_use]
    pub fn line_at(&self, index: usize) -> Option<LineId> {
        self.lines.get_index(index).map(|(id, _)| *id)
    }

    /// Commits pending edits into the undo log and notifies listeners.
    ///
    /// Passing the id returned by a previous call together with the same
    /// `amend` target merges this commit into that undo step. Passing `-1`
    /// opens a new step. Returns the id of the step the commit landed in.
    pub fn commit(
        &mut self,
        tag: &str,
        flags: CommitFlags,
        commit_id: i64,
        amend: Option<LineId>,
    ) -> i64 {
        let coalesce = commit_id != -1
            && self
                .undo
                .last()
                .is_some_and(|last| last.commit_id == commit_id && last.amend == amend);
        let id = if coalesce {
            if let Some(last) = self.undo.last_mut() {
                last.merges += 1;
            }
            commit_id
        } else {
            let id = self.next_commit_id;
            self.next_commit_id += 1;
            self.undo.push(UndoStep {
                tag: tag.to_owned(),
                commit_id: id,
                amend,
                flags,
                merges: 0,
            });
            id
        };
        debug!(tag, ?flags, commit_id = id, "commit");
        self.commit_signal.emit(&flags);
        id
    }

    #[must_use]
    pub fn undo_steps(&self) -> &[UndoStep] {
        &self.undo
    }

    /// Subscribes to commit notifications.
    pub fn add_commit_listener(&self, callback: impl FnMut(&CommitFlags) + 'static) -> Connection {
        self.commit_signal.connect(callback)
    }
}
