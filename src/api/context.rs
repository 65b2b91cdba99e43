use crate::options::OptionStore;
use crate::subs::{SelectionController, SubtitleFile};

/// Shared project state the timing engine operates on: the subtitle document,
/// the selection, and the option store.
///
/// The context is owned by the host and passed into engine entry points; all
/// mutation happens on the host's event loop.
#[derive(Debug)]
pub struct TimingContext {
    pub file: SubtitleFile,
    pub selection: SelectionController,
    pub options: OptionStore,
}

impl TimingContext {
    /// Empty document with the engine's default options registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: SubtitleFile::new(),
            selection: SelectionController::new(),
            options: OptionStore::with_defaults(),
        }
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
