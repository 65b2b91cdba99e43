pub mod file;
pub mod selection;

pub use file::{CommitFlags, LineId, SubtitleFile, SubtitleLine, UndoStep};
pub use selection::SelectionController;
