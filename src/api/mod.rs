//! Engine facade: the dialogue timing controller and the audio display.

mod context;
mod display;
mod display_scroll;
mod timing;
mod timing_commit;
mod timing_nav;
mod timing_snap;

pub use context::TimingContext;
pub use display::AudioDisplay;
pub use timing::{AudioLabel, DialogueTimingController, MarkerHandles};
pub use timing_nav::NextMode;

use serde::{Deserialize, Serialize};

use crate::error::{TimingError, TimingResult};

/// Display bootstrap configuration.
///
/// Serializable so host applications can persist/load the display setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioDisplayConfig {
    pub client_width: i64,
    pub client_height: i64,
    pub timeline_height: i64,
    pub zoom_level: i32,
}

impl Default for AudioDisplayConfig {
    fn default() -> Self {
        Self {
            client_width: 600,
            client_height: 70,
            timeline_height: 20,
            zoom_level: 0,
        }
    }
}

impl AudioDisplayConfig {
    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> TimingResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| TimingError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> TimingResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| TimingError::InvalidData(format!("failed to parse config: {e}")))
    }
}
