pub mod index;
pub mod line;
pub mod marker;
pub mod providers;

pub use index::{IndexKey, MarkerIndex};
pub use line::TimeableLine;
pub use marker::{BoundaryFeet, BoundaryMarker, LineSlot, MarkerHandle, MarkerSlot, MarkerStyle, MarkerView};
pub use providers::{KeyframeMarkers, MarkerProvider, VideoPositionMarkers};
