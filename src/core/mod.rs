pub mod color;
pub mod map;
pub mod time;
pub mod timeline;

pub use color::Color;
pub use map::{
    BASE_PIXELS_PER_SECOND, TimePixelMap, ms_per_pixel_for_zoom, zoom_factor_percent,
    zoom_level_description,
};
pub use time::{TimeRange, format_clock_time};
pub use timeline::{ScaleUnit, Tick, TickLabel, Timeline, TimelineScale};
