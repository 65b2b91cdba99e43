//! Scrolling, zooming and playback-follow behavior of the audio display.

use tracing::debug;

use crate::api::context::TimingContext;
use crate::api::display::AudioDisplay;
use crate::core::{TimeRange, ms_per_pixel_for_zoom};
use crate::render::Renderer;

impl<R: Renderer> AudioDisplay<R> {
    pub fn scroll_by(&mut self, pixel_amount: i64) {
        self.scroll_pixel_to_left(self.scroll_left + pixel_amount);
    }

    /// Scrolls so the given strip pixel is at the left edge, clamped to the
    /// legal range. Out-of-range targets are not an error.
    pub fn scroll_pixel_to_left(&mut self, mut pixel_position: i64) {
        if pixel_position + self.client_width >= self.pixel_audio_width {
            pixel_position = self.pixel_audio_width - self.client_width;
        }
        if pixel_position < 0 {
            pixel_position = 0;
        }

        self.scroll_left = pixel_position;
        self.timeline.set_position(pixel_position);
        self.renderer.invalidate();
    }

    /// Brings a time range into the 90% inner window of the display.
    ///
    /// Ordered cases: already inside, centre a range that fits, leave a range
    /// we are viewing the middle of alone, right-align when only the right
    /// edge is visible, otherwise left-align.
    pub fn scroll_time_range_in_view(&mut self, range: TimeRange) {
        let map = self.time_pixel_map();
        let range_begin = map.absolute_x_from_time(range.begin());
        let range_end = map.absolute_x_from_time(range.end());
        let range_len = range_end - range_begin;

        // Remove 5% from each side of the client area.
        let leftadjust = self.client_width / 20;
        let client_left = self.scroll_left + leftadjust;
        let client_width = self.client_width * 9 / 10;

        if range_begin >= client_left && range_end <= client_left + client_width {
            return;
        }

        if range_len < client_width {
            self.scroll_pixel_to_left(range_begin - (client_width - range_len) / 2 - leftadjust);
        } else if range_begin < client_left && range_end > client_left + client_width {
            // Viewing a middle part of a range that cannot fit; stay put.
        } else if range_end >= client_left && range_end < client_left + client_width {
            self.scroll_pixel_to_left(range_end - client_width - leftadjust);
        } else {
            self.scroll_pixel_to_left(range_begin - leftadjust);
        }
    }

    /// Applies a zoom level, keeping the time under the tracked cursor (or
    /// the client centre) fixed on screen.
    pub fn set_zoom_level(&mut self, zoom_level: i32) {
        self.zoom_level = zoom_level;

        let new_ms_per_pixel = ms_per_pixel_for_zoom(zoom_level);
        if self.ms_per_pixel == new_ms_per_pixel {
            return;
        }
        debug!(zoom_level, ms_per_pixel = new_ms_per_pixel, "zoom change");

        let cursor_pos = match self.track_cursor_pos {
            Some(pos) => (pos - self.scroll_left) as f64,
            None => self.client_width as f64 / 2.0,
        };
        let cursor_time = (self.scroll_left as f64 + cursor_pos) * self.ms_per_pixel;

        self.ms_per_pixel = new_ms_per_pixel;
        self.pixel_audio_width = ((self.duration_ms as f64 / new_ms_per_pixel) as i64).max(1);

        self.renderer.set_ms_per_pixel(new_ms_per_pixel);
        self.timeline.change_zoom(new_ms_per_pixel);

        let anchor_x = self
            .time_pixel_map()
            .absolute_x_from_time(cursor_time as i64);
        self.scroll_pixel_to_left(anchor_x - cursor_pos as i64);
        if self.track_cursor_pos.is_some() {
            self.track_cursor_pos = Some(anchor_x);
        }
        self.renderer.invalidate();
    }

    /// Playback position update: plants the visual cursor and, when locked,
    /// follows it with edge-triggered scrolling.
    pub fn on_playback_position(&mut self, ctx: &TimingContext, position_ms: i64) {
        let pixel_position = self.time_pixel_map().absolute_x_from_time(position_ms);
        self.set_track_cursor(pixel_position, false);

        if !ctx.options.get_bool("Audio/Lock Scroll on Cursor") {
            return;
        }

        let client_width = self.client_width;
        let edge_size = client_width / 20;
        if self.scroll_left > 0 && pixel_position < self.scroll_left + edge_size {
            self.scroll_pixel_to_left((pixel_position - edge_size).max(0));
        } else if self.scroll_left + client_width
            < (self.pixel_audio_width - 1).min(pixel_position + edge_size)
        {
            let max_left = self.pixel_audio_width - client_width - 1;
            if ctx.options.get_bool("Audio/Smooth Scrolling") {
                self.scroll_pixel_to_left((pixel_position - client_width + edge_size).min(max_left));
            } else {
                self.scroll_pixel_to_left((pixel_position - edge_size).min(max_left));
            }
        }
    }
}
