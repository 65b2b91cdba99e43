use crate::render::Renderer;

/// No-op renderer used by tests and headless engine usage.
///
/// It records the last notifications so tests can assert on the traffic
/// before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_ms_per_pixel: f64,
    pub last_height: i64,
    pub invalidations: u64,
}

impl Renderer for NullRenderer {
    fn set_ms_per_pixel(&mut self, ms_per_pixel: f64) {
        self.last_ms_per_pixel = ms_per_pixel;
    }

    fn set_height(&mut self, height: i64) {
        self.last_height = height;
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}
