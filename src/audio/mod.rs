//! Audio provider seam and load-progress prediction.
//!
//! Decoding is out of scope. The engine only needs the stream geometry and,
//! while a provider is still decoding on its own thread, an occasional
//! atomic read of how far it has come.

use std::sync::atomic::{AtomicI64, Ordering};

/// Decoded-audio source. `decoded_samples` may be read while the provider's
/// decode thread is still appending; implementations must make that read an
/// atomic word load.
pub trait AudioProvider {
    fn sample_rate(&self) -> i64;
    fn num_samples(&self) -> i64;
    fn decoded_samples(&self) -> i64;
}

/// Audio duration in milliseconds, rounded up to whole milliseconds.
#[must_use]
pub fn duration_ms(provider: &dyn AudioProvider) -> i64 {
    let rate = provider.sample_rate();
    if rate <= 0 {
        return 0;
    }
    (provider.num_samples() * 1000 + rate - 1) / rate
}

/// Fixed-geometry provider for tests and silence placeholders.
#[derive(Debug)]
pub struct ConstantAudioProvider {
    sample_rate: i64,
    num_samples: i64,
    decoded: AtomicI64,
}

impl ConstantAudioProvider {
    #[must_use]
    pub fn new(sample_rate: i64, num_samples: i64) -> Self {
        Self {
            sample_rate,
            num_samples,
            decoded: AtomicI64::new(num_samples),
        }
    }

    /// Same geometry but reporting only `decoded` samples ready so far.
    #[must_use]
    pub fn partially_decoded(sample_rate: i64, num_samples: i64, decoded: i64) -> Self {
        Self {
            sample_rate,
            num_samples,
            decoded: AtomicI64::new(decoded),
        }
    }

    pub fn set_decoded(&self, decoded: i64) {
        self.decoded.store(decoded, Ordering::Relaxed);
    }
}

impl AudioProvider for ConstantAudioProvider {
    fn sample_rate(&self) -> i64 {
        self.sample_rate
    }

    fn num_samples(&self) -> i64 {
        self.num_samples
    }

    fn decoded_samples(&self) -> i64 {
        self.decoded.load(Ordering::Relaxed)
    }
}

/// Predicted decode position while audio is still loading.
///
/// Polled from a periodic host timer. The prediction averages the observed
/// decode speed and never moves backwards, so the loading edge drawn over the
/// waveform does not jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    last_decoded: i64,
    speed_samples_per_ms: f64,
    predicted_ms: Option<i64>,
    done: bool,
}

impl LoadProgress {
    /// Starts tracking a provider that currently reports `decoded` samples.
    #[must_use]
    pub fn begin(decoded: i64) -> Self {
        Self {
            last_decoded: decoded,
            speed_samples_per_ms: 0.0,
            predicted_ms: None,
            done: false,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn predicted_ms(&self) -> Option<i64> {
        self.predicted_ms
    }

    /// One timer tick: `elapsed_ms` is the time since tracking began.
    ///
    /// Returns the new predicted position, or `None` once loading finished.
    pub fn poll(&mut self, provider: &dyn AudioProvider, elapsed_ms: i64) -> Option<i64> {
        if self.done {
            return None;
        }
        if elapsed_ms <= 0 {
            return self.predicted_ms;
        }

        let decoded = provider.decoded_samples();
        if decoded != self.last_decoded {
            self.speed_samples_per_ms =
                (self.speed_samples_per_ms + decoded as f64 / elapsed_ms as f64) / 2.0;
        }
        self.last_decoded = decoded;

        if decoded >= provider.num_samples() {
            self.done = true;
            self.predicted_ms = None;
            return None;
        }
        if self.speed_samples_per_ms == 0.0 {
            return self.predicted_ms;
        }

        let rate = provider.sample_rate();
        if rate <= 0 {
            return self.predicted_ms;
        }
        let predicted =
            (elapsed_ms as f64 * self.speed_samples_per_ms * 1000.0 / rate as f64) as i64;
        if self.predicted_ms.is_none_or(|current| predicted > current) {
            self.predicted_ms = Some(predicted);
        }
        self.predicted_ms
    }
}
