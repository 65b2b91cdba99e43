use cuetime_rs::api::{AudioDisplay, AudioDisplayConfig, TimingContext};
use cuetime_rs::audio::{AudioProvider, ConstantAudioProvider, LoadProgress, duration_ms};
use cuetime_rs::render::NullRenderer;

#[test]
fn duration_rounds_up_to_whole_milliseconds() {
    let provider = ConstantAudioProvider::new(48_000, 48_001);
    assert_eq!(duration_ms(&provider), 1001);

    let provider = ConstantAudioProvider::new(1000, 100_000);
    assert_eq!(duration_ms(&provider), 100_000);

    let provider = ConstantAudioProvider::new(0, 100_000);
    assert_eq!(duration_ms(&provider), 0);
}

#[test]
fn partially_decoded_provider_reports_progress() {
    let provider = ConstantAudioProvider::partially_decoded(1000, 10_000, 2000);
    assert_eq!(provider.decoded_samples(), 2000);
    provider.set_decoded(5000);
    assert_eq!(provider.decoded_samples(), 5000);
}

#[test]
fn load_progress_predicts_and_never_regresses() {
    let provider = ConstantAudioProvider::partially_decoded(1000, 10_000, 0);
    let mut progress = LoadProgress::begin(0);

    provider.set_decoded(2000);
    assert_eq!(progress.poll(&provider, 1000), Some(1000));

    provider.set_decoded(2500);
    assert_eq!(progress.poll(&provider, 2000), Some(2250));

    // No new samples: the prediction keeps creeping forward, never back.
    let next = progress.poll(&provider, 2100).expect("still predicting");
    assert!(next >= 2250);
    assert!(!progress.is_done());
}

#[test]
fn load_progress_finishes_when_fully_decoded() {
    let provider = ConstantAudioProvider::partially_decoded(1000, 10_000, 0);
    let mut progress = LoadProgress::begin(0);

    provider.set_decoded(2000);
    let _ = progress.poll(&provider, 1000);

    provider.set_decoded(10_000);
    assert_eq!(progress.poll(&provider, 2000), None);
    assert!(progress.is_done());
    assert_eq!(progress.predicted_ms(), None);
}

#[test]
fn display_tracks_load_progress_over_timer_ticks() {
    let ctx = TimingContext::new();
    let mut display =
        AudioDisplay::with_config(NullRenderer::default(), &ctx, AudioDisplayConfig::default());

    let provider = ConstantAudioProvider::partially_decoded(1000, 100_000, 0);
    display.on_audio_open(&provider);
    assert_eq!(display.load_position_ms(), None);

    provider.set_decoded(20_000);
    display.on_load_timer(&provider, 1000);
    assert!(display.load_position_ms().is_some());

    provider.set_decoded(100_000);
    display.on_load_timer(&provider, 2000);
    assert_eq!(display.load_position_ms(), None);
}
