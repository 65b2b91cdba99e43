use cuetime_rs::api::{AudioDisplay, AudioDisplayConfig, TimingContext};
use cuetime_rs::audio::ConstantAudioProvider;
use cuetime_rs::core::{TimeRange, zoom_level_description};
use cuetime_rs::interaction::{MouseButton, PointerEvent};
use cuetime_rs::render::NullRenderer;
use cuetime_rs::subs::SubtitleLine;

#[test]
fn engine_smoke_flow() {
    let mut ctx = TimingContext::new();
    let first = ctx.file.push_line(SubtitleLine::new(1000, 2000));
    let second = ctx.file.push_line(SubtitleLine::new(4000, 5000));

    let config = AudioDisplayConfig {
        client_width: 600,
        client_height: 70,
        timeline_height: 20,
        zoom_level: 0,
    };
    let mut display = AudioDisplay::with_config(NullRenderer::default(), &ctx, config);

    let provider = ConstantAudioProvider::new(1000, 100_000);
    display.on_audio_open(&provider);
    assert_eq!(display.ms_per_pixel(), 20.0);
    assert_eq!(zoom_level_description(display.zoom_level()), "100%, 50 pixel/second");

    ctx.selection.set_selection_and_active(vec![first, second], first);
    display.pump(&ctx);

    // Grab the start boundary and drag it twice, then let go.
    display.on_pointer_event(&mut ctx, &PointerEvent::button_down(MouseButton::Left, 50, 30));
    assert!(display.has_capture());
    display.on_pointer_event(
        &mut ctx,
        &PointerEvent::motion(45, 30).with_buttons_held(true, false, false),
    );
    display.on_pointer_event(
        &mut ctx,
        &PointerEvent::motion(40, 30).with_buttons_held(true, false, false),
    );
    display.on_pointer_event(&mut ctx, &PointerEvent::button_up(MouseButton::Left, 40, 30));
    assert!(!display.has_capture());

    // The whole gesture coalesced into one undo step on the document.
    let line = ctx.file.line(first).expect("line exists");
    assert_eq!((line.start_ms, line.end_ms), (800, 2000));
    assert_eq!(ctx.file.undo_steps().len(), 1);
    assert_eq!(ctx.file.undo_steps()[0].amend, Some(first));

    // Views read markers over the visible range; the companion line's
    // boundaries are in there too.
    let mut markers = Vec::new();
    display
        .timing()
        .get_markers(TimeRange::new(0, 100_000), &mut markers);
    assert_eq!(markers.len(), 4);

    // Dialogue timing has no labels, and the ideal visible range tracks
    // the active line.
    let mut labels = Vec::new();
    display
        .timing()
        .labels_in(TimeRange::new(0, 100_000), &mut labels);
    assert!(labels.is_empty());
    let ideal = display.timing().ideal_visible_time_range();
    assert_eq!((ideal.begin(), ideal.end()), (800, 2000));

    assert!(display.renderer().invalidations > 0);
}

#[test]
fn client_resize_reclamps_and_renotifies() {
    let ctx = TimingContext::new();
    let mut display =
        AudioDisplay::with_config(NullRenderer::default(), &ctx, AudioDisplayConfig::default());
    let provider = ConstantAudioProvider::new(1000, 100_000);
    display.on_audio_open(&provider);

    display.scroll_pixel_to_left(4400); // 5000 - 600
    assert_eq!(display.scroll_left(), 4400);

    display.set_client_size(4000, 120).expect("valid size");
    assert_eq!(display.renderer().last_height, 100);
    // A wider client shrinks the legal scroll range.
    assert_eq!(display.scroll_left(), 1000);

    assert!(display.set_client_size(0, 120).is_err());
}

#[test]
fn display_config_round_trips_through_json() {
    let config = AudioDisplayConfig {
        client_width: 1280,
        client_height: 90,
        timeline_height: 24,
        zoom_level: -3,
    };
    let json = config.to_json_pretty().expect("serialize");
    let restored = AudioDisplayConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
}

#[test]
fn mouse_enter_and_leave_policy() {
    let mut ctx = TimingContext::new();
    let first = ctx.file.push_line(SubtitleLine::new(1000, 2000));
    let mut display =
        AudioDisplay::with_config(NullRenderer::default(), &ctx, AudioDisplayConfig::default());
    let provider = ConstantAudioProvider::new(1000, 100_000);
    display.on_audio_open(&provider);
    ctx.selection.set_selection_and_active(vec![first], first);
    display.pump(&ctx);

    assert!(display.on_mouse_enter(&ctx));
    ctx.options.set_bool("Audio/Auto/Focus", false);
    assert!(!display.on_mouse_enter(&ctx));

    // Leaving while paused clears the visual cursor; while playing it stays.
    display.set_track_cursor(100, false);
    display.set_playing(true);
    display.set_track_cursor(100, false);
    display.on_mouse_leave();
    assert_eq!(display.track_cursor_pos(), Some(100));

    display.set_playing(false);
    display.on_mouse_leave();
    assert_eq!(display.track_cursor_pos(), None);
}
