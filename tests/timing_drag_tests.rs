use cuetime_rs::api::{DialogueTimingController, TimingContext};
use cuetime_rs::core::TimeRange;
use cuetime_rs::markers::{MarkerStyle, MarkerView};
use cuetime_rs::subs::{LineId, SubtitleLine};

fn setup(lines: &[(i64, i64)]) -> (TimingContext, DialogueTimingController, Vec<LineId>) {
    let mut ctx = TimingContext::new();
    let ids: Vec<LineId> = lines
        .iter()
        .map(|&(start, end)| ctx.file.push_line(SubtitleLine::new(start, end)))
        .collect();
    let mut timing = DialogueTimingController::new(&ctx);
    if let Some(&first) = ids.first() {
        ctx.selection.set_selection_and_active(ids.clone(), first);
        timing.pump(&ctx);
    }
    (ctx, timing, ids)
}

fn views(timing: &DialogueTimingController, begin: i64, end: i64) -> Vec<MarkerView> {
    let mut out = Vec::new();
    timing.get_markers(TimeRange::new(begin, end), &mut out);
    out
}

#[test]
fn dragging_left_past_right_swaps_the_pair() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000)]);

    let left = timing.active_left_handle();
    timing.on_marker_drag(&mut ctx, &[left], 2500, 0);

    // The physical marker now sits at 2500 and became the right boundary.
    assert_eq!(timing.marker_position(left), Some(2500));
    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (2000, 2500));

    let seen = views(&timing, 1500, 2600);
    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].time_ms, seen[0].style), (2000, MarkerStyle::BoundaryStart));
    assert_eq!((seen[1].time_ms, seen[1].style), (2500, MarkerStyle::BoundaryEnd));
}

#[test]
fn group_drag_shifts_every_marker_and_snaps_to_keyframes() {
    let (mut ctx, mut timing, ids) = setup(&[(1000, 2000), (1100, 1900)]);
    timing.set_keyframes(vec![980]);

    let handles = timing.on_left_click(&mut ctx, 1500, false, true, 50, 50);
    assert_eq!(handles.len(), 4);

    // +20 raw shift, then the whole group snaps -40 onto the keyframe.
    timing.on_marker_drag(&mut ctx, &handles, 1520, 50);

    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (980, 1980));

    let line0 = ctx.file.line(ids[0]).expect("line exists");
    assert_eq!((line0.start_ms, line0.end_ms), (980, 1980));
    let line1 = ctx.file.line(ids[1]).expect("line exists");
    assert_eq!((line1.start_ms, line1.end_ms), (1080, 1880));

    // The drag anchor absorbed the snap: dragging back to 1480 is a no-op.
    timing.on_marker_drag(&mut ctx, &handles, 1480, 50);
    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (980, 1980));
}

#[test]
fn single_marker_drag_snaps_to_companion_boundaries() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000), (2030, 3000)]);

    let right = timing.active_right_handle();
    timing.on_marker_drag(&mut ctx, &[right], 2010, 50);

    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (1000, 2030));
}

#[test]
fn keyframes_win_ties_against_companion_markers() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000), (1490, 3000)]);
    timing.set_keyframes(vec![1510]);

    let left = timing.active_left_handle();
    timing.on_marker_drag(&mut ctx, &[left], 1500, 20);

    // Keyframe at +10 and companion boundary at -10: the keyframe is
    // checked first and equal distances keep the first candidate.
    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (1510, 2000));
}

#[test]
fn video_position_is_a_snap_candidate() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000)]);
    timing.set_video_position(Some(995));
    assert_eq!(timing.video_position(), Some(995));

    let left = timing.active_left_handle();
    timing.on_marker_drag(&mut ctx, &[left], 1005, 20);

    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (995, 2000));
}

#[test]
fn nothing_snaps_outside_the_range() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000)]);
    timing.set_keyframes(vec![2300]);

    let right = timing.active_right_handle();
    timing.on_marker_drag(&mut ctx, &[right], 2200, 50);

    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (1000, 2200));
}

#[test]
fn zero_snap_range_never_snaps() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000)]);
    timing.set_keyframes(vec![1001]);

    let left = timing.active_left_handle();
    timing.on_marker_drag(&mut ctx, &[left], 1005, 0);

    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (1005, 2000));
}

#[test]
fn empty_marker_list_is_a_no_op() {
    let (mut ctx, mut timing, _ids) = setup(&[(1000, 2000)]);
    let steps_before = ctx.file.undo_steps().len();
    timing.set_markers(&mut ctx, &[], 500, 0);
    assert_eq!(ctx.file.undo_steps().len(), steps_before);
    let range = timing.active_line_range();
    assert_eq!((range.begin(), range.end()), (1000, 2000));
}

#[test]
fn marker_provision_stays_sorted_through_drags() {
    let (mut ctx, mut timing, _ids) =
        setup(&[(1000, 2000), (1100, 1900), (5000, 6000)]);

    let left = timing.active_left_handle();
    timing.on_marker_drag(&mut ctx, &[left], 2500, 0);
    let right = timing.active_right_handle();
    timing.on_marker_drag(&mut ctx, &[right], 800, 0);

    let seen = views(&timing, 0, 10_000);
    assert_eq!(seen.len(), 6);
    for pair in seen.windows(2) {
        assert!(pair[0].time_ms <= pair[1].time_ms);
    }
}

#[test]
fn keyframes_paint_after_boundary_markers() {
    let (_ctx, mut timing, _ids) = setup(&[(1000, 2000)]);
    timing.set_keyframes(vec![1500]);

    let seen = views(&timing, 0, 10_000);
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[2].style, MarkerStyle::Keyframe);
    assert_eq!(seen[2].time_ms, 1500);
}
