use cuetime_rs::core::TimeRange;
use cuetime_rs::markers::{BoundaryFeet, MarkerSlot, MarkerStyle, TimeableLine};
use cuetime_rs::subs::{SubtitleFile, SubtitleLine};

fn bound_line(start: i64, end: i64) -> (TimeableLine, SubtitleFile) {
    let mut file = SubtitleFile::new();
    let id = file.push_line(SubtitleLine::new(start, end));
    let mut line = TimeableLine::new(MarkerStyle::BoundaryStart, MarkerStyle::BoundaryEnd);
    assert!(line.set_line(id, &file));
    (line, file)
}

#[test]
fn set_line_resets_markers_to_line_times() {
    let (line, _file) = bound_line(1000, 2000);
    assert_eq!(line.left().position, 1000);
    assert_eq!(line.right().position, 2000);
    assert_eq!(line.left().style, MarkerStyle::BoundaryStart);
    assert_eq!(line.right().style, MarkerStyle::BoundaryEnd);
    assert_eq!(line.left().feet, BoundaryFeet::Right);
    assert_eq!(line.right().feet, BoundaryFeet::Left);
}

#[test]
fn crossing_markers_swaps_styles_not_slots() {
    let (mut line, _file) = bound_line(1000, 2000);
    let left_slot = line.left_slot();
    assert_eq!(left_slot, MarkerSlot::M1);

    // Drag the left marker past the right one.
    line.set_marker_position(left_slot, 2500);

    // The physical marker kept its position assignment...
    assert_eq!(line.marker_position(MarkerSlot::M1), 2500);
    assert_eq!(line.marker_position(MarkerSlot::M2), 2000);
    // ...but the left/right indirection and the styles flipped.
    assert_eq!(line.left_slot(), MarkerSlot::M2);
    assert_eq!(line.left().position, 2000);
    assert_eq!(line.right().position, 2500);
    assert_eq!(line.left().style, MarkerStyle::BoundaryStart);
    assert_eq!(line.right().style, MarkerStyle::BoundaryEnd);
    assert_eq!(line.left().feet, BoundaryFeet::Right);
    assert_eq!(line.right().feet, BoundaryFeet::Left);
}

#[test]
fn rebinding_to_untimed_line_keeps_markers() {
    let (mut line, mut file) = bound_line(1000, 2000);
    let untimed = file.push_line(SubtitleLine::new(2500, 0));

    assert!(!line.set_line(untimed, &file));
    assert_eq!(line.left().position, 1000);
    assert_eq!(line.right().position, 2000);

    // Applying writes the pending marker positions into the new line.
    line.apply(&mut file);
    let written = file.line(untimed).expect("line exists");
    assert_eq!((written.start_ms, written.end_ms), (1000, 2000));
}

#[test]
fn rebinding_to_timed_line_resets() {
    let (mut line, mut file) = bound_line(1000, 2000);
    let other = file.push_line(SubtitleLine::new(4000, 5000));
    assert!(line.set_line(other, &file));
    assert_eq!(line.left().position, 4000);
    assert_eq!(line.right().position, 5000);
}

#[test]
fn apply_round_trips_line_times() {
    let (line, mut file) = bound_line(1000, 2000);
    let id = line.line_id().expect("bound");
    line.apply(&mut file);
    let written = file.line(id).expect("line exists");
    assert_eq!((written.start_ms, written.end_ms), (1000, 2000));
}

#[test]
fn apply_without_line_is_a_no_op() {
    let mut file = SubtitleFile::new();
    let line = TimeableLine::new(MarkerStyle::BoundaryStart, MarkerStyle::BoundaryEnd);
    line.apply(&mut file);
    assert!(file.is_empty());
}

#[test]
fn contains_marker_checks_both_markers() {
    let (line, _file) = bound_line(1000, 2000);
    assert!(line.contains_marker(TimeRange::new(900, 1100)));
    assert!(line.contains_marker(TimeRange::new(1900, 2100)));
    assert!(!line.contains_marker(TimeRange::new(1100, 1900)));
    assert!(!line.contains_marker(TimeRange::new(2001, 2100)));
}

#[test]
fn time_range_spans_markers() {
    let (line, _file) = bound_line(1000, 2000);
    let range = line.time_range();
    assert_eq!((range.begin(), range.end()), (1000, 2000));
    assert_eq!(range.length(), 1000);
}
