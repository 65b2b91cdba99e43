use cuetime_rs::core::TimeRange;
use cuetime_rs::markers::{IndexKey, LineSlot, MarkerHandle, MarkerIndex, MarkerSlot};

/// Key resolver over a plain position table: companion `i` owns positions
/// `table[i]`, mirroring how the controller resolves handles through lines.
fn key_for(table: &[(i64, i64)]) -> impl Fn(MarkerHandle) -> IndexKey + '_ {
    move |handle| {
        let LineSlot::Companion(i) = handle.line else {
            panic!("test table only holds companion lines");
        };
        let position = match handle.slot {
            MarkerSlot::M1 => table[i].0,
            MarkerSlot::M2 => table[i].1,
        };
        IndexKey {
            position,
            rank: i as u32,
            slot: handle.slot.index() as u8,
        }
    }
}

fn handles(count: usize) -> Vec<MarkerHandle> {
    (0..count)
        .flat_map(|i| {
            [
                MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M1),
                MarkerHandle::new(LineSlot::Companion(i), MarkerSlot::M2),
            ]
        })
        .collect()
}

fn positions(index: &MarkerIndex, table: &[(i64, i64)]) -> Vec<i64> {
    let key = key_for(table);
    index
        .as_slice()
        .iter()
        .map(|&handle| key(handle).position)
        .collect()
}

#[test]
fn rebuild_sorts_by_position() {
    let table = [(3000, 1000), (2000, 500)];
    let mut index = MarkerIndex::new();
    index.rebuild(handles(2), key_for(&table));
    assert_eq!(positions(&index, &table), vec![500, 1000, 2000, 3000]);
}

#[test]
fn range_query_is_half_open() {
    let table = [(1000, 2000), (3000, 4000)];
    let mut index = MarkerIndex::new();
    index.rebuild(handles(2), key_for(&table));

    let key = key_for(&table);
    let hits: Vec<i64> = index
        .range(TimeRange::new(2000, 4000), &key)
        .iter()
        .map(|&h| key(h).position)
        .collect();
    assert_eq!(hits, vec![2000, 3000]);

    assert!(index.range(TimeRange::new(4001, 9000), &key).is_empty());
}

#[test]
fn resort_slice_restores_order_after_local_moves() {
    let mut table = vec![(1000, 2000), (1500, 2500), (5000, 6000)];
    let mut index = MarkerIndex::new();
    index.rebuild(handles(3), key_for(&table));

    // Move line 0's markers within [1000, 2600]: locate the slice first,
    // mutate, then re-sort just that slice.
    let bounds = index.bounds(1000, 2600, key_for(&table));
    table[0] = (2600, 1600);
    index.resort_slice(bounds, key_for(&table));

    assert_eq!(
        positions(&index, &table),
        vec![1500, 1600, 2500, 2600, 5000, 6000]
    );
}

#[test]
fn bounds_are_inclusive_of_both_ends() {
    let table = [(1000, 2000), (3000, 4000)];
    let mut index = MarkerIndex::new();
    index.rebuild(handles(2), key_for(&table));

    let (begin, end) = index.bounds(2000, 3000, key_for(&table));
    assert_eq!((begin, end), (1, 3));
}

#[test]
fn equal_positions_order_by_rank() {
    // Both lines share a boundary at 2000; the higher-ranked line sorts last.
    let table = [(2000, 2500), (1500, 2000)];
    let mut index = MarkerIndex::new();
    index.rebuild(handles(2), key_for(&table));

    let slice = index.as_slice();
    assert_eq!(slice[1], MarkerHandle::new(LineSlot::Companion(0), MarkerSlot::M1));
    assert_eq!(slice[2], MarkerHandle::new(LineSlot::Companion(1), MarkerSlot::M2));
}
