use std::time::{Duration, Instant};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use timeline_lanes::layout::{assign_lanes, peak_concurrency, LanePolicy};
use timeline_lanes::Item;

fn item(id: u64, start: &str, end: &str) -> Item {
    Item::new(id, format!("Item {id}"), start, end)
}

fn ids(lanes: &[Vec<&Item>]) -> Vec<Vec<String>> {
    lanes
        .iter()
        .map(|lane| lane.iter().map(|i| i.id.to_string()).collect())
        .collect()
}

fn lanes_of(items: &[Item], policy: LanePolicy) -> Vec<Vec<String>> {
    ids(&assign_lanes(items, policy))
}

#[test]
fn empty_input_has_no_lanes() {
    let items: Vec<Item> = Vec::new();
    assert!(assign_lanes(&items, LanePolicy::default()).is_empty());
}

#[test]
fn single_item_gets_its_own_lane() {
    let items = vec![item(1, "2021-01-01", "2021-01-10")];
    assert_eq!(lanes_of(&items, LanePolicy::default()), vec![vec!["1"]]);
}

#[test]
fn disjoint_items_share_one_lane() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-05"),
        item(2, "2021-01-10", "2021-01-15"),
        item(3, "2021-01-20", "2021-01-25"),
    ];
    assert_eq!(lanes_of(&items, LanePolicy::default()), vec![vec!["1", "2", "3"]]);
}

#[test]
fn overlapping_items_split_into_two_lanes() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-10"),
        item(2, "2021-01-05", "2021-01-15"),
        item(3, "2021-01-12", "2021-01-20"),
    ];
    assert_eq!(
        lanes_of(&items, LanePolicy::default()),
        vec![vec!["1", "3"], vec!["2"]]
    );
}

#[test]
fn mixed_overlap_reuses_first_lane() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-10"),
        item(2, "2021-01-05", "2021-01-15"),
        item(3, "2021-01-20", "2021-01-25"),
        item(4, "2021-01-30", "2021-02-05"),
    ];
    assert_eq!(
        lanes_of(&items, LanePolicy::default()),
        vec![vec!["1", "3", "4"], vec!["2"]]
    );
}

#[test]
fn input_order_does_not_matter() {
    let items = vec![
        item(3, "2021-01-20", "2021-01-25"),
        item(1, "2021-01-01", "2021-01-10"),
        item(2, "2021-01-05", "2021-01-15"),
    ];
    assert_eq!(
        lanes_of(&items, LanePolicy::default()),
        vec![vec!["1", "3"], vec!["2"]]
    );
}

#[test]
fn same_start_stacks_in_input_order() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-10"),
        item(2, "2021-01-01", "2021-01-15"),
        item(3, "2021-01-01", "2021-01-05"),
    ];
    assert_eq!(
        lanes_of(&items, LanePolicy::default()),
        vec![vec!["1"], vec!["2"], vec!["3"]]
    );
}

#[test]
fn touching_items_share_a_lane_by_default() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-10"),
        item(2, "2021-01-10", "2021-01-20"),
        item(3, "2021-01-20", "2021-01-30"),
    ];
    assert_eq!(lanes_of(&items, LanePolicy::Touching), vec![vec!["1", "2", "3"]]);
}

#[test]
fn inclusive_policy_separates_touching_items() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-10"),
        item(2, "2021-01-10", "2021-01-20"),
        item(3, "2021-01-20", "2021-01-30"),
    ];
    assert_eq!(
        lanes_of(&items, LanePolicy::Inclusive),
        vec![vec!["1", "3"], vec!["2"]]
    );
}

#[test]
fn very_close_dates_depend_on_policy() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-01"),
        item(2, "2021-01-01", "2021-01-02"),
        item(3, "2021-01-02", "2021-01-03"),
    ];
    // each item starts where the previous one ends: 1 lane touching, 2 inclusive
    assert_eq!(lanes_of(&items, LanePolicy::Touching), vec![vec!["1", "2", "3"]]);
    assert_eq!(
        lanes_of(&items, LanePolicy::Inclusive),
        vec![vec!["1", "3"], vec!["2"]]
    );
}

#[test]
fn leap_day_ranges_depend_on_policy() {
    let items = vec![
        item(1, "2020-02-28", "2020-03-01"),
        item(2, "2020-02-29", "2020-03-02"),
        item(3, "2020-03-01", "2020-03-03"),
    ];
    // 2 lanes touching, 3 inclusive
    assert_eq!(
        lanes_of(&items, LanePolicy::Touching),
        vec![vec!["1", "3"], vec!["2"]]
    );
    assert_eq!(peak_concurrency(&items, LanePolicy::Touching), 2);
    assert_eq!(
        lanes_of(&items, LanePolicy::Inclusive),
        vec![vec!["1"], vec!["2"], vec!["3"]]
    );
    assert_eq!(peak_concurrency(&items, LanePolicy::Inclusive), 3);
}

#[test]
fn complex_overlap_uses_three_lanes() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-20"),
        item(2, "2021-01-05", "2021-01-15"),
        item(3, "2021-01-10", "2021-01-25"),
        item(4, "2021-01-30", "2021-02-10"),
        item(5, "2021-02-05", "2021-02-15"),
    ];
    for policy in [LanePolicy::Touching, LanePolicy::Inclusive] {
        assert_eq!(
            lanes_of(&items, policy),
            vec![vec!["1", "4"], vec!["2", "5"], vec!["3"]]
        );
        assert_eq!(peak_concurrency(&items, policy), 3);
    }
}

#[test]
fn mixed_date_formats_compare_as_timestamps() {
    let items = vec![
        item(1, "2021-01-01T00:00:00Z", "2021-01-10T23:59:59Z"),
        item(2, "2021-01-05", "2021-01-15"),
        item(3, "2021-01-12T12:00:00", "2021-01-20T12:00:00"),
    ];
    assert_eq!(
        lanes_of(&items, LanePolicy::default()),
        vec![vec!["1", "3"], vec!["2"]]
    );
}

#[test]
fn unparsable_items_are_isolated_and_sorted_last() {
    let items = vec![
        item(1, "not a date", "2021-01-05"),
        item(2, "2021-01-01", "2021-01-05"),
        item(3, "2021-01-10", "garbage"),
        item(4, "2021-01-20", "2021-01-25"),
    ];
    // 3 has no end, so nothing can follow it in its lane.
    assert_eq!(
        lanes_of(&items, LanePolicy::default()),
        vec![vec!["2", "3"], vec!["4"], vec!["1"]]
    );
}

#[test]
fn lanes_keep_the_original_items() {
    let items = vec![
        item(1, "2021-01-01", "2021-01-05").with_extra("color", "red"),
        item(2, "2021-01-03", "2021-01-08").with_extra("meta", json!({ "owner": "ops" })),
    ];
    let lanes = assign_lanes(&items, LanePolicy::default());
    assert!(std::ptr::eq(lanes[0][0], &items[0]));
    assert!(std::ptr::eq(lanes[1][0], &items[1]));
    assert_eq!(lanes[1][0].extra["meta"]["owner"], "ops");
}

#[test]
fn passthrough_fields_survive_json() {
    let raw = json!([
        { "id": 1, "start": "2021-01-01", "end": "2021-01-05", "name": "A", "color": "red" },
        { "id": "b", "start": null, "end": "2021-01-05", "name": "B" }
    ]);
    let items: Vec<Item> = serde_json::from_value(raw).unwrap();
    assert_eq!(items[0].extra["color"], "red");
    assert_eq!(items[1].start, "");

    let back = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(back["color"], "red");
    assert_eq!(back["id"], "1");
}

#[test]
fn thousand_items_assign_quickly() {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let items: Vec<Item> = (0..1000u64)
        .map(|i| {
            let start = base + chrono::Duration::days((i * 7 % 365) as i64);
            let end = start + chrono::Duration::days((i % 30) as i64 + 1);
            item(i, &start.to_string(), &end.to_string())
        })
        .collect();

    let started = Instant::now();
    let lanes = assign_lanes(&items, LanePolicy::default());
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(lanes.iter().map(Vec::len).sum::<usize>(), 1000);
    assert_eq!(lanes.len(), peak_concurrency(&items, LanePolicy::default()));
}
