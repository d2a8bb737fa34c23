use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use timeline_lanes::config::{DragConfig, EngineConfig, RenameConfig};
use timeline_lanes::interaction::{
    DateRange, DragController, Edge, InteractionError, Interactions, NameError, PointerCapture,
    RenameController, RenameOutcome,
};
use timeline_lanes::{Item, ItemPatch, ItemStore, ItemUpdate, Scheduled};

fn design() -> Item {
    Item::new(7u64, "Design", "2021-01-05", "2021-01-10").with_extra("color", "teal")
}

// ── Drag ────────────────────────────────────────────────────────────────

#[test]
fn end_handle_drag_commits_new_end() {
    let capture = PointerCapture::new();
    let item = design();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());

    drag.begin(&item, Edge::End, 300.0, &capture).unwrap();
    assert!(capture.is_listening(&item.id));

    // 2 days at 50 px/day
    drag.pointer_move(400.0);
    let update = drag.finish().unwrap();
    assert_eq!(
        update,
        ItemUpdate {
            id: item.id.clone(),
            patch: ItemPatch::end("2021-01-12"),
        }
    );
    assert!(capture.is_empty());
}

#[test]
fn item_is_untouched_while_dragging() {
    let capture = PointerCapture::new();
    let item = design();
    let before = item.clone();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());
    drag.begin(&item, Edge::Start, 0.0, &capture).unwrap();
    drag.pointer_move(-150.0);
    assert!(drag.preview().is_some());
    assert_eq!(item, before);
}

#[test]
fn start_handle_never_reaches_end() {
    let capture = PointerCapture::new();
    let item = design();
    let end = item.end_at().unwrap().date();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());
    drag.begin(&item, Edge::Start, 0.0, &capture).unwrap();

    for x in [100.0, 1_000.0, 1e9, f64::MAX] {
        drag.pointer_move(x);
        let live = drag.preview().unwrap();
        assert!(live.start < end, "start {} reached end at x={x}", live.start);
    }
    let update = drag.finish().unwrap();
    assert_eq!(update.patch, ItemPatch::start("2021-01-09"));
}

#[test]
fn end_handle_never_reaches_start() {
    let capture = PointerCapture::new();
    let item = design();
    let start = item.start_at().unwrap().date();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());
    drag.begin(&item, Edge::End, 0.0, &capture).unwrap();

    for x in [-100.0, -1_000.0, -1e9, f64::MIN] {
        drag.pointer_move(x);
        let live = drag.preview().unwrap();
        assert!(live.end > start, "end {} reached start at x={x}", live.end);
    }
    let update = drag.finish().unwrap();
    assert_eq!(update.patch, ItemPatch::end("2021-01-06"));
}

#[test]
fn sub_day_movement_commits_nothing() {
    let capture = PointerCapture::new();
    let item = design();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());
    drag.begin(&item, Edge::End, 0.0, &capture).unwrap();
    assert_eq!(drag.pointer_move(24.0), None);
    assert_eq!(drag.finish(), None);
    assert!(capture.is_empty());
}

#[test]
fn cancelled_drag_commits_nothing() {
    let capture = PointerCapture::new();
    let item = design();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());
    drag.begin(&item, Edge::Start, 0.0, &capture).unwrap();
    drag.pointer_move(-200.0);
    drag.cancel();
    assert!(capture.is_empty());
    assert_eq!(drag.finish(), None);
}

#[test]
fn second_begin_is_rejected() {
    let capture = PointerCapture::new();
    let item = design();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());
    drag.begin(&item, Edge::Start, 0.0, &capture).unwrap();
    assert_eq!(
        drag.begin(&item, Edge::End, 0.0, &capture),
        Err(InteractionError::AlreadyDragging)
    );
    assert_eq!(capture.listeners().len(), 1);
}

#[test]
fn dragging_one_edge_keeps_the_other_verbatim() {
    let capture = PointerCapture::new();
    let mut store = ItemStore::with_items(
        "t",
        vec![Item::new(9u64, "Late", "2021-01-05T23:30:00-05:00", "2021-01-10T23:59:59Z")],
    );
    let item = store.items[0].clone();
    let mut drag = DragController::new(item.id.clone(), DragConfig::default());

    drag.begin(&item, Edge::End, 0.0, &capture).unwrap();
    drag.pointer_move(100.0);
    let update = drag.finish().unwrap();
    assert_eq!(update.patch, ItemPatch::end("2021-01-12"));

    assert!(store.apply(&update));
    assert_eq!(store.items[0].start, "2021-01-05T23:30:00-05:00");
    assert_eq!(store.items[0].end, "2021-01-12");

    let item = store.items[0].clone();
    drag.begin(&item, Edge::Start, 0.0, &capture).unwrap();
    drag.pointer_move(-50.0);
    let update = drag.finish().unwrap();
    assert!(store.apply(&update));
    assert_eq!(store.items[0].end, "2021-01-12");
}

#[test]
fn pixels_per_day_scales_snapping() {
    let capture = PointerCapture::new();
    let item = design();
    let mut drag = DragController::new(item.id.clone(), DragConfig { pixels_per_day: 10.0 });
    drag.begin(&item, Edge::End, 0.0, &capture).unwrap();
    assert_eq!(
        drag.pointer_move(30.0),
        Some(DateRange {
            start: item.start_at().unwrap().date(),
            end: chrono::NaiveDate::from_ymd_opt(2021, 1, 13).unwrap(),
        })
    );
}

// ── Rename ──────────────────────────────────────────────────────────────

#[test]
fn commit_sanitizes_whitespace() {
    let mut store = ItemStore::with_items("t", vec![design()]);
    let mut rename = RenameController::new(&store.items[0], RenameConfig::default());
    rename.begin().unwrap();
    rename.input("  New   Name  ", Instant::now());

    let RenameOutcome::Committed(update) = rename.commit() else {
        panic!("expected a commit");
    };
    assert!(store.apply(&update));
    assert_eq!(store.items[0].name, "New Name");
    assert_eq!(store.items[0].extra["color"], "teal");
    assert!(!rename.is_editing());
}

#[test]
fn empty_name_is_rejected_and_item_unchanged() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    rename.begin().unwrap();
    rename.input("   ", Instant::now());

    assert_eq!(rename.commit(), RenameOutcome::Invalid(NameError::TooShort { min: 1 }));
    assert!(rename.is_editing());
    assert_eq!(rename.validation_error(), Some(NameError::TooShort { min: 1 }));
    assert_eq!(item.name, "Design");

    // typing clears the stale error
    rename.input("D", Instant::now());
    assert_eq!(rename.validation_error(), None);
}

#[test]
fn too_long_name_is_rejected() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    rename.begin().unwrap();
    rename.input("x".repeat(101), Instant::now());
    assert_eq!(rename.commit(), RenameOutcome::Invalid(NameError::TooLong { max: 100 }));
}

#[test]
fn unchanged_name_closes_silently() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    rename.begin().unwrap();
    rename.input(" Design ", Instant::now());
    assert_eq!(rename.commit(), RenameOutcome::Unchanged);
    assert!(!rename.is_editing());
}

#[test]
fn escape_restores_original_name() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    rename.begin().unwrap();
    rename.input("Scrapped", Instant::now());
    rename.cancel();
    assert!(!rename.is_editing());
    assert_eq!(rename.displayed_name(), "Design");
    assert_eq!(rename.commit(), RenameOutcome::NotEditing);
}

#[test]
fn autosave_fires_after_debounce_and_keeps_editing() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    let t0 = Instant::now();
    rename.begin().unwrap();
    rename.input("Draft", t0);
    rename.input("Draft two", t0 + Duration::from_millis(1500));

    assert_eq!(rename.tick(t0 + Duration::from_millis(3000)), None);
    let update = rename.tick(t0 + Duration::from_millis(3500)).unwrap();
    assert_eq!(update.patch, ItemPatch::name("Draft two"));
    assert!(rename.is_editing());

    // the saved name is the new baseline
    assert_eq!(rename.commit(), RenameOutcome::Unchanged);
}

#[test]
fn reverting_after_autosave_commits_the_old_name() {
    let mut store = ItemStore::with_items("t", vec![design()]);
    let mut rename = RenameController::new(&store.items[0], RenameConfig::default());
    let t0 = Instant::now();
    rename.begin().unwrap();
    rename.input("Draft two", t0);
    let saved = rename.tick(t0 + Duration::from_secs(3)).unwrap();
    assert!(store.apply(&saved));
    rename.sync_name(&store.items[0].name);

    rename.cancel();
    assert_eq!(rename.displayed_name(), "Draft two");

    rename.begin().unwrap();
    assert_eq!(rename.displayed_name(), "Draft two");
    rename.input("Design", t0 + Duration::from_secs(4));
    let RenameOutcome::Committed(update) = rename.commit() else {
        panic!("expected the old name to be committed");
    };
    assert!(store.apply(&update));
    assert_eq!(store.items[0].name, "Design");
}

#[test]
fn rename_session_seeds_from_current_item_name() {
    let mut store = ItemStore::with_items("t", vec![design()]);
    let mut interactions = Interactions::new(EngineConfig::default());
    interactions.session(&store.items[0]);

    let id = store.items[0].id.clone();
    assert!(store.apply(&ItemUpdate {
        id,
        patch: ItemPatch::name("Design v2"),
    }));
    interactions.begin_rename(&store.items[0]).unwrap();
    let session = interactions.get(&store.items[0].id).unwrap();
    assert_eq!(session.rename.displayed_name(), "Design v2");
}

#[test]
fn autosave_skips_invalid_values() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    let t0 = Instant::now();
    rename.begin().unwrap();
    rename.input("", t0);
    assert_eq!(rename.tick(t0 + Duration::from_secs(3)), None);
    assert_eq!(rename.validation_error(), Some(NameError::TooShort { min: 1 }));
}

#[test]
fn cancel_stops_pending_autosave() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    let t0 = Instant::now();
    rename.begin().unwrap();
    rename.input("Pending", t0);
    rename.cancel();
    assert_eq!(rename.tick(t0 + Duration::from_secs(10)), None);
}

#[test]
fn external_name_changes_ignored_while_editing() {
    let item = design();
    let mut rename = RenameController::new(&item, RenameConfig::default());
    rename.sync_name("Design v2");
    assert_eq!(rename.displayed_name(), "Design v2");

    rename.begin().unwrap();
    rename.input("Mine", Instant::now());
    rename.sync_name("Theirs");
    assert_eq!(rename.displayed_name(), "Mine");
}

// ── Sessions ────────────────────────────────────────────────────────────

#[test]
fn drag_and_rename_are_mutually_exclusive() {
    let item = design();
    let mut interactions = Interactions::new(EngineConfig::default());

    interactions.begin_drag(&item, Edge::End, 0.0, None).unwrap();
    assert_eq!(interactions.begin_rename(&item), Err(InteractionError::Busy));
    interactions.pointer_up();

    interactions.begin_rename(&item).unwrap();
    assert_eq!(
        interactions.begin_drag(&item, Edge::End, 0.0, None),
        Err(InteractionError::Busy)
    );
}

#[test]
fn sessions_for_different_items_are_independent() {
    let a = design();
    let b = Item::new(8u64, "Build", "2021-01-08", "2021-01-20");
    let mut interactions = Interactions::new(EngineConfig::default());

    interactions.begin_drag(&a, Edge::End, 0.0, None).unwrap();
    interactions.begin_rename(&b).unwrap();
    interactions.pointer_move(100.0);

    let updates = interactions.pointer_up();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, a.id);
    assert!(interactions.is_editing());
    assert!(!interactions.is_dragging());
}

#[test]
fn global_pointer_events_reach_captured_items_only() {
    let a = design();
    let b = Item::new(8u64, "Build", "2021-01-08", "2021-01-20");
    let mut interactions = Interactions::new(EngineConfig::default());
    interactions.begin_drag(&a, Edge::Start, 0.0, None).unwrap();
    interactions.session(&b);

    interactions.pointer_move(-100.0);
    assert!(interactions.preview(&a.id).is_some());
    assert_eq!(interactions.preview(&b.id), None);
}

#[test]
fn commits_round_trip_through_the_store() {
    let mut store = ItemStore::with_items("t", vec![design()]);
    let mut interactions = Interactions::new(EngineConfig::default());
    let item = store.items[0].clone();

    interactions.begin_drag(&item, Edge::Start, 0.0, None).unwrap();
    interactions.pointer_move(-100.0);
    for update in interactions.pointer_up() {
        assert!(store.apply(&update));
    }
    interactions.sync(&store.items);

    assert_eq!(store.items[0].start, "2021-01-03");
    assert_eq!(store.items[0].end, "2021-01-10");
    assert_eq!(store.items[0].extra["color"], "teal");
}

#[test]
fn unknown_ids_are_ignored_by_the_store() {
    let mut store = ItemStore::with_items("t", vec![design()]);
    let update = ItemUpdate {
        id: "ghost".into(),
        patch: ItemPatch::name("Boo"),
    };
    assert!(!store.apply(&update));
    assert_eq!(store.items[0].name, "Design");
}
