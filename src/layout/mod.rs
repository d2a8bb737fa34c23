//! One render pass: span → lanes → visible window → positions.

pub mod bounds;
pub mod lanes;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;

use crate::config::LayoutConfig;
use crate::model::item::Scheduled;
use crate::model::timeline::{ItemPosition, MonthMarkers, Viewport, VisibleRange};

pub use bounds::{boundaries, TimelineSpan};
pub use lanes::{assign_lane_indices, assign_lanes, peak_concurrency, Lane, LanePolicy};

/// Lane assignment kept between renders.
///
/// Lanes depend only on the items' dates, so zooming, panning or renaming
/// reuse the previous assignment.
#[derive(Debug, Default)]
pub struct LaneCache {
    fingerprint: Option<u64>,
    lanes: Vec<Vec<usize>>,
    recomputed: u64,
}

impl LaneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lanes as indices into `items`, recomputed only when dates, order or
    /// `policy` changed since the last call.
    pub fn lanes<T: Scheduled>(&mut self, items: &[T], policy: LanePolicy) -> &[Vec<usize>] {
        let fingerprint = fingerprint(items, policy);
        if self.fingerprint != Some(fingerprint) {
            self.lanes = assign_lane_indices(items, policy);
            self.fingerprint = Some(fingerprint);
            self.recomputed += 1;
        }
        &self.lanes
    }

    /// How many times lanes were actually reassigned.
    pub fn recompute_count(&self) -> u64 {
        self.recomputed
    }

    pub fn invalidate(&mut self) {
        self.fingerprint = None;
    }
}

fn fingerprint<T: Scheduled>(items: &[T], policy: LanePolicy) -> u64 {
    let mut hasher = DefaultHasher::new();
    policy.hash(&mut hasher);
    items.len().hash(&mut hasher);
    for item in items {
        item.start_at().hash(&mut hasher);
        item.end_at().hash(&mut hasher);
    }
    hasher.finish()
}

/// An item placed on screen.
#[derive(Debug)]
pub struct PlacedItem<'a, T> {
    pub item: &'a T,
    pub lane: usize,
    pub position: ItemPosition,
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct TimelineLayout<'a, T> {
    pub span: TimelineSpan,
    pub visible: VisibleRange,
    pub lanes: Vec<Lane<'a, T>>,
}

impl<'a, T: Scheduled> TimelineLayout<'a, T> {
    /// Build a layout from scratch, without caching.
    pub fn compute(items: &'a [T], viewport: &Viewport, config: &LayoutConfig, now: NaiveDateTime) -> Self {
        let span = boundaries(items, config.padding_days, now);
        let visible = viewport.visible_range(&span);
        let lanes = assign_lanes(items, config.lane_policy);
        Self { span, visible, lanes }
    }

    /// Build a layout reusing `cache` for the lane assignment.
    pub fn with_cache(
        items: &'a [T],
        viewport: &Viewport,
        config: &LayoutConfig,
        now: NaiveDateTime,
        cache: &mut LaneCache,
    ) -> Self {
        let span = boundaries(items, config.padding_days, now);
        let visible = viewport.visible_range(&span);
        let lanes = cache
            .lanes(items, config.lane_policy)
            .iter()
            .map(|lane| lane.iter().filter_map(|&i| items.get(i)).collect())
            .collect();
        Self { span, visible, lanes }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn item_count(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    /// Every item with its lane index and on-screen position.
    pub fn placed(&self) -> impl Iterator<Item = PlacedItem<'a, T>> + '_ {
        self.lanes.iter().enumerate().flat_map(move |(lane, items)| {
            items.iter().map(move |&item| PlacedItem {
                item,
                lane,
                position: self.visible.position(item),
            })
        })
    }

    pub fn month_markers(&self) -> MonthMarkers {
        self.visible.month_markers()
    }

    /// Header line, e.g. `"5 timeline items arranged in 2 lanes"`.
    pub fn summary(&self) -> String {
        format!(
            "{} timeline items arranged in {} lanes",
            self.item_count(),
            self.lane_count()
        )
    }
}
