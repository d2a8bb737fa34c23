//! Greedy lane packing (interval-graph colouring).
//!
//! Items are visited in start order and dropped into the first lane whose
//! last item has already ended. For interval graphs this first-fit order is
//! optimal: the lane count equals the largest number of items that are
//! active at one instant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::item::Scheduled;

/// One track of mutually non-overlapping items, in start order.
pub type Lane<'a, T> = Vec<&'a T>;

/// How a lane's last end date is compared with the next item's start.
///
/// Widths on screen always count the end date as occupied (`+1` day), so
/// under `Touching` two bars in one lane may share their boundary day. That
/// mismatch is accepted for the default; `Inclusive` matches the widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanePolicy {
    /// Half-open ranges: an item may start on the date the previous one ends.
    #[default]
    Touching,
    /// Closed ranges: the end date is occupied, so the next item must start
    /// strictly later.
    Inclusive,
}

impl LanePolicy {
    /// Whether an item starting at `start` fits after a lane ending at
    /// `last_end`. Missing timestamps never fit.
    pub fn fits(self, last_end: Option<NaiveDateTime>, start: Option<NaiveDateTime>) -> bool {
        match (last_end, start) {
            (Some(end), Some(start)) => match self {
                LanePolicy::Touching => end <= start,
                LanePolicy::Inclusive => end < start,
            },
            _ => false,
        }
    }
}

struct LaneSlot {
    last_end: Option<NaiveDateTime>,
    members: Vec<usize>,
}

/// Partition `items` into the minimum number of non-overlapping lanes.
///
/// Items keep their identity (the lanes hold references into `items`).
/// An item with an unparsable start never fits an existing lane and always
/// opens a new one; unparsable starts sort after every parsable start.
pub fn assign_lanes<T: Scheduled>(items: &[T], policy: LanePolicy) -> Vec<Lane<'_, T>> {
    assign_lane_indices(items, policy)
        .into_iter()
        .map(|lane| lane.into_iter().map(|i| &items[i]).collect())
        .collect()
}

/// [`assign_lanes`], returning indices into `items` instead of references.
pub fn assign_lane_indices<T: Scheduled>(items: &[T], policy: LanePolicy) -> Vec<Vec<usize>> {
    let mut order: Vec<(usize, Option<NaiveDateTime>)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (i, item.start_at()))
        .collect();
    // `sort_by` is stable, equal starts keep input order
    order.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut lanes: Vec<LaneSlot> = Vec::new();
    for (i, start) in order {
        let end = items[i].end_at();
        match lanes.iter_mut().find(|lane| policy.fits(lane.last_end, start)) {
            Some(lane) => {
                lane.members.push(i);
                lane.last_end = end;
            }
            None => lanes.push(LaneSlot {
                last_end: end,
                members: vec![i],
            }),
        }
    }

    tracing::debug!(items = items.len(), lanes = lanes.len(), "assigned lanes");
    lanes.into_iter().map(|lane| lane.members).collect()
}

/// The largest number of items active at the same instant under `policy`.
///
/// Only items with both dates parsable are counted. For items of positive
/// length this is the lower bound that [`assign_lanes`] meets.
pub fn peak_concurrency<T: Scheduled>(items: &[T], policy: LanePolicy) -> usize {
    let ranges: Vec<(NaiveDateTime, NaiveDateTime)> = items
        .iter()
        .filter_map(|item| Some((item.start_at()?, item.end_at()?)))
        .collect();

    ranges
        .iter()
        .enumerate()
        .map(|(i, &(at, _))| {
            ranges
                .iter()
                .enumerate()
                .filter(|&(j, &(start, end))| {
                    let covers = match policy {
                        LanePolicy::Touching => at < end,
                        LanePolicy::Inclusive => at <= end,
                    };
                    start <= at && (covers || i == j)
                })
                .count()
        })
        .max()
        .unwrap_or(0)
}
