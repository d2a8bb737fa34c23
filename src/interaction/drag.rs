//! Resize-by-drag for one item.
//!
//! Pointer-down on an edge handle snapshots the item's dates. Each pointer
//! move recomputes a preview from that snapshot (never from the previous
//! preview), snapped to whole days. Pointer-up turns a changed preview into a
//! commit; cancel throws it away.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DragConfig;
use crate::model::date::format_date;
use crate::model::{Item, ItemId, ItemPatch, ItemUpdate, Scheduled};

use super::capture::{PointerCapture, Subscription};
use super::InteractionError;

/// Largest day shift a single gesture can produce.
const MAX_DAY_DELTA: i64 = 1_000_000;

/// Which end of the item the handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Start,
    End,
}

/// An inclusive pair of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The item's dates, if both parse.
    pub fn of<T: Scheduled>(item: &T) -> Option<Self> {
        Some(Self {
            start: item.start_at()?.date(),
            end: item.end_at()?.date(),
        })
    }

    /// A patch carrying only the `edge` field. The other field keeps its
    /// original text, time of day and offset included.
    pub fn edge_patch(self, edge: Edge) -> ItemPatch {
        match edge {
            Edge::Start => ItemPatch::start(format_date(self.start)),
            Edge::End => ItemPatch::end(format_date(self.end)),
        }
    }
}

/// Convert a horizontal pointer offset into whole days.
pub fn drag_days(pixel_delta: f64, pixels_per_day: f64) -> i64 {
    let days = (pixel_delta / pixels_per_day).round();
    if days.is_nan() {
        return 0;
    }
    (days as i64).clamp(-MAX_DAY_DELTA, MAX_DAY_DELTA)
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days > 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Move one edge of `original` by `day_delta`, keeping start strictly before
/// end.
pub fn resize(original: DateRange, edge: Edge, day_delta: i64) -> DateRange {
    match edge {
        Edge::Start => {
            let moved = shift(original.start, day_delta);
            let start = if moved < original.end {
                moved
            } else {
                original.end.pred_opt().unwrap_or(original.end)
            };
            DateRange { start, ..original }
        }
        Edge::End => {
            let moved = shift(original.end, day_delta);
            let end = if moved > original.start {
                moved
            } else {
                original.start.succ_opt().unwrap_or(original.start)
            };
            DateRange { end, ..original }
        }
    }
}

/// State of one pointer gesture.
#[derive(Debug)]
pub struct DragSession {
    edge: Edge,
    anchor_x: f64,
    pixels_per_day: f64,
    original: DateRange,
    live: DateRange,
    _pointer: Subscription,
}

impl DragSession {
    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn original(&self) -> DateRange {
        self.original
    }

    pub fn live(&self) -> DateRange {
        self.live
    }
}

#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Per-item drag state machine: `Idle` ⇄ `Dragging(edge)`.
#[derive(Debug)]
pub struct DragController {
    item_id: ItemId,
    config: DragConfig,
    state: DragState,
}

impl DragController {
    pub fn new(item_id: ItemId, config: DragConfig) -> Self {
        Self {
            item_id,
            config,
            state: DragState::Idle,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Screen scale used by the next gesture. A running gesture keeps the
    /// scale it started with.
    pub fn set_pixels_per_day(&mut self, pixels_per_day: f64) {
        if pixels_per_day > 0.0 && pixels_per_day.is_finite() {
            self.config.pixels_per_day = pixels_per_day;
        }
    }

    /// The dates to draw while dragging; `None` when idle.
    pub fn preview(&self) -> Option<DateRange> {
        match &self.state {
            DragState::Dragging(session) => Some(session.live),
            DragState::Idle => None,
        }
    }

    /// The preview as a patch for the dragged edge only.
    pub fn preview_patch(&self) -> Option<ItemPatch> {
        match &self.state {
            DragState::Dragging(session) if session.live != session.original => {
                Some(session.live.edge_patch(session.edge))
            }
            _ => None,
        }
    }

    /// Pointer-down on an edge handle.
    pub fn begin(
        &mut self,
        item: &Item,
        edge: Edge,
        pointer_x: f64,
        capture: &PointerCapture,
    ) -> Result<(), InteractionError> {
        if self.is_dragging() {
            return Err(InteractionError::AlreadyDragging);
        }
        let original = DateRange::of(item).ok_or(InteractionError::UnparsableDates)?;
        debug!(id = %self.item_id, ?edge, pointer_x, "drag started");
        self.state = DragState::Dragging(DragSession {
            edge,
            anchor_x: pointer_x,
            pixels_per_day: self.config.pixels_per_day,
            original,
            live: original,
            _pointer: capture.subscribe(self.item_id.clone()),
        });
        Ok(())
    }

    /// Pointer-move while dragging. Returns the new preview when it changed.
    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<DateRange> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let day_delta = drag_days(pointer_x - session.anchor_x, session.pixels_per_day);
        let live = if day_delta == 0 {
            session.original
        } else {
            resize(session.original, session.edge, day_delta)
        };
        if live == session.live {
            return None;
        }
        session.live = live;
        Some(live)
    }

    /// Pointer-up: commit the preview if it differs from the snapshot.
    pub fn finish(&mut self) -> Option<ItemUpdate> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        if session.live == session.original {
            debug!(id = %self.item_id, "drag ended without change");
            return None;
        }
        info!(
            id = %self.item_id,
            start = %session.live.start,
            end = %session.live.end,
            "drag committed"
        );
        Some(ItemUpdate {
            id: self.item_id.clone(),
            patch: session.live.edge_patch(session.edge),
        })
    }

    /// Abandon the gesture; nothing is committed.
    pub fn cancel(&mut self) {
        if let DragState::Dragging(_) = std::mem::take(&mut self.state) {
            debug!(id = %self.item_id, "drag cancelled");
        }
    }
}
