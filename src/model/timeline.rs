use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::ZoomConfig;
use crate::layout::bounds::TimelineSpan;
use crate::model::date::{add_days, days_between, days_between_opt, nonzero_days};
use crate::model::item::Scheduled;

/// Zoom and pan state of the timeline, persisted by the caller between
/// renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Magnification; 1.0 shows the full span.
    pub zoom_level: f64,
    /// Position (0–100) within the full span that stays put while zooming.
    pub focal_percent: f64,
}

impl Viewport {
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            zoom_level: config.default,
            focal_percent: 50.0,
        }
    }

    pub fn zoom_in(&mut self, config: &ZoomConfig) {
        self.zoom_level = config.clamp(self.zoom_level + config.step);
    }

    pub fn zoom_out(&mut self, config: &ZoomConfig) {
        self.zoom_level = config.clamp(self.zoom_level - config.step);
    }

    /// Back to the default zoom, centred.
    pub fn reset(&mut self, config: &ZoomConfig) {
        self.zoom_level = config.default;
        self.focal_percent = 50.0;
    }

    pub fn set_zoom(&mut self, level: f64, config: &ZoomConfig) {
        self.zoom_level = config.clamp(level);
    }

    pub fn can_zoom_in(&self, config: &ZoomConfig) -> bool {
        self.zoom_level < config.max
    }

    pub fn can_zoom_out(&self, config: &ZoomConfig) -> bool {
        self.zoom_level > config.min
    }

    pub fn is_default(&self, config: &ZoomConfig) -> bool {
        self.zoom_level == config.default
    }

    /// Apply one wheel step. The pointer's horizontal position inside the
    /// container (0–100) becomes the new focal point so the date under the
    /// cursor stays put.
    pub fn wheel(&mut self, delta_y: f64, pointer_percent: f64, config: &ZoomConfig) {
        if pointer_percent.is_finite() {
            self.focal_percent = pointer_percent.clamp(0.0, 100.0);
        }
        self.zoom_level = wheel_zoom(self.zoom_level, delta_y, config.wheel_sensitivity, config);
    }

    /// The visible window of `span` for this viewport.
    pub fn visible_range(&self, span: &TimelineSpan) -> VisibleRange {
        visible_range(span, self.zoom_level, self.focal_percent)
    }
}

/// Zoom after a wheel event: `current * (1 - delta_y * sensitivity)`, clamped.
pub fn wheel_zoom(current: f64, delta_y: f64, sensitivity: f64, config: &ZoomConfig) -> f64 {
    config.clamp(current * (1.0 - delta_y * sensitivity))
}

/// Zoom level as a whole percentage, e.g. `1.5` → `"150%"`.
pub fn format_zoom_level(level: f64) -> String {
    format!("{}%", (level * 100.0).round() as i64)
}

/// The calendar sub-range currently on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// `total_days / zoom_level`; the ideal window width before clamping.
    pub visible_days: f64,
}

impl VisibleRange {
    /// Days actually covered after clamping, never zero. Use as the divisor
    /// for positions so 0–100% spans exactly the rendered window.
    pub fn window_days(&self) -> f64 {
        nonzero_days(days_between(self.start, self.end) as f64)
    }

    pub fn position<T: Scheduled>(&self, item: &T) -> ItemPosition {
        item_position(item, self.start, self.window_days())
    }

    pub fn month_markers(&self) -> MonthMarkers {
        month_markers(self.start, self.end, self.window_days())
    }
}

/// Derive the visible window from zoom and focal point.
///
/// Near the edges the window is clipped to the span rather than re-centred,
/// so it may be narrower than `visible_days`. When the window would cover
/// the whole span (zoom at or below 1) the full span is returned.
pub fn visible_range(span: &TimelineSpan, zoom_level: f64, focal_percent: f64) -> VisibleRange {
    let total = span.divisor_days();
    let visible_days = total / zoom_level;

    if visible_days.is_nan() || visible_days >= total {
        return VisibleRange {
            start: span.start,
            end: span.end,
            visible_days,
        };
    }

    let center = total * focal_percent / 100.0;
    let start_offset = (center - visible_days / 2.0).max(0.0);
    let end_offset = (center + visible_days / 2.0).min(total);
    VisibleRange {
        start: add_days(span.start, start_offset),
        end: add_days(span.start, end_offset),
        visible_days,
    }
}

/// Horizontal placement of an item, in percent of the visible window.
///
/// Not clamped: items outside the window yield negative or >100 values, and
/// unparsable dates yield `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPosition {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl ItemPosition {
    /// Whether any part of the item falls inside the window.
    pub fn is_visible(&self) -> bool {
        self.left_percent.is_finite()
            && self.width_percent.is_finite()
            && self.left_percent < 100.0
            && self.left_percent + self.width_percent > 0.0
    }
}

/// Map an item to left/width percentages. The end date is inclusive, so a
/// single-day item still has the width of one day.
pub fn item_position<T: Scheduled>(item: &T, visible_start: NaiveDateTime, visible_days: f64) -> ItemPosition {
    let start = item.start_at();
    let offset = days_between_opt(Some(visible_start), start);
    let duration = days_between_opt(start, item.end_at()) + 1.0;
    ItemPosition {
        left_percent: offset / visible_days * 100.0,
        width_percent: duration / visible_days * 100.0,
    }
}

/// A first-of-month tick on the ruler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthMarker {
    pub date: NaiveDate,
    pub left_percent: f64,
}

/// Iterator over month starts from the month containing `range_start`
/// through the month containing `range_end`. Cloning restarts it.
#[derive(Debug, Clone)]
pub struct MonthMarkers {
    next: Option<NaiveDate>,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    range_days: f64,
}

pub fn month_markers(range_start: NaiveDateTime, range_end: NaiveDateTime, range_days: f64) -> MonthMarkers {
    let first = range_start.date().with_day(1);
    MonthMarkers {
        next: first,
        range_start,
        range_end,
        range_days,
    }
}

impl Iterator for MonthMarkers {
    type Item = MonthMarker;

    fn next(&mut self) -> Option<MonthMarker> {
        let date = self.next?;
        if date.and_time(NaiveTime::MIN) > self.range_end {
            self.next = None;
            return None;
        }
        self.next = date.checked_add_months(chrono::Months::new(1));
        let offset = days_between(self.range_start, date.and_time(NaiveTime::MIN)) as f64;
        Some(MonthMarker {
            date,
            left_percent: offset / self.range_days * 100.0,
        })
    }
}
