use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::model::date::{nonzero_days, total_days};
use crate::model::item::Scheduled;

/// The padded calendar span covering every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimelineSpan {
    /// Whole days in the span (may be zero).
    pub fn total_days(&self) -> i64 {
        total_days(self.start, self.end)
    }

    /// [`Self::total_days`] with zero treated as one, for use as a divisor.
    pub fn divisor_days(&self) -> f64 {
        nonzero_days(self.total_days() as f64)
    }
}

/// Compute the timeline span from the min and max of all parsable dates,
/// widened by `padding_days` on each side.
///
/// When nothing parses (including empty input) the span is centred on the
/// start of `now`'s day.
pub fn boundaries<T: Scheduled>(items: &[T], padding_days: u32, now: NaiveDateTime) -> TimelineSpan {
    let dates = items
        .iter()
        .flat_map(|item| [item.start_at(), item.end_at()])
        .flatten();

    let (min, max) = dates.fold(None, |acc: Option<(NaiveDateTime, NaiveDateTime)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })
    .unwrap_or_else(|| {
        let today = now.date().and_time(NaiveTime::MIN);
        (today, today)
    });

    let padding = Duration::days(i64::from(padding_days));
    TimelineSpan {
        start: min.checked_sub_signed(padding).unwrap_or(min),
        end: max.checked_add_signed(padding).unwrap_or(max),
    }
}
