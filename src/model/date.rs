use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Milliseconds in one calendar day.
pub const DAY_MS: i64 = 1000 * 60 * 60 * 24;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y", "%d-%m-%Y",
];

/// Try parsing a date-like string into a naive UTC timestamp.
///
/// Returns `None` for anything that does not parse, including the empty
/// string. `None` plays the role of an invalid timestamp: comparisons
/// against it never succeed.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Whole days between two timestamps, rounded up (`ceil`).
pub fn days_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let ms = (end - start).num_milliseconds();
    // ceil for integer division, correct for negative spans too
    ms.div_euclid(DAY_MS) + i64::from(ms.rem_euclid(DAY_MS) != 0)
}

/// Like [`days_between`] but for possibly invalid timestamps; `NaN` if either
/// side is missing.
pub fn days_between_opt(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> f64 {
    match (start, end) {
        (Some(s), Some(e)) => days_between(s, e) as f64,
        _ => f64::NAN,
    }
}

/// Total days in a span; the normalisation denominator for positions.
///
/// May be zero when `start == end`; see [`nonzero_days`].
pub fn total_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    days_between(start, end)
}

/// Treat a zero-day denominator as one so percentages never become `NaN`.
pub fn nonzero_days(days: f64) -> f64 {
    if days == 0.0 {
        1.0
    } else {
        days
    }
}

/// Shift a timestamp by a possibly fractional number of days.
pub fn add_days(at: NaiveDateTime, days: f64) -> NaiveDateTime {
    let ms = (days * DAY_MS as f64).round() as i64;
    at.checked_add_signed(Duration::milliseconds(ms))
        .unwrap_or(if ms > 0 {
            NaiveDateTime::MAX
        } else {
            NaiveDateTime::MIN
        })
}

/// Format a calendar date the way item fields store it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
