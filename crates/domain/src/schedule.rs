//! Wall-clock to window/epoch conversions.
//!
//! Pure and infallible. Pull windows are fixed-length buckets counted from the
//! Unix epoch; quest epochs end at the next UTC midnight (daily) or the next
//! UTC Monday midnight (weekly).

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Default pull window length: 8 hours.
pub const DEFAULT_PULL_WINDOW_MS: i64 = 8 * 60 * 60 * 1000;

/// Index of the window containing `now`.
pub fn window_index(now: DateTime<Utc>, window_ms: i64) -> i64 {
    now.timestamp_millis().div_euclid(window_ms)
}

/// First instant of `window`.
pub fn window_start(window: i64, window_ms: i64) -> DateTime<Utc> {
    from_millis(window.saturating_mul(window_ms))
}

/// First instant of the window after `window`.
pub fn next_reset_at(window: i64, window_ms: i64) -> DateTime<Utc> {
    from_millis(window.saturating_add(1).saturating_mul(window_ms))
}

/// Next UTC midnight strictly after `now`.
pub fn daily_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(now) + Duration::days(1)
}

/// Next UTC Monday 00:00 strictly after `now`.
///
/// At exactly Monday 00:00 this is a full week later, never the same instant.
pub fn weekly_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    let since_monday = i64::from(now.weekday().num_days_from_monday());
    start_of_day(now) - Duration::days(since_monday) + Duration::days(7)
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::default()).and_utc()
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
