//! "Today" resolution for due-review queries.
//!
//! # Invariants
//! - A resolved window always contains `now`.
//! - Calendar windows follow the configured zone, including DST days that
//!   are 23 or 25 hours long in `Local` mode.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Maximum accepted fixed offset, in minutes (UTC-14:00 .. UTC+14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// How the "due today" day boundary is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DayBoundary {
    /// Calendar day in the host time zone.
    #[default]
    Local,
    /// Calendar day at a fixed UTC offset.
    Fixed { utc_offset_minutes: i32 },
    /// The next 24 hours starting at `now`.
    Rolling,
}

/// Half-open `[start, end)` range in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    /// Resolves the window that counts as "today" at `now`.
    pub fn resolve(boundary: DayBoundary, now: DateTime<Utc>) -> Self {
        let now_ms = now.timestamp_millis();
        match boundary {
            DayBoundary::Rolling => Self {
                start: now_ms,
                end: now_ms + DAY_MS,
            },
            DayBoundary::Fixed { utc_offset_minutes } => {
                fixed_offset_window(now_ms, i64::from(utc_offset_minutes) * 60 * 1000)
            }
            DayBoundary::Local => local_window(now),
        }
    }

    pub fn contains(&self, epoch_ms: i64) -> bool {
        self.start <= epoch_ms && epoch_ms < self.end
    }

    /// Whether `epoch_ms` falls before this window (an overdue review).
    pub fn starts_after(&self, epoch_ms: i64) -> bool {
        epoch_ms < self.start
    }
}

fn fixed_offset_window(now_ms: i64, offset_ms: i64) -> DayWindow {
    let start = (now_ms + offset_ms).div_euclid(DAY_MS) * DAY_MS - offset_ms;
    DayWindow {
        start,
        end: start + DAY_MS,
    }
}

fn local_window(now: DateTime<Utc>) -> DayWindow {
    let local_now = now.with_timezone(&Local);
    let today = local_now.date_naive();
    let fallback = fixed_offset_window(
        now.timestamp_millis(),
        i64::from(local_now.offset().local_minus_utc()) * 1000,
    );

    let start = local_midnight(&Local, today).unwrap_or(fallback.start);
    let end = today
        .succ_opt()
        .and_then(|tomorrow| local_midnight(&Local, tomorrow))
        .unwrap_or(start + DAY_MS);
    DayWindow { start, end }
}

// Midnight can be skipped by a DST jump; `earliest()` is `None` then.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|instant| instant.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::{local_midnight, DayBoundary, DayWindow, DAY_MS};
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn fixed_utc_window_spans_the_calendar_day() {
        let now = Utc.with_ymd_and_hms(2026, 5, 10, 15, 30, 0).unwrap();
        let window = DayWindow::resolve(DayBoundary::Fixed { utc_offset_minutes: 0 }, now);
        let midnight = Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap();

        assert_eq!(window.start, midnight.timestamp_millis());
        assert_eq!(window.end, window.start + DAY_MS);
        assert!(window.contains(now.timestamp_millis()));
    }

    #[test]
    fn fixed_offset_shifts_the_day_boundary() {
        // 23:30 UTC is already the next day at UTC+02:00.
        let now = Utc.with_ymd_and_hms(2026, 5, 10, 23, 30, 0).unwrap();
        let window = DayWindow::resolve(
            DayBoundary::Fixed {
                utc_offset_minutes: 120,
            },
            now,
        );
        let local_midnight = Utc.with_ymd_and_hms(2026, 5, 10, 22, 0, 0).unwrap();
        assert_eq!(window.start, local_midnight.timestamp_millis());
        assert!(window.contains(now.timestamp_millis()));
    }

    #[test]
    fn negative_offset_before_epoch_is_floored() {
        let now = Utc.with_ymd_and_hms(1969, 12, 31, 1, 0, 0).unwrap();
        let window = DayWindow::resolve(
            DayBoundary::Fixed {
                utc_offset_minutes: -300,
            },
            now,
        );
        assert!(window.contains(now.timestamp_millis()));
        assert_eq!(window.end - window.start, DAY_MS);
    }

    #[test]
    fn rolling_window_starts_now() {
        let now = Utc.with_ymd_and_hms(2026, 5, 10, 15, 30, 0).unwrap();
        let window = DayWindow::resolve(DayBoundary::Rolling, now);
        assert_eq!(window.start, now.timestamp_millis());
        assert!(window.contains((now + Duration::hours(23)).timestamp_millis()));
        assert!(!window.contains((now + Duration::hours(24)).timestamp_millis()));
        assert!(window.starts_after((now - Duration::minutes(1)).timestamp_millis()));
    }

    #[test]
    fn local_window_contains_now() {
        let now = Utc::now();
        let window = DayWindow::resolve(DayBoundary::Local, now);
        assert!(window.contains(now.timestamp_millis()));
    }

    #[test]
    fn midnight_is_resolved_in_the_given_zone() {
        let zone = FixedOffset::east_opt(3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap();
        assert_eq!(local_midnight(&zone, date), Some(expected.timestamp_millis()));
    }
}
