//! Time window resolution.
//!
//! Converts user-supplied time expressions — relative ("last 2 hours",
//! "today") or absolute ISO timestamps — into the epoch-millisecond range
//! the assurance API accepts, clamping the start to the 30-day retention
//! floor.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::constants::{DEFAULT_WINDOW_HOURS, LOOKBACK_FLOOR_DAYS};
use crate::errors::{CatcError, Result};
use crate::types::TimeRange;

/// Resolve a time window against the current instant.
///
/// Precedence: a relative expression wins over absolute bounds; an absolute
/// `start_iso` (with `end_iso` defaulting to now) wins over the default
/// trailing 24-hour window.
pub fn resolve_window(
    relative: Option<&str>,
    start_iso: Option<&str>,
    end_iso: Option<&str>,
) -> Result<TimeRange> {
    resolve_window_at(Utc::now(), relative, start_iso, end_iso)
}

/// Resolve a time window against an explicit `now`.
///
/// Separated from [`resolve_window`] so tests can pin the clock.
pub fn resolve_window_at(
    now: DateTime<Utc>,
    relative: Option<&str>,
    start_iso: Option<&str>,
    end_iso: Option<&str>,
) -> Result<TimeRange> {
    let (start, end) = if let Some(expression) = relative {
        resolve_relative(now, expression)?
    } else if let Some(start_raw) = start_iso {
        let start = parse_timestamp(start_raw)?;
        let end = match end_iso {
            Some(end_raw) => parse_timestamp(end_raw)?,
            None => now,
        };
        if start > end {
            return Err(CatcError::InvalidInput(format!(
                "start time {start_raw} is after the end time"
            )));
        }
        (start, end)
    } else {
        (now - Duration::hours(DEFAULT_WINDOW_HOURS), now)
    };

    // The floor is evaluated against the current instant, not the window end.
    let floor = now - Duration::days(LOOKBACK_FLOOR_DAYS);
    if end < floor {
        return Err(CatcError::InvalidInput(format!(
            "the requested window ends before the {LOOKBACK_FLOOR_DAYS}-day retention floor"
        )));
    }

    let adjusted_for_floor = start < floor;
    let start = if adjusted_for_floor { floor } else { start };

    Ok(TimeRange {
        start_epoch_ms: start.timestamp_millis(),
        end_epoch_ms: end.timestamp_millis(),
        adjusted_for_floor,
    })
}

fn resolve_relative(
    now: DateTime<Utc>,
    expression: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let normalized = expression.trim().to_lowercase();

    if normalized == "today" {
        return Ok((start_of_day(now), now));
    }
    if normalized == "yesterday" {
        let today = start_of_day(now);
        return Ok((today - Duration::days(1), today));
    }

    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if let ["last", amount, unit] = tokens.as_slice() {
        let amount: i64 = amount.parse().map_err(|_| unsupported(expression))?;
        if amount <= 0 {
            return Err(unsupported(expression));
        }
        let span = match *unit {
            "minute" | "minutes" => Duration::minutes(amount),
            "hour" | "hours" => Duration::hours(amount),
            "day" | "days" => Duration::days(amount),
            _ => return Err(unsupported(expression)),
        };
        return Ok((now - span, now));
    }

    Err(unsupported(expression))
}

fn unsupported(expression: &str) -> CatcError {
    CatcError::InvalidInput(format!(
        "unsupported time expression '{expression}' (expected 'last <N> minutes|hours|days', 'today', or 'yesterday')"
    ))
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(instant)
}

/// Parse an absolute timestamp: RFC 3339, or a bare date taken as UTC
/// midnight.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(CatcError::InvalidInput(format!(
        "could not parse '{raw}' as an ISO 8601 timestamp or YYYY-MM-DD date"
    )))
}
