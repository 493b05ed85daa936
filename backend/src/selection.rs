//! Pure selection math: random and daily offsets, and page bounds.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Default page size of `GET /api/quotes`.
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u64 = 50;

/// Uniform offset in `[0, count)`. Callers handle an empty collection first.
pub fn random_offset<R: Rng + ?Sized>(count: u64, rng: &mut R) -> u64 {
    debug_assert!(count > 0, "random_offset called on an empty collection");
    rng.gen_range(0..count.max(1))
}

/// 1-based ordinal day of `date` within its year (Jan 1 is day 1).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Offset of the verse of the day; stable for a given date and count.
pub fn daily_offset(date: NaiveDate, count: u64) -> u64 {
    debug_assert!(count > 0, "daily_offset called on an empty collection");
    u64::from(day_of_year(date)) % count.max(1)
}

/// Clamped pagination derived from raw query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
}

impl PageBounds {
    /// Missing, malformed or zero values fall back to page 1 and limit 10 before
    /// clamping; `limit` ends up in `[1, 50]` and `page` is at least 1.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> PageBounds {
        let page = or_default(page, 1).max(1) as u64;
        let limit = or_default(limit, DEFAULT_LIMIT as i64).clamp(1, MAX_LIMIT as i64) as u64;
        PageBounds {
            page,
            limit,
            skip: (page - 1).saturating_mul(limit),
        }
    }
}

/// Clamps an optional raw `limit` to `[1, max]`, defaulting to `max`.
pub fn clamp_limit(raw: Option<&str>, max: u64) -> u64 {
    or_default(raw, max as i64).clamp(1, max as i64) as u64
}

fn or_default(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(parse_leading_int) {
        Some(0) | None => default,
        Some(v) => v,
    }
}

/// Parses an optionally signed run of digits at the start of `raw`, ignoring
/// leading whitespace and anything after the digits. Saturates on overflow.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}
