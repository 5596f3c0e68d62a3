// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date helpers for `xs:date` values without time-of-day or zone.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;

/// Formats a date as `xs:date` without an offset, e.g. `2026-03-01`.
#[must_use]
pub fn date_to_xs_date(date: Date) -> String {
    date.to_string()
}

/// Parses an unspecified date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by `Z` or a `±hh:mm` offset that
/// is discarded, or a local date-time whose date part is kept. Returns `None`
/// for empty or malformed input.
#[must_use]
pub fn parse_unspecified_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('T') {
        let local = value.split(['Z', '+']).next().unwrap_or(value);
        return local.parse::<DateTime>().ok().map(DateTime::date);
    }

    // Signed years are written with six digits.
    let date_len = if value.starts_with(['+', '-']) { 13 } else { 10 };
    let date_part = match (value.get(..date_len), value.get(date_len..)) {
        (Some(head), Some(rest)) if is_offset_suffix(rest) => head,
        _ => value,
    };
    date_part.parse::<Date>().ok()
}

/// Converts a date or timestamp into a date in `tz`.
///
/// Absolute timestamps (`2026-03-01T23:30:00Z`) are shifted into `tz` before
/// the date is taken; anything else goes through [`parse_unspecified_date`].
#[must_use]
pub fn to_unspecified_date_in(value: &str, tz: &TimeZone) -> Option<Date> {
    match value.trim().parse::<Timestamp>() {
        Ok(ts) => Some(ts.to_zoned(tz.clone()).date()),
        Err(_) => parse_unspecified_date(value),
    }
}

fn is_offset_suffix(rest: &str) -> bool {
    if rest.is_empty() || rest == "Z" {
        return true;
    }
    let bytes = rest.as_bytes();
    bytes.len() == 6
        && matches!(bytes.first(), Some(b'+' | b'-'))
        && bytes.get(3) == Some(&b':')
        && rest
            .char_indices()
            .all(|(i, c)| i == 0 || i == 3 || c.is_ascii_digit())
}
