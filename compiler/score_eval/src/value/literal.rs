//! Canonical literal formats.
//!
//! | kind      | format                              |
//! |-----------|-------------------------------------|
//! | date      | `YYYY-MM-DD`                        |
//! | time      | `HH:MM:SS[.fff]`, no offset         |
//! | timestamp | `YYYY-MM-DDTHH:MM:SS[.fff]Z`        |
//! | duration  | ISO-8601 `[-]PnDTnHnMn.nS`          |
//! | decimal   | plain base-10, scale preserved      |
//!
//! Rendering is canonical: parsing rendered text gives back the same text.
//! Fractional seconds render in groups of 3, 6 or 9 digits and only when
//! non-zero. Durations render days folded into hours (`P2D` -> `PT48H`).

use std::fmt::Write as _;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use num_traits::Signed;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;
const NANOS_DIGITS: usize = 9;

/// Parses `[+-]digits[.digits]` of any length. Exponent notation is not
/// canonical and is rejected.
pub(super) fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let well_formed = match unsigned.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(unsigned),
    };
    if !well_formed {
        return None;
    }
    BigDecimal::from_str(text).ok()
}

/// Plain notation with exactly `scale` fraction digits.
pub(super) fn format_decimal(decimal: &BigDecimal) -> String {
    let (unscaled, scale) = decimal.as_bigint_and_exponent();
    let sign = if unscaled.is_negative() { "-" } else { "" };
    let digits = unscaled.magnitude().to_string();
    match usize::try_from(scale) {
        Ok(0) => format!("{sign}{digits}"),
        Ok(scale) if digits.len() > scale => {
            let (whole, fraction) = digits.split_at(digits.len() - scale);
            format!("{sign}{whole}.{fraction}")
        }
        Ok(scale) => format!("{sign}0.{digits:0>scale$}"),
        // negative scale: trailing zeros of the integer part
        Err(_) => {
            let zeros = usize::try_from(scale.unsigned_abs()).unwrap_or_default();
            format!("{sign}{digits}{}", "0".repeat(zeros))
        }
    }
}

pub(super) fn parse_date(text: &str) -> Option<NaiveDate> {
    // chrono accepts unpadded fields; the canonical form does not
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub(super) fn parse_time(text: &str) -> Option<NaiveTime> {
    if text.len() < 8 || text.as_bytes()[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(text, TIME_FORMAT).ok()
}

pub(super) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if text.len() < 20 || text.as_bytes()[10] != b'T' {
        return None;
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub(super) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(super) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(super) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses `[+-]P[nD][T[nH][nM][n[.n]S]]`, case-insensitively.
///
/// At least one component is required, and `T` must be followed by one.
pub(super) fn parse_duration(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let rest = rest.strip_prefix(['P', 'p'])?;
    let (date_part, time_part) = match rest.find(['T', 't']) {
        Some(at) => (&rest[..at], Some(&rest[at + 1..])),
        None => (rest, None),
    };
    if date_part.is_empty() && time_part.is_none() {
        return None;
    }

    let mut total = TimeDelta::zero();
    if !date_part.is_empty() {
        let days = date_part.strip_suffix(['D', 'd'])?;
        total = TimeDelta::try_days(parse_whole(days)?)?;
    }

    if let Some(mut time) = time_part {
        if time.is_empty() {
            return None;
        }
        // H, M, S must appear in that order, each at most once
        let mut last_rank = 0;
        while !time.is_empty() {
            let unit_at = time.find(|c: char| c.is_ascii_alphabetic())?;
            let (number, tail) = time.split_at(unit_at);
            let unit = tail.as_bytes()[0].to_ascii_uppercase();
            time = &tail[1..];

            let (rank, part) = match unit {
                b'H' => (1, TimeDelta::try_hours(parse_whole(number)?)?),
                b'M' => (2, TimeDelta::try_minutes(parse_whole(number)?)?),
                b'S' => (3, parse_seconds(number)?),
                _ => return None,
            };
            if rank <= last_rank {
                return None;
            }
            last_rank = rank;
            total = total.checked_add(&part)?;
        }
    }

    Some(if negative { -total } else { total })
}

pub(super) fn format_duration(duration: TimeDelta) -> String {
    if duration.is_zero() {
        return "PT0S".to_string();
    }
    let negative = duration < TimeDelta::zero();
    let duration = duration.abs();

    let total_seconds = duration.num_seconds();
    let nanos = duration.subsec_nanos();
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    let mut out = String::with_capacity(16);
    if negative {
        out.push('-');
    }
    out.push_str("PT");
    if hours != 0 {
        let _ = write!(out, "{hours}H");
    }
    if minutes != 0 {
        let _ = write!(out, "{minutes}M");
    }
    if seconds != 0 || nanos != 0 {
        let _ = write!(out, "{seconds}");
        if nanos != 0 {
            let fraction = format!("{nanos:09}");
            let _ = write!(out, ".{}", fraction.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_whole(digits: &str) -> Option<i64> {
    if !is_digits(digits) {
        return None;
    }
    digits.parse().ok()
}

fn parse_seconds(number: &str) -> Option<TimeDelta> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    let seconds = parse_whole(whole)?;
    let nanos = match fraction {
        None => 0,
        Some(f) if f.is_empty() || f.len() > NANOS_DIGITS => return None,
        Some(f) => {
            let padded = format!("{f:0<width$}", width = NANOS_DIGITS);
            u32::try_from(parse_whole(&padded)?).ok()?
        }
    };
    TimeDelta::new(seconds, nanos)
}
