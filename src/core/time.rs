// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Time conversions between epoch seconds and broken-down calendar values.
//!
//! Records carry time twice: as `time_d` (seconds since 1970-01-01 UTC) and as
//! `time_i` = `[year, month, day, hour, minute, second, microsecond]`.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use super::error::{MbError, Result};

/// Broken-down time: year, month, day, hour, minute, second, microsecond.
pub type TimeParts = [i32; 7];

/// Convert epoch seconds into broken-down time.
pub fn time_parts(time_d: f64) -> Result<TimeParts> {
    if !time_d.is_finite() {
        return Err(MbError::bad_parameter(
            "time_parts",
            format!("non-finite time {time_d}"),
        ));
    }
    let secs = time_d.floor();
    let mut micros = ((time_d - secs) * 1_000_000.0).round() as i64;
    let mut secs = secs as i64;
    if micros >= 1_000_000 {
        secs += 1;
        micros -= 1_000_000;
    }
    let dt = DateTime::<Utc>::from_timestamp(secs, (micros * 1000) as u32).ok_or_else(|| {
        MbError::bad_parameter("time_parts", format!("time {time_d} out of range"))
    })?;
    Ok([
        dt.year(),
        dt.month() as i32,
        dt.day() as i32,
        dt.hour() as i32,
        dt.minute() as i32,
        dt.second() as i32,
        (dt.nanosecond() / 1000) as i32,
    ])
}

/// Convert broken-down time into epoch seconds.
pub fn epoch_seconds(time_i: &TimeParts) -> Result<f64> {
    let date = NaiveDate::from_ymd_opt(time_i[0], time_i[1] as u32, time_i[2] as u32)
        .ok_or_else(|| MbError::bad_parameter("epoch_seconds", format!("bad date {time_i:?}")))?;
    to_epoch(date, time_i)
}

/// Build broken-down time from a year and day-of-year plus time of day.
pub fn from_year_day(
    year: i32,
    day_of_year: i32,
    hour: i32,
    minute: i32,
    second: i32,
    microsecond: i32,
) -> Result<TimeParts> {
    let date = NaiveDate::from_yo_opt(year, day_of_year.max(1) as u32).ok_or_else(|| {
        MbError::bad_parameter(
            "from_year_day",
            format!("bad year/day {year}/{day_of_year}"),
        )
    })?;
    Ok([
        date.year(),
        date.month() as i32,
        date.day() as i32,
        hour,
        minute,
        second,
        microsecond,
    ])
}

/// Day of year (1-based) for a broken-down time.
pub fn day_of_year(time_i: &TimeParts) -> Result<i32> {
    let date = NaiveDate::from_ymd_opt(time_i[0], time_i[1] as u32, time_i[2] as u32)
        .ok_or_else(|| MbError::bad_parameter("day_of_year", format!("bad date {time_i:?}")))?;
    Ok(date.ordinal() as i32)
}

fn to_epoch(date: NaiveDate, time_i: &TimeParts) -> Result<f64> {
    let dt = date
        .and_hms_micro_opt(
            time_i[3] as u32,
            time_i[4] as u32,
            time_i[5] as u32,
            time_i[6] as u32,
        )
        .ok_or_else(|| {
            MbError::bad_parameter("epoch_seconds", format!("bad time of day {time_i:?}"))
        })?
        .and_utc();
    Ok(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_micros()) * 1e-6)
}
