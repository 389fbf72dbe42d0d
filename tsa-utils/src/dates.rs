//! Day-number date codec.
//!
//! Station records index their samples by a floating point "day number": the
//! integer part counts calendar days, the fractional part is the time of day
//! as a fraction of 24 hours. Minute-resolution files use a datenum-style
//! count (proleptic Gregorian ordinal shifted by 366), hour-resolution files
//! count days from a configured epoch.

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shift added to the proleptic Gregorian ordinal for minute-unit day numbers.
pub const MINUTE_UNIT_OFFSET: i32 = 366;

pub const HOURS_PER_DAY: f64 = 24.0;
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Which day-number convention a value uses.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Minute-resolution records: ordinal + 366
    #[default]
    Minute,
    /// Hour-resolution records: days since the configured epoch
    Hour,
}

impl FromStr for TimeUnit {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "minute" | "min" => Ok(TimeUnit::Minute),
            "hour" | "hr" => Ok(TimeUnit::Hour),
            other => Err(AnalysisError::InvalidParameter(format!(
                "unknown time unit '{other}' (expected minute or hour)"
            ))),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Minute => write!(f, "minute"),
            TimeUnit::Hour => write!(f, "hour"),
        }
    }
}

/// Epoch settings for the day-number conventions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochConfig {
    /// Day zero of hour-unit day numbers.
    pub hour_epoch: NaiveDate,
}

impl Default for EpochConfig {
    fn default() -> Self {
        EpochConfig {
            hour_epoch: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
        }
    }
}

/// Converts between `"D/M/Y[,H:M]"` strings and day numbers.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct DateCodec {
    config: EpochConfig,
}

impl DateCodec {
    pub fn new(config: EpochConfig) -> Self {
        DateCodec { config }
    }

    pub fn config(&self) -> &EpochConfig {
        &self.config
    }

    /// Offset added to a date's proleptic Gregorian ordinal for `unit`.
    pub fn unit_offset(&self, unit: TimeUnit) -> i32 {
        match unit {
            TimeUnit::Minute => MINUTE_UNIT_OFFSET,
            TimeUnit::Hour => -self.config.hour_epoch.num_days_from_ce(),
        }
    }

    /// Encode a `"D/M/Y"` or `"D/M/Y,H:M"` string as a day number.
    pub fn date_time_to_number(&self, date_str: &str, unit: TimeUnit) -> Result<f64> {
        let (date, time) = parse_date_time(date_str)?;
        let mut day_number = (date.num_days_from_ce() + self.unit_offset(unit)) as f64;
        if let Some((hour, minute)) = time {
            day_number += hour as f64 / HOURS_PER_DAY + minute as f64 / MINUTES_PER_DAY;
        }
        debug!("encoded '{date_str}' ({unit}) as {day_number}");
        Ok(day_number)
    }

    /// Decode a day number in `unit` convention back to a date string.
    ///
    /// Hour-unit numbers are rebased onto the minute-unit scale first.
    pub fn date_number_to_string(
        &self,
        day_number: f64,
        unit: TimeUnit,
        include_time: bool,
    ) -> Result<String> {
        let rebase = MINUTE_UNIT_OFFSET - self.unit_offset(unit);
        number_to_string(day_number + rebase as f64, include_time)
    }
}

/// Decode a minute-unit day number into `"D/M/Y"` or `"D/M/Y, HH:MM"`.
///
/// Day numbers whose ordinal is not positive decode to 1/1/1. Minutes are
/// rounded to the nearest whole minute; a rounded 60 carries into the hour,
/// and 24:00 carries into the next day.
pub fn number_to_string(day_number: f64, include_time: bool) -> Result<String> {
    if !day_number.is_finite() {
        return Err(AnalysisError::InvalidParameter(format!(
            "day number must be finite, got {day_number}"
        )));
    }
    let days = (day_number - MINUTE_UNIT_OFFSET as f64).floor();
    let ordinal = if days < 1.0 {
        warn!("day number {day_number} precedes ordinal day 1, using 1/1/1");
        1
    } else if days > i32::MAX as f64 {
        return Err(out_of_range(day_number));
    } else {
        days as i32
    };
    let mut date =
        NaiveDate::from_num_days_from_ce_opt(ordinal).ok_or_else(|| out_of_range(day_number))?;

    if !include_time {
        return Ok(format_date(&date));
    }

    let hours = day_number.rem_euclid(1.0) * HOURS_PER_DAY;
    let mut whole_hours = hours.trunc() as u32;
    let mut minutes = (hours.fract() * 60.0).round() as u32;
    if minutes >= 60 {
        whole_hours += 1;
        minutes = 0;
    }
    if whole_hours >= 24 {
        whole_hours -= 24;
        date = date.succ_opt().ok_or_else(|| out_of_range(day_number))?;
    }
    Ok(format!(
        "{}, {:02}:{:02}",
        format_date(&date),
        whole_hours,
        minutes
    ))
}

/// Format a date as unpadded, day-first `"D/M/Y"`.
pub fn format_date(date: &NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

fn out_of_range(day_number: f64) -> AnalysisError {
    AnalysisError::InvalidParameter(format!(
        "day number {day_number} is outside the representable calendar"
    ))
}

fn parse_component(field: &str, input: &str) -> Result<i64> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| AnalysisError::InvalidFormat(format!("'{input}': '{field}' is not an integer")))
}

/// Split `"D/M/Y[,H:M]"` into a calendar date and an optional (hour, minute).
fn parse_date_time(input: &str) -> Result<(NaiveDate, Option<(u32, u32)>)> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() > 2 {
        return Err(AnalysisError::InvalidFormat(format!(
            "'{input}': expected D/M/Y or D/M/Y,H:M"
        )));
    }

    let dmy: Vec<&str> = parts[0].split('/').collect();
    if dmy.len() != 3 {
        return Err(AnalysisError::InvalidFormat(format!(
            "'{input}': expected D/M/Y"
        )));
    }
    let day = parse_component(dmy[0], input)?;
    let month = parse_component(dmy[1], input)?;
    let year = parse_component(dmy[2], input)?;

    let date = match (u32::try_from(day), u32::try_from(month), i32::try_from(year)) {
        (Ok(d), Ok(m), Ok(y)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    }
    .ok_or_else(|| AnalysisError::InvalidDate(format!("{day}/{month}/{year}")))?;

    let time = match parts.get(1) {
        None => None,
        Some(clock) => {
            let hm: Vec<&str> = clock.split(':').collect();
            if hm.len() != 2 {
                return Err(AnalysisError::InvalidFormat(format!(
                    "'{input}': expected H:M after the comma"
                )));
            }
            let hour = parse_component(hm[0], input)?;
            let minute = parse_component(hm[1], input)?;
            if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
                return Err(AnalysisError::InvalidDate(format!("{hour}:{minute}")));
            }
            Some((hour as u32, minute as u32))
        }
    };

    Ok((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> DateCodec {
        DateCodec::new(EpochConfig::default())
    }

    #[test]
    fn test_minute_unit_matches_station_start() {
        // first sample of the 2016 minute-resolution station files
        let number = codec()
            .date_time_to_number("1/1/2016", TimeUnit::Minute)
            .unwrap();
        assert_eq!(number, 736330.0);
    }

    #[test]
    fn test_round_trip_without_time() {
        let codec = codec();
        for s in ["1/1/2017", "29/2/2020", "31/12/1999", "5/10/2022", "1/1/1"] {
            let number = codec.date_time_to_number(s, TimeUnit::Minute).unwrap();
            assert_eq!(number_to_string(number, false).unwrap(), s);
        }
    }

    #[test]
    fn test_round_trip_with_time() {
        let codec = codec();
        let number = codec
            .date_time_to_number("15/6/2020,13:47", TimeUnit::Minute)
            .unwrap();
        assert_eq!(number_to_string(number, true).unwrap(), "15/6/2020, 13:47");

        // decoded strings parse back, the space after the comma is accepted
        let again = codec
            .date_time_to_number("15/6/2020, 13:47", TimeUnit::Minute)
            .unwrap();
        assert_eq!(again, number);
    }

    #[test]
    fn test_time_fraction() {
        let number = codec()
            .date_time_to_number("1/1/2017,10:30", TimeUnit::Minute)
            .unwrap();
        assert!((number.fract() - 0.4375).abs() < 1e-9);
        assert_eq!(number_to_string(number, true).unwrap(), "1/1/2017, 10:30");
    }

    #[test]
    fn test_hour_unit_counts_from_epoch() {
        let codec = codec();
        assert_eq!(
            codec.date_time_to_number("1/1/2016", TimeUnit::Hour).unwrap(),
            0.0
        );
        assert_eq!(
            codec.date_time_to_number("1/1/2017", TimeUnit::Hour).unwrap(),
            366.0
        );
        let number = codec
            .date_time_to_number("2/3/2022,6:00", TimeUnit::Hour)
            .unwrap();
        assert_eq!(
            codec
                .date_number_to_string(number, TimeUnit::Hour, true)
                .unwrap(),
            "2/3/2022, 06:00"
        );
    }

    #[test]
    fn test_units_agree_on_calendar_date() {
        let codec = codec();
        let minute = codec
            .date_time_to_number("20/7/2021,8:15", TimeUnit::Minute)
            .unwrap();
        let hour = codec
            .date_time_to_number("20/7/2021,8:15", TimeUnit::Hour)
            .unwrap();
        assert_eq!(
            codec
                .date_number_to_string(minute, TimeUnit::Minute, true)
                .unwrap(),
            codec.date_number_to_string(hour, TimeUnit::Hour, true).unwrap()
        );
    }

    #[test]
    fn test_custom_epoch() {
        let codec = DateCodec::new(EpochConfig {
            hour_epoch: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        });
        assert_eq!(
            codec.date_time_to_number("11/1/2022", TimeUnit::Hour).unwrap(),
            10.0
        );
        assert_eq!(
            codec
                .date_number_to_string(10.5, TimeUnit::Hour, true)
                .unwrap(),
            "11/1/2022, 12:00"
        );
    }

    #[test]
    fn test_minute_carry() {
        // 0.0416666 days is 59.99999 minutes past midnight
        let number = 736330.0 + 366.0 + (1.0 / 24.0 - 1e-8);
        assert_eq!(number_to_string(number, true).unwrap(), "1/1/2017, 01:00");
    }

    #[test]
    fn test_midnight_carry_rolls_day() {
        let number = 736330.0 + 366.0 + (1.0 - 1e-7);
        assert_eq!(number_to_string(number, true).unwrap(), "2/1/2017, 00:00");
    }

    #[test]
    fn test_degenerate_ordinal_falls_back_to_day_one() {
        assert_eq!(number_to_string(0.0, false).unwrap(), "1/1/1");
        assert_eq!(number_to_string(-42.5, true).unwrap(), "1/1/1, 12:00");
        assert_eq!(number_to_string(366.5, false).unwrap(), "1/1/1");
    }

    #[test]
    fn test_non_finite_day_number() {
        assert!(matches!(
            number_to_string(f64::NAN, false),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_invalid_format() {
        let codec = codec();
        for s in ["2017-01-01", "1/1", "1/1/2017,10", "a/1/2017", "1/1/2017,1:2,3", ""] {
            assert!(
                matches!(
                    codec.date_time_to_number(s, TimeUnit::Minute),
                    Err(AnalysisError::InvalidFormat(_))
                ),
                "{s} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn test_invalid_date() {
        let codec = codec();
        for s in ["30/2/2021", "1/13/2021", "0/1/2021", "-3/1/2021", "1/1/2021,24:00", "1/1/2021,10:60"] {
            assert!(
                matches!(
                    codec.date_time_to_number(s, TimeUnit::Minute),
                    Err(AnalysisError::InvalidDate(_))
                ),
                "{s} should be rejected as out of range"
            );
        }
    }

    #[test]
    fn test_time_unit_from_str() {
        assert_eq!("min".parse::<TimeUnit>().unwrap(), TimeUnit::Minute);
        assert_eq!("Hour".parse::<TimeUnit>().unwrap(), TimeUnit::Hour);
        assert!("day".parse::<TimeUnit>().is_err());
        assert_eq!(TimeUnit::Hour.to_string(), "hour");
    }
}
