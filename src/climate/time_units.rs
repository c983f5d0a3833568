//! Decoding of CF-convention time coordinates (`"hours since 1800-1-1 00:00:0.0"`).

use crate::climate::error::ClimateError;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::str::FromStr;

/// A parsed CF time unit: a step length and the reference instant it counts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfTimeUnits {
    millis_per_step: f64,
    epoch: NaiveDateTime,
}

impl CfTimeUnits {
    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    /// Converts one raw offset into a timestamp, rounded to the millisecond.
    pub fn decode(&self, value: f64) -> Option<NaiveDateTime> {
        let millis = (value * self.millis_per_step).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return None;
        }
        self.epoch
            .checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)
    }
}

impl FromStr for CfTimeUnits {
    type Err = ClimateError;

    fn from_str(units: &str) -> Result<Self, Self::Err> {
        let invalid = || ClimateError::InvalidTimeUnits(units.to_string());
        let (step, reference) = units.trim().split_once(" since ").ok_or_else(invalid)?;

        let millis_per_step = match step.trim().to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => 86_400_000.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600_000.0,
            "minutes" | "minute" | "mins" | "min" => 60_000.0,
            "seconds" | "second" | "secs" | "sec" | "s" => 1_000.0,
            _ => return Err(invalid()),
        };
        let epoch = parse_reference(reference).ok_or_else(invalid)?;
        Ok(Self {
            millis_per_step,
            epoch,
        })
    }
}

/// Decodes raw time coordinate values with the given CF `units` attribute.
pub fn decode_cf_times(values: &[f64], units: &str) -> Result<Vec<NaiveDateTime>, ClimateError> {
    let parsed: CfTimeUnits = units.parse()?;
    values
        .iter()
        .map(|&value| {
            parsed.decode(value).ok_or_else(|| ClimateError::TimeOutOfRange {
                units: units.to_string(),
                value,
            })
        })
        .collect()
}

// Accepts unpadded fields ("1800-1-1 00:00:0.0"), a 'T' separator and a trailing "Z"/"UTC".
fn parse_reference(reference: &str) -> Option<NaiveDateTime> {
    let reference = reference
        .trim()
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim();
    let (date_part, time_part) = match reference.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (reference, None),
    };

    let mut date_fields = date_part.split('-');
    let year: i32 = date_fields.next()?.parse().ok()?;
    let month: u32 = date_fields.next().unwrap_or("1").parse().ok()?;
    let day: u32 = date_fields.next().unwrap_or("1").parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let (hour, minute, second) = match time_part.filter(|t| !t.is_empty()) {
        Some(time) => {
            let mut time_fields = time.split(':');
            let hour: u32 = time_fields.next()?.parse().ok()?;
            let minute: u32 = time_fields.next().unwrap_or("0").parse().ok()?;
            let second: f64 = time_fields.next().unwrap_or("0").parse().ok()?;
            (hour, minute, second)
        }
        None => (0, 0, 0.0),
    };
    let whole_seconds = second.trunc() as u32;
    let millis = ((second - second.trunc()) * 1000.0).round() as u32;
    date.and_hms_milli_opt(hour, minute, whole_seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_ncep_hours_since_1800() -> Result<(), Box<dyn std::error::Error>> {
        let times = decode_cf_times(&[1297320.0, 1298064.0], "hours since 1800-1-1 00:00:0.0")?;
        assert_eq!(times, vec![ymd(1948, 1, 1), ymd(1948, 2, 1)]);
        Ok(())
    }

    #[test]
    fn test_days_since_iso_reference() -> Result<(), Box<dyn std::error::Error>> {
        let units: CfTimeUnits = "days since 1970-01-01T00:00:00Z".parse()?;
        assert_eq!(units.epoch(), ymd(1970, 1, 1));
        assert_eq!(units.decode(31.0), Some(ymd(1970, 2, 1)));
        assert_eq!(units.decode(0.5), Some(ymd(1970, 1, 1) + TimeDelta::hours(12)));
        Ok(())
    }

    #[test]
    fn test_date_only_reference() -> Result<(), Box<dyn std::error::Error>> {
        let times = decode_cf_times(&[60.0], "minutes since 2000-01-01")?;
        assert_eq!(times, vec![ymd(2000, 1, 1) + TimeDelta::hours(1)]);
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_units() {
        assert!(matches!(
            "fortnights since 1800-01-01".parse::<CfTimeUnits>(),
            Err(ClimateError::InvalidTimeUnits(_))
        ));
        assert!(matches!(
            decode_cf_times(&[1.0], "hours"),
            Err(ClimateError::InvalidTimeUnits(_))
        ));
        assert!(matches!(
            decode_cf_times(&[f64::NAN], "hours since 1800-01-01"),
            Err(ClimateError::TimeOutOfRange { .. })
        ));
    }
}
