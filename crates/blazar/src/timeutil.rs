use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Date format accepted on the command line and sent to the service.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Date format of the dates stored on a lease by the service.
pub const LEASE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

static ELAPSED_TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([smhd])$").expect("elapsed time regex is valid"));

pub fn parse_api_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, API_DATE_FORMAT).ok()
}

pub fn format_api_date(value: &NaiveDateTime) -> String {
    value.format(API_DATE_FORMAT).to_string()
}

/// Parses a date as stored on a lease, accepting the API format as well.
pub fn parse_lease_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LEASE_DATE_FORMAT)
        .ok()
        .or_else(|| parse_api_date(value))
}

/// Converts an elapsed time such as `30m` or `2d` to a signed number of seconds.
pub fn from_elapsed_time_to_seconds(elapsed_time: &str, pos_sign: bool) -> Result<i64> {
    let seconds = from_elapsed_time_to_delta(elapsed_time, true)?.num_seconds();
    Ok(if pos_sign { seconds } else { -seconds })
}

pub fn from_elapsed_time_to_delta(elapsed_time: &str, pos_sign: bool) -> Result<Duration> {
    let invalid = || Error::client("Invalid time format for option.");
    let captures = ELAPSED_TIME_REGEX
        .captures(elapsed_time)
        .ok_or_else(invalid)?;
    let value: i64 = captures[1].parse().map_err(|_| invalid())?;
    let delta = match &captures[2] {
        "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        _ => None,
    }
    .ok_or_else(invalid)?;
    Ok(if pos_sign { delta } else { -delta })
}

/// Moves a date stored on a lease by `delta` and renders it in the API format.
pub fn shift_lease_date(stored: &str, delta: Duration) -> Result<String> {
    let date = parse_lease_date(stored)
        .ok_or_else(|| Error::client(format!("unable to parse lease date '{}'", stored)))?;
    let shifted = date
        .checked_add_signed(delta)
        .ok_or_else(|| Error::client(format!("lease date '{}' out of range", stored)))?;
    Ok(format_api_date(&shifted))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_elapsed_time_units() {
        assert_eq!(from_elapsed_time_to_seconds("2h", true).unwrap(), 7200);
        assert_eq!(from_elapsed_time_to_seconds("2h", false).unwrap(), -7200);
        assert_eq!(from_elapsed_time_to_seconds("45s", true).unwrap(), 45);
        assert_eq!(from_elapsed_time_to_seconds("3m", true).unwrap(), 180);
        assert_eq!(from_elapsed_time_to_seconds("1d", false).unwrap(), -86400);
    }

    #[test]
    fn test_elapsed_time_rejects_garbage() {
        for value in ["", "h", "2", "2w", "-2h", "2h ", " 2h", "1.5h", "2hh", "2|"] {
            let error = from_elapsed_time_to_seconds(value, true).unwrap_err();
            assert_eq!(error.code(), 500, "{}", value);
        }
    }

    #[test]
    fn test_elapsed_time_overflow_is_an_error() {
        assert!(from_elapsed_time_to_seconds("99999999999999999999d", true).is_err());
        assert!(from_elapsed_time_to_seconds("9999999999999999d", true).is_err());
    }

    #[test]
    fn test_shift_lease_date() {
        let delta = from_elapsed_time_to_delta("1h", true).unwrap();
        assert_eq!(
            shift_lease_date("2030-01-01T10:00:00.000000", delta).unwrap(),
            "2030-01-01 11:00"
        );
        let delta = from_elapsed_time_to_delta("1d", false).unwrap();
        assert_eq!(
            shift_lease_date("2030-01-01T10:00:00", delta).unwrap(),
            "2029-12-31 10:00"
        );
        let delta = from_elapsed_time_to_delta("30m", true).unwrap();
        assert_eq!(
            shift_lease_date("2030-01-01 10:00", delta).unwrap(),
            "2030-01-01 10:30"
        );
    }

    #[test]
    fn test_shift_truncates_fractional_seconds() {
        let delta = from_elapsed_time_to_delta("0s", true).unwrap();
        assert_eq!(
            shift_lease_date("2030-01-01T10:00:59.999999", delta).unwrap(),
            "2030-01-01 10:00"
        );
    }

    #[test]
    fn test_parse_api_date() {
        let date = parse_api_date("2020-07-24 20:00").unwrap();
        assert_eq!(format_api_date(&date), "2020-07-24 20:00");
        assert!(parse_api_date("2020-07-24T20:00").is_none());
        assert!(parse_api_date("tomorrow").is_none());
    }
}
