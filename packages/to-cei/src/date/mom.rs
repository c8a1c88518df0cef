//! MOM-CA date strings.

use std::sync::LazyLock;

use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;

use super::{CanonicalTime, DateValue, TimeRange};
use crate::error::{CeiError, Result};

/// Optional sign, three or four digit year, two digit month and day.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MOM_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>-?[129]?[0-9][0-9][0-9])(?P<month>[019][0-9])(?P<day>[01239][0-9])$")
        .expect("valid regex")
});

/// Month and day value meaning "the whole period".
const WHOLE_PERIOD: u32 = 99;

/// Last day of a month, honoring Gregorian leap years.
///
/// # Examples
/// ```
/// use to_cei::date::last_day_of_month;
///
/// assert_eq!(last_day_of_month(1400, 2), Some(28));
/// assert_eq!(last_day_of_month(1404, 2), Some(29));
/// assert_eq!(last_day_of_month(1404, 13), None);
/// ```
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
        .map(|last| last.day())
}

/// Parse a MOM-CA date string.
///
/// Month `99` expands to the whole year, day `99` to the whole month. Every
/// other value has to name an existing day.
pub fn parse_mom(value: &str) -> Result<DateValue> {
    let invalid = || CeiError::InvalidDate(value.to_string());
    let caps = MOM_DATE_PATTERN.captures(value).ok_or_else(invalid)?;

    let year: i32 = caps["year"].parse().map_err(|_| invalid())?;
    let month: u32 = caps["month"].parse().map_err(|_| invalid())?;
    let day: u32 = caps["day"].parse().map_err(|_| invalid())?;

    if month == WHOLE_PERIOD {
        let range = TimeRange::new(
            CanonicalTime::from_ymd(year, 1, 1)?,
            CanonicalTime::from_ymd(year, 12, 31)?,
        )?;
        return Ok(DateValue::Range(range));
    }

    if day == WHOLE_PERIOD {
        let last = last_day_of_month(year, month).ok_or_else(invalid)?;
        let range = TimeRange::new(
            CanonicalTime::from_ymd(year, month, 1)?,
            CanonicalTime::from_ymd(year, month, last)?,
        )?;
        return Ok(DateValue::Range(range));
    }

    CanonicalTime::from_ymd(year, month, day)
        .map(DateValue::Single)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_bounds(value: DateValue) -> (String, String) {
        match value {
            DateValue::Range(range) => (range.from().to_mom_value(), range.to().to_mom_value()),
            DateValue::Single(time) => panic!("expected a range, got {time}"),
        }
    }

    #[test]
    fn test_exact_values_round_trip() {
        for value in ["13070222", "0980105", "-0440315", "19991231", "20000229"] {
            match parse_mom(value) {
                Ok(DateValue::Single(time)) => assert_eq!(time.to_mom_value(), value),
                other => panic!("unexpected result for {value}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_whole_year() {
        assert_eq!(
            range_bounds(parse_mom("13009901").unwrap()),
            ("13000101".to_string(), "13001231".to_string())
        );
        // The day is ignored when the month is unknown
        assert_eq!(
            range_bounds(parse_mom("13009999").unwrap()),
            ("13000101".to_string(), "13001231".to_string())
        );
    }

    #[test]
    fn test_whole_month_leap_years() {
        assert_eq!(range_bounds(parse_mom("14000299").unwrap()).1, "14000228");
        assert_eq!(range_bounds(parse_mom("14040299").unwrap()).1, "14040229");
        assert_eq!(range_bounds(parse_mom("16000299").unwrap()).1, "16000229");
        assert_eq!(range_bounds(parse_mom("13070499").unwrap()).1, "13070430");
    }

    #[test]
    fn test_invalid_values() {
        for value in ["17980231", "179802311", "1798-02-31", "13071399", "30000101", "", "abc"] {
            assert!(
                matches!(parse_mom(value), Err(CeiError::InvalidDate(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(1900, 2), Some(28));
        assert_eq!(last_day_of_month(2000, 2), Some(29));
        assert_eq!(last_day_of_month(0, 2), Some(29));
        assert_eq!(last_day_of_month(-4, 2), Some(29));
        assert_eq!(last_day_of_month(1300, 12), Some(31));
        assert_eq!(last_day_of_month(1300, 0), None);
        assert_eq!(last_day_of_month(1300, 13), None);
        assert_eq!(last_day_of_month(1301, 4), Some(30));
    }
}
