//! Normalization of caller supplied dates.

use chrono::{NaiveDate, NaiveDateTime};

use super::mom::parse_mom;
use super::{CanonicalTime, DateInput, DatePart, DateValue, TimeRange};
use crate::config::NO_DATE_VALUE;
use crate::error::{CeiError, Result};

/// Accepted ISO date-time layouts, tried in order.
const ISO_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize any supported date input.
///
/// Returns `None` for empty input and for the MOM-CA "unknown date"
/// sentinel, alone or as both sides of a pair.
///
/// # Examples
/// ```
/// use to_cei::date::{normalize, DateInput, DateValue};
///
/// assert_eq!(normalize(DateInput::from("99999999")).unwrap(), None);
/// assert!(matches!(
///     normalize(DateInput::from("1307-02-22")).unwrap(),
///     Some(DateValue::Single(_))
/// ));
/// assert!(matches!(
///     normalize(DateInput::from("13079999")).unwrap(),
///     Some(DateValue::Range(_))
/// ));
/// ```
pub fn normalize(input: DateInput) -> Result<Option<DateValue>> {
    match input {
        DateInput::Empty => Ok(None),
        DateInput::Single(part) => normalize_single(part),
        DateInput::Pair(from, to) => normalize_pair(from, to),
    }
}

fn normalize_single(part: DatePart) -> Result<Option<DateValue>> {
    match part {
        DatePart::Text(text) if text.is_empty() || text == NO_DATE_VALUE => Ok(None),
        DatePart::Text(text) => parse_text(&text).map(Some),
        DatePart::Calendar(value) => Ok(Some(DateValue::Single(value.into()))),
        DatePart::Canonical(value) => Ok(Some(DateValue::Single(value))),
    }
}

fn normalize_pair(from: DatePart, to: DatePart) -> Result<Option<DateValue>> {
    let (from, to) = match (from, to) {
        (DatePart::Text(from), DatePart::Text(to)) => {
            if from == NO_DATE_VALUE && to == NO_DATE_VALUE {
                return Ok(None);
            }
            (single_point(&from)?, single_point(&to)?)
        }
        (DatePart::Calendar(from), DatePart::Calendar(to)) => (from.into(), to.into()),
        (DatePart::Canonical(from), DatePart::Canonical(to)) => (from, to),
        (from, to) => {
            return Err(CeiError::MismatchedDatePair {
                first: from.kind(),
                second: to.kind(),
            })
        }
    };
    Ok(Some(DateValue::Range(TimeRange::new(from, to)?)))
}

/// Parse one side of a pair, which has to be a single day.
fn single_point(text: &str) -> Result<CanonicalTime> {
    if text == NO_DATE_VALUE {
        return Err(CeiError::NestedDateRange(text.to_string()));
    }
    match parse_text(text)? {
        DateValue::Single(time) => Ok(time),
        DateValue::Range(_) => Err(CeiError::NestedDateRange(text.to_string())),
    }
}

/// ISO first, MOM-CA second.
fn parse_text(text: &str) -> Result<DateValue> {
    match parse_iso(text) {
        Some(time) => Ok(DateValue::Single(time)),
        None => parse_mom(text),
    }
}

fn parse_iso(text: &str) -> Option<CanonicalTime> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.into());
    }
    ISO_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(CanonicalTime::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn single(input: impl Into<DateInput>) -> String {
        match normalize(input.into()).unwrap() {
            Some(DateValue::Single(time)) => time.to_mom_value(),
            other => panic!("expected a single date, got {other:?}"),
        }
    }

    fn range(input: impl Into<DateInput>) -> (String, String) {
        match normalize(input.into()).unwrap() {
            Some(DateValue::Range(range)) => {
                (range.from().to_mom_value(), range.to().to_mom_value())
            }
            other => panic!("expected a range, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(normalize(DateInput::Empty).unwrap(), None);
        assert_eq!(normalize("".into()).unwrap(), None);
        assert_eq!(normalize("99999999".into()).unwrap(), None);
        assert_eq!(normalize(("99999999", "99999999").into()).unwrap(), None);
    }

    #[test]
    fn test_iso_strings() {
        assert_eq!(single("1307-02-22"), "13070222");
        assert_eq!(single("1307-02-22T12:30:00"), "13070222");
        assert_eq!(single("1307-02-22T12:30:00.250"), "13070222");
        assert_eq!(single("1307-02-22 08:00:00"), "13070222");
        assert_eq!(single("1307-02-22T12:30"), "13070222");
        assert_eq!(single("1307-02-22 12:30"), "13070222");
    }

    #[test]
    fn test_mom_strings() {
        assert_eq!(single("13070222"), "13070222");
        assert_eq!(range("14000299"), ("14000201".into(), "14000228".into()));
        assert_eq!(range("14040299"), ("14040201".into(), "14040229".into()));
        assert_eq!(range("13009900"), ("13000101".into(), "13001231".into()));
    }

    #[test]
    fn test_invalid_strings() {
        for value in ["17980231", "1798-02-311", "179802311", "1798-02-31", "Pfingsten 1307"] {
            assert!(
                matches!(normalize(value.into()), Err(CeiError::InvalidDate(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_calendar_values() {
        let date = NaiveDate::from_ymd_opt(1492, 10, 12).unwrap();
        assert_eq!(single(date), "14921012");

        let utc = Utc.with_ymd_and_hms(1989, 11, 9, 18, 0, 0).unwrap();
        assert_eq!(single(utc), "19891109");

        let canonical = CanonicalTime::from_ymd(-44, 3, 15).unwrap();
        assert_eq!(single(canonical), "-0440315");
    }

    #[test]
    fn test_pairs() {
        assert_eq!(
            range(("1300-01-01", "1300-12-31")),
            ("13000101".into(), "13001231".into())
        );
        assert_eq!(
            range(("13000101", "13001231")),
            ("13000101".into(), "13001231".into())
        );
        let from = NaiveDate::from_ymd_opt(1300, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(1300, 6, 1).unwrap();
        assert_eq!(range((from, to)), ("13000101".into(), "13000601".into()));
    }

    #[test]
    fn test_pair_with_same_day() {
        assert_eq!(
            range(("13000101", "1300-01-01")),
            ("13000101".into(), "13000101".into())
        );
        assert_eq!(
            range(("1300-01-01T12:00:00", "1300-01-01")),
            ("13000101".into(), "13000101".into())
        );
    }

    #[test]
    fn test_pair_rejects_ranges_on_either_side() {
        for pair in [
            ("13009999", "13010101"),
            ("13000101", "13000299"),
            ("99999999", "13000101"),
            ("13000101", "99999999"),
        ] {
            assert!(
                matches!(normalize(pair.into()), Err(CeiError::NestedDateRange(_))),
                "{pair:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_pair_rejects_mixed_kinds() {
        let date = NaiveDate::from_ymd_opt(1300, 1, 1).unwrap();
        assert!(matches!(
            normalize(("13000101", date).into()),
            Err(CeiError::MismatchedDatePair {
                first: "text",
                second: "calendar"
            })
        ));
    }

    #[test]
    fn test_pair_rejects_inverted_range() {
        assert!(matches!(
            normalize(("13001231", "13000101").into()),
            Err(CeiError::InvertedDateRange { .. })
        ));
    }

    #[test]
    fn test_pair_rejects_empty_side() {
        assert!(matches!(
            normalize(("", "13000101").into()),
            Err(CeiError::InvalidDate(_))
        ));
    }
}
