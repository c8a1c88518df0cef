//! Rendering of normalized dates as CEI elements.

use super::DateValue;
use crate::config::{NO_DATE_TEXT, NO_DATE_VALUE};
use crate::xml::Element;

/// Build `cei:date` or `cei:dateRange` for a charter.
///
/// Without caller text, the element text is the long form of the date. An
/// unknown date is written with the MOM-CA sentinel value.
///
/// # Examples
/// ```
/// use to_cei::date::{encode_date, normalize, DateInput};
///
/// let value = normalize(DateInput::from("13070222")).unwrap();
/// let date = encode_date(value.as_ref(), None);
/// assert_eq!(date.name(), "date");
/// assert_eq!(date.attr("value"), Some("13070222"));
/// assert_eq!(date.text(), Some("+01307-02-22"));
///
/// let unknown = encode_date(None, None);
/// assert_eq!(unknown.text(), Some("No date"));
/// assert_eq!(unknown.attr("value"), Some("99999999"));
/// ```
pub fn encode_date(value: Option<&DateValue>, text: Option<&str>) -> Element {
    match value {
        Some(DateValue::Single(time)) => Element::cei("date")
            .with_attr("value", time.to_mom_value())
            .with_text(text.map_or_else(|| time.to_long_date(), str::to_string)),
        Some(DateValue::Range(range)) => Element::cei("dateRange")
            .with_attr("from", range.from().to_mom_value())
            .with_attr("to", range.to().to_mom_value())
            .with_text(text.map_or_else(
                || format!("{} - {}", range.from().to_long_date(), range.to().to_long_date()),
                str::to_string,
            )),
        None => Element::cei("date")
            .with_attr("value", NO_DATE_VALUE)
            .with_text(text.unwrap_or(NO_DATE_TEXT)),
    }
}
