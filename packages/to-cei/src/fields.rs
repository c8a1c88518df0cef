//! Field value helpers shared by charters and seals.

use serde::Deserialize;

use crate::error::{CeiError, Result};
use crate::xml::Element;

/// Allowed CEI tags per field.
pub mod allowed {
    pub const ABSTRACT: &[&str] = &["abstract"];
    pub const DATE: &[&str] = &["date", "dateRange"];
    pub const DATE_QUOTE: &[&str] = &["quoteOriginaldatierung"];
    pub const ISSUED_PLACE: &[&str] = &["placeName"];
    pub const ISSUER: &[&str] = &["issuer"];
    pub const RECIPIENT: &[&str] = &["recipient"];
    pub const NOTARIAL_AUTHENTICATION: &[&str] = &["notariusDesc"];
    pub const TRANSCRIPTION: &[&str] = &["tenor"];
    pub const INDEX: &[&str] = &["index"];
    pub const INDEX_GEO_FEATURE: &[&str] = &["geogName"];
    pub const INDEX_ORGANIZATION: &[&str] = &["orgName"];
    pub const INDEX_PERSON: &[&str] = &["persName"];
    pub const INDEX_PLACE: &[&str] = &["placeName"];
    pub const WITNESS: &[&str] = &["persName"];
    pub const SEAL_DESCRIPTION: &[&str] = &["sealDesc"];
    pub const SIGILLANT: &[&str] = &["persName", "orgName"];
}

/// A field given either as plain text or as a complete CEI element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOrElement {
    Text(String),
    Element(Element),
}

impl TextOrElement {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Text(_) => None,
            Self::Element(element) => Some(element),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// Text as a new CEI element named `tag`, or a copy of the element.
    pub fn to_cei(&self, tag: &str) -> Element {
        match self {
            Self::Text(text) => Element::cei(tag).with_text(text.as_str()),
            Self::Element(element) => element.clone(),
        }
    }
}

impl From<&str> for TextOrElement {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TextOrElement {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Element> for TextOrElement {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

/// Check an element against the CEI namespace and a tag whitelist.
pub fn check_element(element: &Element, allowed: &'static [&'static str]) -> Result<()> {
    if !element.is_cei() {
        return Err(CeiError::WrongNamespace {
            found: element.namespace().unwrap_or_default().to_string(),
        });
    }
    if !allowed.contains(&element.name()) {
        return Err(CeiError::WrongElement {
            expected: allowed.to_vec(),
            found: element.name().to_string(),
        });
    }
    Ok(())
}

/// Validate a text-or-element value for a field.
///
/// Empty text counts as no value.
///
/// # Examples
/// ```
/// use to_cei::fields::{text_or_element, allowed, TextOrElement};
/// use to_cei::xml::Element;
///
/// assert_eq!(text_or_element(Some("".into()), allowed::ABSTRACT).unwrap(), None);
/// assert!(text_or_element(Some(Element::cei("date").into()), allowed::DATE).is_ok());
/// assert!(text_or_element(Some(Element::cei("issuer").into()), allowed::DATE).is_err());
/// ```
pub fn text_or_element(
    value: Option<TextOrElement>,
    allowed: &'static [&'static str],
) -> Result<Option<TextOrElement>> {
    match value {
        None => Ok(None),
        Some(TextOrElement::Text(text)) if text.is_empty() => Ok(None),
        Some(TextOrElement::Text(text)) => Ok(Some(TextOrElement::Text(text))),
        Some(TextOrElement::Element(element)) => {
            check_element(&element, allowed)?;
            Ok(Some(TextOrElement::Element(element)))
        }
    }
}

/// Validate every entry of a text-or-element list, dropping empty text.
pub fn text_or_element_list(
    values: Vec<TextOrElement>,
    allowed: &'static [&'static str],
) -> Result<Vec<TextOrElement>> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        if let Some(value) = text_or_element(Some(value), allowed)? {
            out.push(value);
        }
    }
    Ok(out)
}

/// A value that may be given once or as a list.
///
/// Lists are tried first when deserializing, so a one-entry list never
/// ends up as a single struct read from a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

impl From<&str> for OneOrMany<TextOrElement> {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl From<String> for OneOrMany<TextOrElement> {
    fn from(value: String) -> Self {
        Self::One(value.into())
    }
}

impl From<Element> for OneOrMany<TextOrElement> {
    fn from(value: Element) -> Self {
        Self::One(value.into())
    }
}

impl From<TextOrElement> for OneOrMany<TextOrElement> {
    fn from(value: TextOrElement) -> Self {
        Self::One(value)
    }
}

impl From<Vec<&str>> for OneOrMany<TextOrElement> {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(TextOrElement::from).collect())
    }
}

impl From<Vec<String>> for OneOrMany<TextOrElement> {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values.into_iter().map(TextOrElement::from).collect())
    }
}

/// `None` for empty strings.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Collect strings, dropping empty entries.
pub fn str_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .filter(|v: &String| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through() {
        let value = text_or_element(Some("Agnes".into()), allowed::ISSUER).unwrap();
        assert_eq!(value, Some(TextOrElement::Text("Agnes".into())));
    }

    #[test]
    fn test_allowed_element() {
        let element = Element::cei("dateRange").with_attr("from", "13000101");
        let value = text_or_element(Some(element.clone().into()), allowed::DATE).unwrap();
        assert_eq!(value.as_ref().and_then(TextOrElement::as_element), Some(&element));
    }

    #[test]
    fn test_wrong_tag() {
        let ok = text_or_element(Some(Element::cei("persName").into()), allowed::SIGILLANT);
        assert!(ok.is_ok());
        let err = text_or_element(Some(Element::cei("placeName").into()), allowed::SIGILLANT)
            .unwrap_err();
        assert!(matches!(
            err,
            CeiError::WrongElement { ref found, .. } if found == "placeName"
        ));
        assert!(err.to_string().contains("persName, orgName"));
    }

    #[test]
    fn test_wrong_namespace() {
        let element = Element::new(Some("http://www.tei-c.org/ns/1.0"), "abstract");
        assert!(matches!(
            text_or_element(Some(element.into()), allowed::ABSTRACT),
            Err(CeiError::WrongNamespace { .. })
        ));
        let element = Element::new(None, "abstract");
        assert!(matches!(
            text_or_element(Some(element.into()), allowed::ABSTRACT),
            Err(CeiError::WrongNamespace { ref found }) if found.is_empty()
        ));
    }

    #[test]
    fn test_list_drops_empty_text() {
        let values = vec!["".into(), "Otto".into(), Element::cei("issuer").into()];
        let list = text_or_element_list(values, allowed::ISSUER).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_one_or_many() {
        assert_eq!(OneOrMany::<TextOrElement>::from("a").into_vec().len(), 1);
        assert_eq!(OneOrMany::<TextOrElement>::from(vec!["a", "b"]).into_vec().len(), 2);
    }

    #[test]
    fn test_to_cei() {
        let text = TextOrElement::from("Wien").to_cei("placeName");
        assert_eq!(text.name(), "placeName");
        assert_eq!(text.text(), Some("Wien"));
    }

    #[test]
    fn test_non_empty_and_str_list() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".to_string()));
        assert_eq!(str_list(["a", "", "b"]), vec!["a".to_string(), "b".to_string()]);
    }
}
