//! Seals attached to a charter.

use crate::assembler::XmlAssembler;
use crate::error::Result;
use crate::fields::{allowed, non_empty, text_or_element, TextOrElement};
use crate::xml::Element;

/// The legend (inscription) of a seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Legend {
    /// One legend without location.
    Single(String),
    /// Legends with the place they are found on the seal, e.g. `("Avers", "+ S. OTTONIS")`.
    Placed(Vec<(String, String)>),
}

impl From<&str> for Legend {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Legend {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<(String, String)>> for Legend {
    fn from(value: Vec<(String, String)>) -> Self {
        Self::Placed(value)
    }
}

impl From<Vec<(&str, &str)>> for Legend {
    fn from(value: Vec<(&str, &str)>) -> Self {
        Self::Placed(
            value
                .into_iter()
                .map(|(place, text)| (place.to_string(), text.to_string()))
                .collect(),
        )
    }
}

/// A seal description.
///
/// # Examples
/// ```
/// use to_cei::seal::Seal;
/// use to_cei::assembler::XmlAssembler;
///
/// assert!(Seal::default().assemble(false).is_none());
///
/// let seal = Seal::default()
///     .with_material("Wachs")
///     .with_sigillant("Otto")
///     .unwrap();
/// let xml = seal.assemble(false).unwrap();
/// assert_eq!(xml.name(), "seal");
/// assert_eq!(xml.elements().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seal {
    condition: Option<String>,
    dimensions: Option<String>,
    legend: Option<Legend>,
    material: Option<String>,
    sigillant: Option<TextOrElement>,
}

impl Seal {
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = non_empty(Some(condition.into()));
        self
    }

    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.dimensions = non_empty(Some(dimensions.into()));
        self
    }

    /// An empty single legend or an empty list clears the legend.
    pub fn with_legend(mut self, legend: impl Into<Legend>) -> Self {
        self.legend = match legend.into() {
            Legend::Single(text) if text.is_empty() => None,
            Legend::Placed(list) if list.is_empty() => None,
            legend => Some(legend),
        };
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = non_empty(Some(material.into()));
        self
    }

    /// Sigillant as text or as a `cei:persName`/`cei:orgName` element.
    pub fn with_sigillant(mut self, sigillant: impl Into<TextOrElement>) -> Result<Self> {
        self.sigillant = text_or_element(Some(sigillant.into()), allowed::SIGILLANT)?;
        Ok(self)
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn dimensions(&self) -> Option<&str> {
        self.dimensions.as_deref()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    pub fn sigillant(&self) -> Option<&TextOrElement> {
        self.sigillant.as_ref()
    }

    fn legends(&self) -> Vec<Element> {
        match &self.legend {
            None => Vec::new(),
            Some(Legend::Single(text)) => vec![Element::cei("legend").with_text(text.as_str())],
            Some(Legend::Placed(list)) => list
                .iter()
                .map(|(place, text)| {
                    Element::cei("legend")
                        .with_attr("place", place.as_str())
                        .with_text(text.as_str())
                })
                .collect(),
        }
    }
}

impl XmlAssembler for Seal {
    fn assemble(&self, _schema_location: bool) -> Option<Element> {
        let sigillant = self.sigillant.as_ref().map(|sigillant| match sigillant {
            TextOrElement::Text(text) => Element::cei("sigillant").with_text(text.as_str()),
            TextOrElement::Element(element) => Element::cei("sigillant").with_child(element.clone()),
        });

        let mut children = Vec::new();
        children.push(
            self.condition
                .as_deref()
                .map(|c| Element::cei("sealCondition").with_text(c)),
        );
        children.push(
            self.dimensions
                .as_deref()
                .map(|d| Element::cei("sealDimensions").with_text(d)),
        );
        children.extend(self.legends().into_iter().map(Some));
        children.push(
            self.material
                .as_deref()
                .map(|m| Element::cei("sealMaterial").with_text(m)),
        );
        children.push(sigillant);

        Element::cei_composite("seal", children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CeiError;
    use crate::xml::Node;

    fn child_names(element: &Element) -> Vec<&str> {
        element.elements().map(Element::name).collect()
    }

    #[test]
    fn test_empty_seal_is_none() {
        assert!(Seal::default().assemble(false).is_none());
        assert_eq!(Seal::default().to_xml_string().unwrap(), "");
    }

    #[test]
    fn test_empty_values_do_not_count() {
        let seal = Seal::default()
            .with_condition("")
            .with_legend("")
            .with_legend(Vec::<(String, String)>::new())
            .with_sigillant("")
            .unwrap();
        assert!(seal.assemble(false).is_none());
    }

    #[test]
    fn test_full_seal_order() {
        let seal = Seal::default()
            .with_sigillant("Otto von Freising")
            .unwrap()
            .with_material("Wachs")
            .with_legend(vec![("Avers", "+ S. OTTONIS"), ("Revers", "AVE")])
            .with_dimensions("5 cm")
            .with_condition("beschädigt");
        let xml = seal.assemble(false).unwrap();

        assert_eq!(
            child_names(&xml),
            vec![
                "sealCondition",
                "sealDimensions",
                "legend",
                "legend",
                "sealMaterial",
                "sigillant"
            ]
        );
        let legends = xml.find_all("legend");
        assert_eq!(legends[0].attr("place"), Some("Avers"));
        assert_eq!(legends[1].text(), Some("AVE"));
    }

    #[test]
    fn test_single_legend_has_no_place() {
        let xml = Seal::default().with_legend("SIGILLVM").assemble(false).unwrap();
        let legend = xml.find("legend").unwrap();
        assert_eq!(legend.attr("place"), None);
        assert_eq!(legend.text(), Some("SIGILLVM"));
    }

    #[test]
    fn test_sigillant_element_is_wrapped() {
        let person = Element::cei("persName").with_attr("key", "otto").with_text("Otto");
        let xml = Seal::default()
            .with_sigillant(person.clone())
            .unwrap()
            .assemble(false)
            .unwrap();
        let sigillant = xml.find("sigillant").unwrap();
        assert_eq!(sigillant.nodes(), &[Node::Element(person)]);
    }

    #[test]
    fn test_sigillant_rejects_other_elements() {
        let result = Seal::default().with_sigillant(Element::cei("placeName"));
        assert!(matches!(result, Err(CeiError::WrongElement { .. })));
    }
}
