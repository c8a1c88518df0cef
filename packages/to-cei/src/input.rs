//! Reading charters and groups from YAML or JSON files.
//!
//! An input document is either one charter or a group with a `name` and a
//! list of `charters`. Every field of a charter can be given. Fields that
//! accept XML take either plain text or a map with an `xml` key holding a
//! fragment; the `cei` prefix is predeclared for fragments:
//!
//! ```yaml
//! id_text: "1307 II 22"
//! abstract: Agnes schenkt dem Kloster einen Hof.
//! issuers:
//!   - xml: <cei:issuer>Agnes</cei:issuer>
//! date_value: ["13070101", "13071231"]
//! ```
//!
//! MOM dates with a leading zero or a minus sign (`"0980105"`, `"-0440315"`)
//! have to be given as strings. Numeric dates below seven digits have lost
//! their padding and are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Document as XmlDocument;
use serde::Deserialize;

use crate::assembler::XmlAssembler;
use crate::charter::{Charter, Seals};
use crate::config::{CEI_NS, CEI_PREFIX};
use crate::date::DateInput;
use crate::error::{CeiError, Result};
use crate::fields::{OneOrMany, TextOrElement};
use crate::group::CharterGroup;
use crate::seal::{Legend, Seal};
use crate::xml::{element_children, to_element, Element};

/// File formats accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// JSON for `.json` files, YAML for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// An XML fragment given as `{ xml: "<cei:issuer>...</cei:issuer>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XmlFragment {
    pub xml: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextOrXml {
    Text(String),
    Xml(XmlFragment),
}

impl TextOrXml {
    fn into_field(self) -> Result<TextOrElement> {
        match self {
            Self::Text(text) => Ok(TextOrElement::Text(text)),
            Self::Xml(fragment) => Ok(TextOrElement::Element(parse_fragment(&fragment.xml)?)),
        }
    }
}

/// A date string; unquoted MOM dates arrive as numbers in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateText {
    Text(String),
    Number(i64),
}

impl DateText {
    /// Smallest number that is a MOM date without lost padding.
    const MIN_NUMBER: i64 = 1_000_000;

    fn into_string(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Number(number) if number >= Self::MIN_NUMBER => Ok(number.to_string()),
            Self::Number(number) => Err(CeiError::InvalidInput(format!(
                "numeric date {number} is ambiguous, quote MOM dates with a leading zero or minus sign"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateValueInput {
    Single(DateText),
    Pair(DateText, DateText),
}

impl TryFrom<DateValueInput> for DateInput {
    type Error = CeiError;

    fn try_from(value: DateValueInput) -> Result<Self> {
        Ok(match value {
            DateValueInput::Single(text) => DateInput::from(text.into_string()?),
            DateValueInput::Pair(from, to) => {
                DateInput::from((from.into_string()?, to.into_string()?))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacedLegend {
    pub place: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegendInput {
    Single(String),
    Placed(Vec<PlacedLegend>),
}

impl From<LegendInput> for Legend {
    fn from(value: LegendInput) -> Self {
        match value {
            LegendInput::Single(text) => Legend::Single(text),
            LegendInput::Placed(legends) => Legend::Placed(
                legends
                    .into_iter()
                    .map(|legend| (legend.place, legend.text))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealInput {
    pub condition: Option<String>,
    pub dimensions: Option<String>,
    pub legend: Option<LegendInput>,
    pub material: Option<String>,
    pub sigillant: Option<TextOrXml>,
}

impl TryFrom<SealInput> for Seal {
    type Error = CeiError;

    fn try_from(input: SealInput) -> Result<Self> {
        let mut seal = Seal::default();
        if let Some(condition) = input.condition {
            seal = seal.with_condition(condition);
        }
        if let Some(dimensions) = input.dimensions {
            seal = seal.with_dimensions(dimensions);
        }
        if let Some(legend) = input.legend {
            seal = seal.with_legend(Legend::from(legend));
        }
        if let Some(material) = input.material {
            seal = seal.with_material(material);
        }
        if let Some(sigillant) = input.sigillant {
            seal = seal.with_sigillant(sigillant.into_field()?)?;
        }
        Ok(seal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SealItem {
    Text(String),
    Seal(SealInput),
}

/// Seal description: text, a `sealDesc` fragment, one seal or a list of
/// seal texts or seals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SealsInput {
    Text(String),
    List(Vec<SealItem>),
    Xml(XmlFragment),
    Seal(SealInput),
}

impl TryFrom<SealsInput> for Seals {
    type Error = CeiError;

    fn try_from(input: SealsInput) -> Result<Self> {
        match input {
            SealsInput::Text(text) => Ok(Seals::Text(text)),
            SealsInput::Xml(fragment) => Ok(Seals::Element(parse_fragment(&fragment.xml)?)),
            SealsInput::Seal(seal) => Ok(Seals::Seal(seal.try_into()?)),
            SealsInput::List(items) => {
                if items.iter().all(|item| matches!(item, SealItem::Text(_))) {
                    let texts = items
                        .into_iter()
                        .filter_map(|item| match item {
                            SealItem::Text(text) => Some(text),
                            SealItem::Seal(_) => None,
                        })
                        .collect();
                    return Ok(Seals::Texts(texts));
                }
                let seals = items
                    .into_iter()
                    .map(|item| match item {
                        SealItem::Seal(seal) => Seal::try_from(seal),
                        SealItem::Text(text) => Err(CeiError::InvalidInput(format!(
                            "seal list mixes texts and seal descriptions at '{text}'"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Seals::Seals(seals))
            }
        }
    }
}

/// All fields of a charter as read from an input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharterInput {
    pub id_text: String,
    pub id_norm: Option<String>,
    pub id_old: Option<String>,
    pub r#abstract: Option<TextOrXml>,
    pub abstract_sources: Option<OneOrMany<String>>,
    pub archive: Option<String>,
    pub chancellary_remarks: Option<OneOrMany<String>>,
    pub comments: Option<OneOrMany<String>>,
    pub condition: Option<String>,
    pub date: Option<TextOrXml>,
    pub date_quote: Option<TextOrXml>,
    pub date_value: Option<DateValueInput>,
    pub dimensions: Option<String>,
    pub external_link: Option<String>,
    pub footnotes: Option<OneOrMany<String>>,
    pub graphic_urls: Option<OneOrMany<String>>,
    pub index: Option<OneOrMany<TextOrXml>>,
    pub index_geo_features: Option<OneOrMany<TextOrXml>>,
    pub index_organizations: Option<OneOrMany<TextOrXml>>,
    pub index_persons: Option<OneOrMany<TextOrXml>>,
    pub index_places: Option<OneOrMany<TextOrXml>>,
    pub issued_place: Option<TextOrXml>,
    pub issuers: Option<OneOrMany<TextOrXml>>,
    pub language: Option<String>,
    pub literature: Option<OneOrMany<String>>,
    pub literature_abstracts: Option<OneOrMany<String>>,
    pub literature_depictions: Option<OneOrMany<String>>,
    pub literature_editions: Option<OneOrMany<String>>,
    pub literature_secondary: Option<OneOrMany<String>>,
    pub material: Option<String>,
    pub notarial_authentication: Option<TextOrXml>,
    pub recipient: Option<TextOrXml>,
    pub seals: Option<SealsInput>,
    pub tradition: Option<String>,
    pub transcription: Option<TextOrXml>,
    pub transcription_sources: Option<OneOrMany<String>>,
    pub witnesses: Option<OneOrMany<TextOrXml>>,
}

fn strings(values: Option<OneOrMany<String>>) -> Vec<String> {
    values.map(OneOrMany::into_vec).unwrap_or_default()
}

fn fields(values: Option<OneOrMany<TextOrXml>>) -> Result<Vec<TextOrElement>> {
    values
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .map(TextOrXml::into_field)
        .collect()
}

impl TryFrom<CharterInput> for Charter {
    type Error = CeiError;

    fn try_from(input: CharterInput) -> Result<Self> {
        let mut charter = Charter::new(input.id_text)?;

        if let Some(id_norm) = input.id_norm {
            charter.set_id_norm(id_norm);
        }
        if let Some(id_old) = input.id_old {
            charter.set_id_old(id_old);
        }
        if let Some(value) = input.r#abstract {
            charter.set_abstract(value.into_field()?)?;
        }
        if input.issuers.is_some() {
            charter.set_issuers(fields(input.issuers)?)?;
        }
        if let Some(value) = input.recipient {
            charter.set_recipient(value.into_field()?)?;
        }
        charter.set_witnesses(fields(input.witnesses)?)?;

        if let Some(value) = input.date {
            charter.set_date(value.into_field()?)?;
        }
        if let Some(value) = input.date_value {
            charter.set_date_value(DateInput::try_from(value)?)?;
        }
        if let Some(value) = input.date_quote {
            charter.set_date_quote(value.into_field()?)?;
        }
        if let Some(value) = input.issued_place {
            charter.set_issued_place(value.into_field()?)?;
        }

        if let Some(archive) = input.archive {
            charter.set_archive(archive);
        }
        if let Some(link) = input.external_link {
            charter.set_external_link(link)?;
        }
        if let Some(tradition) = input.tradition {
            charter.set_tradition(tradition);
        }
        if let Some(material) = input.material {
            charter.set_material(material);
        }
        if let Some(dimensions) = input.dimensions {
            charter.set_dimensions(dimensions);
        }
        if let Some(condition) = input.condition {
            charter.set_condition(condition);
        }
        if let Some(value) = input.notarial_authentication {
            charter.set_notarial_authentication(value.into_field()?)?;
        }
        if let Some(seals) = input.seals {
            charter.set_seals(Seals::try_from(seals)?)?;
        }
        if let Some(language) = input.language {
            charter.set_language(language);
        }
        if let Some(value) = input.transcription {
            charter.set_transcription(value.into_field()?)?;
        }

        charter
            .set_chancellary_remarks(strings(input.chancellary_remarks))
            .set_graphic_urls(strings(input.graphic_urls))
            .set_literature(strings(input.literature))
            .set_literature_editions(strings(input.literature_editions))
            .set_literature_abstracts(strings(input.literature_abstracts))
            .set_literature_depictions(strings(input.literature_depictions))
            .set_literature_secondary(strings(input.literature_secondary))
            .set_comments(strings(input.comments))
            .set_abstract_sources(strings(input.abstract_sources))
            .set_transcription_sources(strings(input.transcription_sources))
            .set_footnotes(strings(input.footnotes));

        charter.set_index(fields(input.index)?)?;
        charter.set_index_geo_features(fields(input.index_geo_features)?)?;
        charter.set_index_organizations(fields(input.index_organizations)?)?;
        charter.set_index_persons(fields(input.index_persons)?)?;
        charter.set_index_places(fields(input.index_places)?)?;

        Ok(charter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupInput {
    pub name: String,
    #[serde(default)]
    pub charters: Vec<CharterInput>,
}

impl TryFrom<GroupInput> for CharterGroup {
    type Error = CeiError;

    fn try_from(input: GroupInput) -> Result<Self> {
        let charters = input
            .charters
            .into_iter()
            .map(Charter::try_from)
            .collect::<Result<Vec<_>>>()?;
        CharterGroup::new(input.name, charters)
    }
}

/// A loaded input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Charter(Charter),
    Group(CharterGroup),
}

impl Document {
    pub fn to_xml(&self, schema_location: bool) -> Element {
        match self {
            Self::Charter(charter) if schema_location => charter.to_xml_with_schema_location(),
            Self::Charter(charter) => charter.to_xml(),
            Self::Group(group) => group.to_xml(schema_location),
        }
    }

    /// Write the document to `folder` under its canonical file name.
    pub fn to_file(&self, folder: Option<&Path>, schema_location: bool) -> Result<PathBuf> {
        match self {
            Self::Charter(charter) => charter.to_file(folder, schema_location),
            Self::Group(group) => group.to_file(folder, schema_location),
        }
    }
}

impl XmlAssembler for Document {
    fn assemble(&self, schema_location: bool) -> Option<Element> {
        Some(self.to_xml(schema_location))
    }
}

/// Parse a document from a string. A top-level `charters` key makes it a
/// group.
pub fn parse_document(content: &str, format: Format) -> Result<Document> {
    match format {
        Format::Json => {
            let value: serde_json::Value = serde_json::from_str(content)?;
            if value.get("charters").is_some() {
                Ok(Document::Group(serde_json::from_value::<GroupInput>(value)?.try_into()?))
            } else {
                Ok(Document::Charter(serde_json::from_value::<CharterInput>(value)?.try_into()?))
            }
        }
        Format::Yaml => {
            let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(content)?;
            if value.get("charters").is_some() {
                Ok(Document::Group(serde_yaml_ng::from_value::<GroupInput>(value)?.try_into()?))
            } else {
                Ok(Document::Charter(serde_yaml_ng::from_value::<CharterInput>(value)?.try_into()?))
            }
        }
    }
}

/// Read a document from a YAML or JSON file.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    let document = parse_document(&content, Format::from_path(path))?;
    tracing::debug!(path = %path.display(), "Loaded input document");
    Ok(document)
}

/// Parse a single-element XML fragment with the `cei` prefix predeclared.
pub fn parse_fragment(xml: &str) -> Result<Element> {
    let wrapped = format!("<fragment xmlns:{CEI_PREFIX}=\"{CEI_NS}\">{xml}</fragment>");
    let doc = XmlDocument::parse(&wrapped)?;
    let mut elements = element_children(doc.root_element());
    match (elements.next(), elements.next()) {
        (Some(node), None) => Ok(to_element(node)),
        _ => Err(CeiError::InvalidInput(format!(
            "expected exactly one XML element in '{xml}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a")), Format::Yaml);
    }

    #[test]
    fn test_parse_fragment_predeclares_cei() {
        let element = parse_fragment("<cei:issuer>Otto</cei:issuer>").unwrap();
        assert_eq!(element.name(), "issuer");
        assert_eq!(element.namespace(), Some(CEI_NS));
        assert_eq!(element.text(), Some("Otto"));
    }

    #[test]
    fn test_parse_fragment_needs_one_element() {
        assert!(matches!(parse_fragment("text"), Err(CeiError::InvalidInput(_))));
        assert!(matches!(
            parse_fragment("<cei:a/><cei:b/>"),
            Err(CeiError::InvalidInput(_))
        ));
        assert!(matches!(parse_fragment("<cei:a>"), Err(CeiError::XmlParse(_))));
    }

    #[test]
    fn test_minimal_charter() {
        let document = parse_document("id_text: '1'", Format::Yaml).unwrap();
        assert_eq!(document, Document::Charter(Charter::new("1").unwrap()));
    }

    #[test]
    fn test_charter_fields_from_yaml() {
        let yaml = r#"
id_text: "1307 II 22"
abstract: Agnes schenkt dem Kloster einen Hof.
issuers: Agnes
recipient:
  xml: <cei:recipient>Kloster</cei:recipient>
date_value: 13070222
comments: [first, second]
seals:
  material: Wachs
  legend:
    - place: Avers
      text: "+ S. AGNETIS"
"#;
        let Document::Charter(charter) = parse_document(yaml, Format::Yaml).unwrap() else {
            panic!("expected a charter");
        };

        assert_eq!(charter.id_text(), "1307 II 22");
        assert_eq!(charter.issuers(), &[TextOrElement::from("Agnes")]);
        assert!(charter.recipient().is_some_and(TextOrElement::is_element));
        assert!(matches!(charter.date_value(), Some(DateValue::Single(_))));
        assert_eq!(charter.comments(), &["first", "second"]);
        match charter.seals() {
            Some(Seals::Seal(seal)) => {
                assert_eq!(seal.material(), Some("Wachs"));
                assert!(matches!(seal.legend(), Some(Legend::Placed(l)) if l.len() == 1));
            }
            other => panic!("expected one seal, got {other:?}"),
        }
    }

    #[test]
    fn test_single_entry_lists() {
        let yaml = "id_text: '1'\nindex_places: [Zwettl]\nwitnesses:\n  - xml: <cei:persName>Otto</cei:persName>\n";
        let Document::Charter(charter) = parse_document(yaml, Format::Yaml).unwrap() else {
            panic!("expected a charter");
        };
        assert_eq!(charter.index_places(), &[TextOrElement::from("Zwettl")]);
        assert_eq!(charter.witnesses().len(), 1);
        assert!(charter.witnesses()[0].is_element());
    }

    #[test]
    fn test_date_pair_from_json() {
        let json = r#"{"id_text": "1", "date_value": ["13000101", "13001231"]}"#;
        let Document::Charter(charter) = parse_document(json, Format::Json).unwrap() else {
            panic!("expected a charter");
        };
        assert!(matches!(charter.date_value(), Some(DateValue::Range(_))));
    }

    #[test]
    fn test_seal_lists() {
        let texts: SealsInput = serde_yaml_ng::from_str("[a, b]").unwrap();
        assert_eq!(
            Seals::try_from(texts).unwrap(),
            Seals::Texts(vec!["a".to_string(), "b".to_string()])
        );

        let seals: SealsInput = serde_yaml_ng::from_str("[{material: Wachs}]").unwrap();
        assert!(matches!(Seals::try_from(seals).unwrap(), Seals::Seals(s) if s.len() == 1));

        let mixed: SealsInput = serde_yaml_ng::from_str("[a, {material: Wachs}]").unwrap();
        assert!(matches!(Seals::try_from(mixed), Err(CeiError::InvalidInput(_))));
    }

    #[test]
    fn test_group_document() {
        let yaml = "name: Urkunden\ncharters:\n  - id_text: '1'\n  - id_text: '2'\n";
        let Document::Group(group) = parse_document(yaml, Format::Yaml).unwrap() else {
            panic!("expected a group");
        };
        assert_eq!(group.name(), "Urkunden");
        assert_eq!(group.charters().len(), 2);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = parse_document("id_text: '1'\nissuer: Otto\n", Format::Yaml);
        assert!(matches!(result, Err(CeiError::Yaml(_))));
    }

    #[test]
    fn test_setter_errors_propagate() {
        let result = parse_document("id_text: ''", Format::Yaml);
        assert!(matches!(result, Err(CeiError::MissingId)));

        let yaml = "id_text: '1'\ndate:\n  xml: <cei:persName>x</cei:persName>\n";
        assert!(matches!(
            parse_document(yaml, Format::Yaml),
            Err(CeiError::WrongElement { .. })
        ));
    }

    #[test]
    fn test_unpadded_numeric_dates_are_rejected() {
        for value in ["-440315", "980105", "[13000101, 980105]"] {
            let yaml = format!("id_text: '1'\ndate_value: {value}\n");
            assert!(
                matches!(parse_document(&yaml, Format::Yaml), Err(CeiError::InvalidInput(_))),
                "{value} should be rejected"
            );
        }
        let json = r#"{"id_text": "1", "date_value": -440315}"#;
        assert!(matches!(
            parse_document(json, Format::Json),
            Err(CeiError::InvalidInput(_))
        ));

        let yaml = "id_text: '1'\ndate_value: '-0440315'\n";
        let Document::Charter(charter) = parse_document(yaml, Format::Yaml).unwrap() else {
            panic!("expected a charter");
        };
        assert!(matches!(charter.date_value(), Some(DateValue::Single(_))));
    }

    #[test]
    fn test_load_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charter.json");
        fs::write(&path, r#"{"id_text": "A 1"}"#).unwrap();
        let document = load_document(&path).unwrap();
        assert!(matches!(document, Document::Charter(c) if c.id_text() == "A 1"));
    }
}
