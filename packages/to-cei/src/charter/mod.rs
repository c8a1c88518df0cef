//! Charter entity.
//!
//! A [`Charter`] collects everything known about one charter. All setters
//! validate their input before changing anything, so a failed call leaves
//! the charter untouched. The XML tree is built in [`builder`].

mod builder;

use std::path::{Path, PathBuf};

use crate::assembler::XmlAssembler;
use crate::config::{charter_file_stem, normalize_id, validate_external_link};
use crate::date::{normalize, DateInput, DateValue};
use crate::error::{CeiError, Result};
use crate::fields::{
    allowed, check_element, non_empty, str_list, text_or_element, text_or_element_list,
    OneOrMany, TextOrElement,
};
use crate::seal::Seal;
use crate::xml::Element;

/// The seal description of a charter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seals {
    /// Free text, written directly into `cei:sealDesc`.
    Text(String),
    /// One `cei:seal` per text.
    Texts(Vec<String>),
    Seal(Seal),
    Seals(Vec<Seal>),
    /// A complete `cei:sealDesc` element.
    Element(Element),
}

impl From<&str> for Seals {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Seals {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<&str>> for Seals {
    fn from(value: Vec<&str>) -> Self {
        Self::Texts(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Seals {
    fn from(value: Vec<String>) -> Self {
        Self::Texts(value)
    }
}

impl From<Seal> for Seals {
    fn from(value: Seal) -> Self {
        Self::Seal(value)
    }
}

impl From<Vec<Seal>> for Seals {
    fn from(value: Vec<Seal>) -> Self {
        Self::Seals(value)
    }
}

impl From<Element> for Seals {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

/// Metadata of a single charter.
///
/// # Examples
/// ```
/// use to_cei::charter::Charter;
///
/// let mut charter = Charter::new("1307 II 22").unwrap();
/// charter
///     .set_abstract("Agnes schenkt dem Kloster einen Hof.")
///     .unwrap()
///     .set_issuers("Agnes")
///     .unwrap()
///     .set_date_value("13070222")
///     .unwrap();
/// assert_eq!(charter.id_norm(), "1307%20II%2022");
///
/// let xml = charter.to_xml();
/// assert_eq!(xml.find("body/chDesc/abstract/issuer").and_then(|e| e.text()), Some("Agnes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charter {
    id_text: String,
    id_norm: Option<String>,
    id_old: Option<String>,
    r#abstract: Option<TextOrElement>,
    abstract_sources: Vec<String>,
    archive: Option<String>,
    chancellary_remarks: Vec<String>,
    comments: Vec<String>,
    condition: Option<String>,
    date: Option<TextOrElement>,
    date_quote: Option<TextOrElement>,
    date_value: Option<DateValue>,
    dimensions: Option<String>,
    external_link: Option<String>,
    footnotes: Vec<String>,
    graphic_urls: Vec<String>,
    index: Vec<TextOrElement>,
    index_geo_features: Vec<TextOrElement>,
    index_organizations: Vec<TextOrElement>,
    index_persons: Vec<TextOrElement>,
    index_places: Vec<TextOrElement>,
    issued_place: Option<TextOrElement>,
    issuers: Vec<TextOrElement>,
    language: Option<String>,
    literature: Vec<String>,
    literature_abstracts: Vec<String>,
    literature_depictions: Vec<String>,
    literature_editions: Vec<String>,
    literature_secondary: Vec<String>,
    material: Option<String>,
    notarial_authentication: Option<TextOrElement>,
    recipient: Option<TextOrElement>,
    seals: Option<Seals>,
    tradition: Option<String>,
    transcription: Option<TextOrElement>,
    transcription_sources: Vec<String>,
    witnesses: Vec<TextOrElement>,
}

fn abstract_conflict(field: &str) -> CeiError {
    CeiError::ConflictingFields(format!(
        "XML element content for both {field} and abstract is not allowed, join the {field} into the XML abstract instead"
    ))
}

fn date_conflict() -> CeiError {
    CeiError::ConflictingFields(
        "a date value cannot be combined with a date given as XML element".to_string(),
    )
}

impl Charter {
    /// Create a charter; `id_text` is the human readable identifier.
    pub fn new(id_text: impl Into<String>) -> Result<Self> {
        let id_text = id_text.into();
        if id_text.is_empty() {
            return Err(CeiError::MissingId);
        }
        Ok(Self {
            id_text,
            id_norm: None,
            id_old: None,
            r#abstract: None,
            abstract_sources: Vec::new(),
            archive: None,
            chancellary_remarks: Vec::new(),
            comments: Vec::new(),
            condition: None,
            date: None,
            date_quote: None,
            date_value: None,
            dimensions: None,
            external_link: None,
            footnotes: Vec::new(),
            graphic_urls: Vec::new(),
            index: Vec::new(),
            index_geo_features: Vec::new(),
            index_organizations: Vec::new(),
            index_persons: Vec::new(),
            index_places: Vec::new(),
            issued_place: None,
            issuers: Vec::new(),
            language: None,
            literature: Vec::new(),
            literature_abstracts: Vec::new(),
            literature_depictions: Vec::new(),
            literature_editions: Vec::new(),
            literature_secondary: Vec::new(),
            material: None,
            notarial_authentication: None,
            recipient: None,
            seals: None,
            tradition: None,
            transcription: None,
            transcription_sources: Vec::new(),
            witnesses: Vec::new(),
        })
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    pub fn id_text(&self) -> &str {
        &self.id_text
    }

    pub fn set_id_text(&mut self, id_text: impl Into<String>) -> Result<&mut Self> {
        let id_text = id_text.into();
        if id_text.is_empty() {
            return Err(CeiError::MissingId);
        }
        self.id_text = id_text;
        Ok(self)
    }

    /// Percent-encoded identifier used for `idno/@id` and the file name.
    /// Falls back to `id_text` when no explicit value was set.
    pub fn id_norm(&self) -> String {
        normalize_id(self.id_norm.as_deref().unwrap_or(&self.id_text))
    }

    pub fn set_id_norm(&mut self, id_norm: impl Into<String>) -> &mut Self {
        self.id_norm = non_empty(Some(id_norm.into()));
        self
    }

    pub fn id_old(&self) -> Option<&str> {
        self.id_old.as_deref()
    }

    pub fn set_id_old(&mut self, id_old: impl Into<String>) -> &mut Self {
        self.id_old = non_empty(Some(id_old.into()));
        self
    }

    // ------------------------------------------------------------------
    // Abstract and parties
    // ------------------------------------------------------------------

    pub fn r#abstract(&self) -> Option<&TextOrElement> {
        self.r#abstract.as_ref()
    }

    /// Abstract as text or `cei:abstract` element. An element cannot be
    /// combined with issuers or a recipient.
    pub fn set_abstract(&mut self, value: impl Into<TextOrElement>) -> Result<&mut Self> {
        let value = text_or_element(Some(value.into()), allowed::ABSTRACT)?;
        if value.as_ref().is_some_and(TextOrElement::is_element) {
            if !self.issuers.is_empty() {
                return Err(abstract_conflict("issuer"));
            }
            if self.recipient.is_some() {
                return Err(abstract_conflict("recipient"));
            }
        }
        self.r#abstract = value;
        Ok(self)
    }

    fn has_abstract_element(&self) -> bool {
        self.r#abstract.as_ref().is_some_and(TextOrElement::is_element)
    }

    pub fn issuers(&self) -> &[TextOrElement] {
        &self.issuers
    }

    /// One or more issuers as text or `cei:issuer` elements.
    pub fn set_issuers(&mut self, value: impl Into<OneOrMany<TextOrElement>>) -> Result<&mut Self> {
        let issuers = text_or_element_list(value.into().into_vec(), allowed::ISSUER)?;
        if !issuers.is_empty() && self.has_abstract_element() {
            return Err(abstract_conflict("issuer"));
        }
        self.issuers = issuers;
        Ok(self)
    }

    pub fn recipient(&self) -> Option<&TextOrElement> {
        self.recipient.as_ref()
    }

    pub fn set_recipient(&mut self, value: impl Into<TextOrElement>) -> Result<&mut Self> {
        let recipient = text_or_element(Some(value.into()), allowed::RECIPIENT)?;
        if recipient.is_some() && self.has_abstract_element() {
            return Err(abstract_conflict("recipient"));
        }
        self.recipient = recipient;
        Ok(self)
    }

    pub fn witnesses(&self) -> &[TextOrElement] {
        &self.witnesses
    }

    pub fn set_witnesses<I, T>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TextOrElement>,
    {
        self.witnesses = collect_list(values, allowed::WITNESS)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Dates
    // ------------------------------------------------------------------

    pub fn date(&self) -> Option<&TextOrElement> {
        self.date.as_ref()
    }

    /// Date text, or a complete `cei:date`/`cei:dateRange` element. An
    /// element cannot be combined with a date value.
    pub fn set_date(&mut self, value: impl Into<TextOrElement>) -> Result<&mut Self> {
        let date = text_or_element(Some(value.into()), allowed::DATE)?;
        if date.as_ref().is_some_and(TextOrElement::is_element) && self.date_value.is_some() {
            return Err(date_conflict());
        }
        self.date = date;
        Ok(self)
    }

    pub fn date_value(&self) -> Option<&DateValue> {
        self.date_value.as_ref()
    }

    /// Normalized date from any supported input. See [`crate::date::normalize`].
    pub fn set_date_value(&mut self, value: impl Into<DateInput>) -> Result<&mut Self> {
        let input = value.into();
        if input != DateInput::Empty && self.date.as_ref().is_some_and(TextOrElement::is_element) {
            return Err(date_conflict());
        }
        self.date_value = normalize(input)?;
        Ok(self)
    }

    pub fn date_quote(&self) -> Option<&TextOrElement> {
        self.date_quote.as_ref()
    }

    pub fn set_date_quote(&mut self, value: impl Into<TextOrElement>) -> Result<&mut Self> {
        self.date_quote = text_or_element(Some(value.into()), allowed::DATE_QUOTE)?;
        Ok(self)
    }

    pub fn issued_place(&self) -> Option<&TextOrElement> {
        self.issued_place.as_ref()
    }

    pub fn set_issued_place(&mut self, value: impl Into<TextOrElement>) -> Result<&mut Self> {
        self.issued_place = text_or_element(Some(value.into()), allowed::ISSUED_PLACE)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Original witness
    // ------------------------------------------------------------------

    pub fn archive(&self) -> Option<&str> {
        self.archive.as_deref()
    }

    pub fn set_archive(&mut self, archive: impl Into<String>) -> &mut Self {
        self.archive = non_empty(Some(archive.into()));
        self
    }

    pub fn external_link(&self) -> Option<&str> {
        self.external_link.as_deref()
    }

    /// Link to the charter elsewhere on the web. An empty value clears it.
    pub fn set_external_link(&mut self, link: impl Into<String>) -> Result<&mut Self> {
        let link = non_empty(Some(link.into()));
        if let Some(link) = &link {
            validate_external_link(link)?;
        }
        self.external_link = link;
        Ok(self)
    }

    pub fn tradition(&self) -> Option<&str> {
        self.tradition.as_deref()
    }

    pub fn set_tradition(&mut self, tradition: impl Into<String>) -> &mut Self {
        self.tradition = non_empty(Some(tradition.into()));
        self
    }

    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    pub fn set_material(&mut self, material: impl Into<String>) -> &mut Self {
        self.material = non_empty(Some(material.into()));
        self
    }

    pub fn dimensions(&self) -> Option<&str> {
        self.dimensions.as_deref()
    }

    pub fn set_dimensions(&mut self, dimensions: impl Into<String>) -> &mut Self {
        self.dimensions = non_empty(Some(dimensions.into()));
        self
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn set_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.condition = non_empty(Some(condition.into()));
        self
    }

    pub fn notarial_authentication(&self) -> Option<&TextOrElement> {
        self.notarial_authentication.as_ref()
    }

    pub fn set_notarial_authentication(
        &mut self,
        value: impl Into<TextOrElement>,
    ) -> Result<&mut Self> {
        self.notarial_authentication =
            text_or_element(Some(value.into()), allowed::NOTARIAL_AUTHENTICATION)?;
        Ok(self)
    }

    pub fn seals(&self) -> Option<&Seals> {
        self.seals.as_ref()
    }

    /// Seal description. Empty text, an empty list and a `cei:sealDesc`
    /// element are accepted; other elements are rejected.
    pub fn set_seals(&mut self, value: impl Into<Seals>) -> Result<&mut Self> {
        let seals = match value.into() {
            Seals::Text(text) if text.is_empty() => None,
            Seals::Texts(texts) => {
                let texts = str_list(texts);
                (!texts.is_empty()).then_some(Seals::Texts(texts))
            }
            Seals::Seals(seals) if seals.is_empty() => None,
            Seals::Element(element) => {
                check_element(&element, allowed::SEAL_DESCRIPTION)?;
                Some(Seals::Element(element))
            }
            seals => Some(seals),
        };
        self.seals = seals;
        Ok(self)
    }

    pub fn chancellary_remarks(&self) -> &[String] {
        &self.chancellary_remarks
    }

    pub fn set_chancellary_remarks<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chancellary_remarks = str_list(values);
        self
    }

    pub fn graphic_urls(&self) -> &[String] {
        &self.graphic_urls
    }

    pub fn set_graphic_urls<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.graphic_urls = str_list(values);
        self
    }

    // ------------------------------------------------------------------
    // Diplomatic analysis
    // ------------------------------------------------------------------

    pub fn literature(&self) -> &[String] {
        &self.literature
    }

    pub fn set_literature<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literature = str_list(values);
        self
    }

    pub fn literature_editions(&self) -> &[String] {
        &self.literature_editions
    }

    pub fn set_literature_editions<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literature_editions = str_list(values);
        self
    }

    pub fn literature_abstracts(&self) -> &[String] {
        &self.literature_abstracts
    }

    pub fn set_literature_abstracts<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literature_abstracts = str_list(values);
        self
    }

    pub fn literature_depictions(&self) -> &[String] {
        &self.literature_depictions
    }

    pub fn set_literature_depictions<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literature_depictions = str_list(values);
        self
    }

    pub fn literature_secondary(&self) -> &[String] {
        &self.literature_secondary
    }

    pub fn set_literature_secondary<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literature_secondary = str_list(values);
        self
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn set_comments<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = str_list(values);
        self
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = non_empty(Some(language.into()));
        self
    }

    // ------------------------------------------------------------------
    // Sources, transcription and back matter
    // ------------------------------------------------------------------

    pub fn abstract_sources(&self) -> &[String] {
        &self.abstract_sources
    }

    pub fn set_abstract_sources<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abstract_sources = str_list(values);
        self
    }

    pub fn transcription_sources(&self) -> &[String] {
        &self.transcription_sources
    }

    pub fn set_transcription_sources<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transcription_sources = str_list(values);
        self
    }

    pub fn transcription(&self) -> Option<&TextOrElement> {
        self.transcription.as_ref()
    }

    pub fn set_transcription(&mut self, value: impl Into<TextOrElement>) -> Result<&mut Self> {
        self.transcription = text_or_element(Some(value.into()), allowed::TRANSCRIPTION)?;
        Ok(self)
    }

    pub fn footnotes(&self) -> &[String] {
        &self.footnotes
    }

    pub fn set_footnotes<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.footnotes = str_list(values);
        self
    }

    pub fn index(&self) -> &[TextOrElement] {
        &self.index
    }

    pub fn set_index<I, T>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TextOrElement>,
    {
        self.index = collect_list(values, allowed::INDEX)?;
        Ok(self)
    }

    pub fn index_geo_features(&self) -> &[TextOrElement] {
        &self.index_geo_features
    }

    pub fn set_index_geo_features<I, T>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TextOrElement>,
    {
        self.index_geo_features = collect_list(values, allowed::INDEX_GEO_FEATURE)?;
        Ok(self)
    }

    pub fn index_organizations(&self) -> &[TextOrElement] {
        &self.index_organizations
    }

    pub fn set_index_organizations<I, T>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TextOrElement>,
    {
        self.index_organizations = collect_list(values, allowed::INDEX_ORGANIZATION)?;
        Ok(self)
    }

    pub fn index_persons(&self) -> &[TextOrElement] {
        &self.index_persons
    }

    pub fn set_index_persons<I, T>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TextOrElement>,
    {
        self.index_persons = collect_list(values, allowed::INDEX_PERSON)?;
        Ok(self)
    }

    pub fn index_places(&self) -> &[TextOrElement] {
        &self.index_places
    }

    pub fn set_index_places<I, T>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TextOrElement>,
    {
        self.index_places = collect_list(values, allowed::INDEX_PLACE)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// The `cei:text` tree of this charter.
    pub fn to_xml(&self) -> Element {
        self.build(false)
    }

    /// Like [`Charter::to_xml`], with `xsi:schemaLocation` on the root.
    pub fn to_xml_with_schema_location(&self) -> Element {
        self.build(true)
    }

    /// Write `<folder>/<id_norm>.cei.xml`.
    pub fn to_file(&self, folder: Option<&Path>, schema_location: bool) -> Result<PathBuf> {
        self.write_xml(folder, &charter_file_stem(&self.id_norm()), schema_location)
    }
}

fn collect_list<I, T>(values: I, allowed: &'static [&'static str]) -> Result<Vec<TextOrElement>>
where
    I: IntoIterator<Item = T>,
    T: Into<TextOrElement>,
{
    text_or_element_list(values.into_iter().map(Into::into).collect(), allowed)
}

impl XmlAssembler for Charter {
    fn assemble(&self, schema_location: bool) -> Option<Element> {
        Some(self.build(schema_location))
    }
}
