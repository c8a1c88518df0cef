//! Validation of assembled trees against the CEI schema.
//!
//! [`CeiValidator`] fetches the XSD through a [`ResourceCache`], serializes
//! the tree and validates it with `xmloxide`: element order and
//! cardinality, attributes and simple types are all checked.

use xmloxide::validation::xsd::{parse_xsd, validate_xsd};
use xmloxide::Document;

use crate::cache::ResourceCache;
use crate::config::CEI_SCHEMA_URL;
use crate::error::{CeiError, Result};
use crate::xml::{to_xml_string, Element};

/// Schemas known to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Cei,
}

impl Schema {
    pub fn url(&self) -> &'static str {
        match self {
            Self::Cei => CEI_SCHEMA_URL,
        }
    }
}

/// Validates element trees against a schema.
pub trait SchemaValidator {
    /// Returns `Ok(())` if valid, or `Err(SchemaValidation)` with a list of errors.
    fn validate(&self, element: &Element, schema: Schema) -> Result<()>;

    fn validate_cei(&self, element: &Element) -> Result<()> {
        self.validate(element, Schema::Cei)
    }
}

/// XSD validator backed by a resource cache.
pub struct CeiValidator<C: ResourceCache> {
    cache: C,
    refresh: bool,
}

impl<C: ResourceCache> CeiValidator<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            refresh: false,
        }
    }

    /// Download the schema again instead of using a cached copy.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Problems found in `element`, empty if it is valid.
    pub fn errors(&self, element: &Element, schema: Schema) -> Result<Vec<String>> {
        let xsd = self.cache.get(schema.url(), self.refresh)?;
        let compiled =
            parse_xsd(&xsd).map_err(|e| CeiError::SchemaLoad(format!("{}: {e}", schema.url())))?;

        let xml = to_xml_string(element, true)?;
        let doc = match Document::parse_str(&xml) {
            Ok(doc) => doc,
            Err(e) => return Ok(vec![e.to_string()]),
        };

        let outcome = validate_xsd(&doc, &compiled);
        if outcome.is_valid {
            Ok(Vec::new())
        } else {
            Ok(outcome.errors.iter().map(ToString::to_string).collect())
        }
    }
}

impl<C: ResourceCache> SchemaValidator for CeiValidator<C> {
    fn validate(&self, element: &Element, schema: Schema) -> Result<()> {
        let errors = self.errors(element, schema)?;
        if errors.is_empty() {
            tracing::debug!(root = element.name(), "Document is valid");
            Ok(())
        } else {
            tracing::info!(root = element.name(), errors = errors.len(), "Document is invalid");
            Err(CeiError::SchemaValidation { errors })
        }
    }
}
