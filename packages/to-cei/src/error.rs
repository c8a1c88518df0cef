//! Error types for to-CEI.
//!
//! All user input problems are reported synchronously through `CeiError`;
//! nothing is logged or swallowed inside the document model.

use thiserror::Error;

/// Main error type for the to-CEI library.
#[derive(Debug, Error)]
pub enum CeiError {
    /// A charter was created without a human readable identifier.
    #[error("id_text is not allowed to be empty")]
    MissingId,

    /// A charter group was created without a name.
    #[error("Group name cannot be empty")]
    EmptyGroupName,

    /// A date string could not be parsed as ISO or MOM date, or names a day
    /// that does not exist.
    #[error("Invalid date value: '{0}'")]
    InvalidDate(String),

    /// The two sides of a date pair are of different kinds.
    #[error("Date pair needs two values of the same kind, got {first} and {second}")]
    MismatchedDatePair {
        first: &'static str,
        second: &'static str,
    },

    /// One side of a date pair expands to a range itself.
    #[error("Date pair element '{0}' describes a range; both sides of a pair need to be single dates")]
    NestedDateRange(String),

    /// The start of a date range lies after its end.
    #[error("Date range starts at {from} which is after its end {to}")]
    InvertedDateRange { from: String, to: String },

    /// Two fields were set to a combination that cannot be serialized.
    #[error("Conflicting fields: {0}")]
    ConflictingFields(String),

    /// A caller supplied element is not in the CEI namespace.
    #[error("Provided element needs to be in the CEI namespace but instead is in '{found}'")]
    WrongNamespace { found: String },

    /// A caller supplied element has a tag that is not allowed for its field.
    #[error("Provided element needs to be one of '{}', but instead is '{found}'", .expected.join(", "))]
    WrongElement {
        expected: Vec<&'static str>,
        found: String,
    },

    /// The external link does not look like an http(s) URL.
    #[error("'{0}' does not look like a valid external URL")]
    InvalidExternalLink(String),

    /// An assembler produced no XML where a document was required.
    #[error("Nothing to write: the XML representation is empty")]
    EmptyDocument,

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// XML serialization failed.
    #[error("XML serialization failed: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts exhausted.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// YAML input could not be read.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON input could not be read.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The schema resource could not be loaded or understood.
    #[error("Schema load error: {0}")]
    SchemaLoad(String),

    /// A document did not conform to the schema.
    #[error("Schema validation failed: {}", errors.join("; "))]
    SchemaValidation { errors: Vec<String> },

    /// An input document is well-formed but cannot be turned into charters.
    #[error("Invalid input document: {0}")]
    InvalidInput(String),

    /// Missing or unusable configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for to-CEI operations.
pub type Result<T> = std::result::Result<T, CeiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_element_lists_allowed_tags() {
        let err = CeiError::WrongElement {
            expected: vec!["date", "dateRange"],
            found: "persName".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Provided element needs to be one of 'date, dateRange', but instead is 'persName'"
        );
    }

    #[test]
    fn test_schema_validation_joins_errors() {
        let err = CeiError::SchemaValidation {
            errors: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "Schema validation failed: first; second");
    }

    #[test]
    fn test_mismatched_pair_display() {
        let err = CeiError::MismatchedDatePair {
            first: "text",
            second: "calendar",
        };
        assert!(err.to_string().contains("text and calendar"));
    }
}
