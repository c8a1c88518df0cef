//! to-CEI - Build CEI (Charters Encoding Initiative) XML for medieval charters.
//!
//! This crate turns charter metadata into CEI documents: single charters as
//! `cei:text` trees and groups of charters as `cei:cei` documents. Dates
//! given as ISO strings, MOM-CA numeric dates or calendar values are
//! normalized on the way in.
//!
//! # Example
//!
//! ```
//! use to_cei::{Charter, XmlAssembler};
//!
//! let mut charter = Charter::new("1").unwrap();
//! charter.set_date_value("13000199").unwrap();
//!
//! let xml = charter.to_xml_string().unwrap();
//! assert!(xml.contains(r#"<cei:dateRange from="13000101" to="13000131">"#));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and identifier helpers
//! - [`error`]: Error types and Result alias
//! - [`date`]: Date normalization and `cei:date`/`cei:dateRange` encoding
//! - [`xml`]: Element tree, parsing and serialization
//! - [`fields`]: Text-or-element fields and tag whitelists
//! - [`seal`]: Seal descriptions
//! - [`charter`]: The charter entity and its tree builder
//! - [`group`]: Charter groups
//! - [`assembler`]: Shared serialization and file output
//! - [`input`]: YAML and JSON input documents
//! - [`http`], [`cache`]: Schema download and local cache
//! - [`validator`]: XSD validation against the CEI schema
//! - [`cli`]: Command-line interface

pub mod assembler;
pub mod cache;
pub mod charter;
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod fields;
pub mod group;
pub mod http;
pub mod input;
pub mod seal;
pub mod validator;
pub mod xml;

// Re-export commonly used items
pub use assembler::XmlAssembler;
pub use cache::{FileCache, ResourceCache};
pub use charter::{Charter, Seals};
pub use date::{normalize, CanonicalTime, DateInput, DatePart, DateValue, TimeRange};
pub use error::{CeiError, Result};
pub use fields::{OneOrMany, TextOrElement};
pub use group::CharterGroup;
pub use http::Fetcher;
pub use input::{load_document, Document};
pub use seal::{Legend, Seal};
pub use validator::{CeiValidator, Schema, SchemaValidator};
pub use xml::Element;
