//! Named collections of charters, written as one `cei:cei` document.

use std::path::{Path, PathBuf};

use crate::assembler::{add_schema_location, XmlAssembler};
use crate::charter::Charter;
use crate::config::group_file_stem;
use crate::error::{CeiError, Result};
use crate::xml::Element;

/// A charter group (fonds or collection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharterGroup {
    name: String,
    charters: Vec<Charter>,
}

impl CharterGroup {
    pub fn new(name: impl Into<String>, charters: Vec<Charter>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CeiError::EmptyGroupName);
        }
        Ok(Self { name, charters })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CeiError::EmptyGroupName);
        }
        self.name = name;
        Ok(self)
    }

    pub fn charters(&self) -> &[Charter] {
        &self.charters
    }

    pub fn push(&mut self, charter: Charter) -> &mut Self {
        self.charters.push(charter);
        self
    }

    /// The `cei:cei` tree: a header with the group name as title, then all
    /// charters in order.
    pub fn to_xml(&self, schema_location: bool) -> Element {
        let title = Element::cei("title").with_text(self.name.as_str());
        let header = Element::cei("teiHeader").with_child(
            Element::cei("fileDesc").with_child(Element::cei("titleStmt").with_child(title)),
        );
        let group = Element::cei("group").with_children(self.charters.iter().map(Charter::to_xml));
        let root = Element::cei("cei")
            .with_child(header)
            .with_child(Element::cei("text").with_child(group));

        if schema_location {
            add_schema_location(root)
        } else {
            root
        }
    }

    /// Write `<folder>/<name>.cei.group.xml` with the name lower-cased and
    /// spaces replaced by underscores.
    pub fn to_file(&self, folder: Option<&Path>, schema_location: bool) -> Result<PathBuf> {
        self.write_xml(folder, &group_file_stem(&self.name), schema_location)
    }
}

impl XmlAssembler for CharterGroup {
    fn assemble(&self, schema_location: bool) -> Option<Element> {
        Some(self.to_xml(schema_location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn charters() -> Vec<Charter> {
        vec![Charter::new("1").unwrap(), Charter::new("2").unwrap()]
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            CharterGroup::new("", Vec::new()),
            Err(CeiError::EmptyGroupName)
        ));
        let mut group = CharterGroup::new("Urkunden", Vec::new()).unwrap();
        assert!(group.set_name("").is_err());
        assert_eq!(group.name(), "Urkunden");
    }

    #[test]
    fn test_group_tree() {
        let group = CharterGroup::new("Charter group", charters()).unwrap();
        let xml = group.to_xml(false);

        assert_eq!(xml.name(), "cei");
        assert_eq!(
            xml.find("teiHeader/fileDesc/titleStmt/title").and_then(Element::text),
            Some("Charter group")
        );
        let ids: Vec<_> = xml
            .find_all("text/group/text/body/idno")
            .into_iter()
            .filter_map(|idno| idno.attr("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_empty_group_keeps_group_element() {
        let group = CharterGroup::new("Leer", Vec::new()).unwrap();
        assert!(group.to_xml(false).find("text/group").is_some());
    }

    #[test]
    fn test_to_file() {
        let dir = tempdir().unwrap();
        let group = CharterGroup::new("Charter Group", charters()).unwrap();
        let path = group.to_file(Some(dir.path()), true).unwrap();

        assert_eq!(path, dir.path().join("charter_group.cei.group.xml"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("xsi:schemaLocation"));
        assert_eq!(content.matches("<cei:text type=\"charter\">").count(), 2);
    }
}
