//! Shared serialization for everything that builds a CEI tree.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{CEI_NS, XSI_NS};
use crate::error::{CeiError, Result};
use crate::xml::{to_xml_string, Element};

/// Add `xsi:schemaLocation` pointing the CEI namespace at itself.
pub fn add_schema_location(element: Element) -> Element {
    element.with_ns_attr(XSI_NS, "schemaLocation", format!("{CEI_NS} {CEI_NS}"))
}

/// A type that assembles itself into a CEI element tree.
pub trait XmlAssembler {
    /// Build the tree. `schema_location` adds `xsi:schemaLocation` to the
    /// root where the type supports it. `None` means there is nothing to
    /// write.
    fn assemble(&self, schema_location: bool) -> Option<Element>;

    /// Pretty printed XML without declaration; empty if there is no tree.
    fn to_xml_string(&self) -> Result<String> {
        match self.assemble(false) {
            Some(element) => to_xml_string(&element, false),
            None => Ok(String::new()),
        }
    }

    /// Write `<folder>/<stem>.xml` with an XML declaration.
    ///
    /// Without a folder the file is written to the working directory. Uses
    /// atomic write pattern: writes to temp file, syncs to disk, then renames.
    fn write_xml(&self, folder: Option<&Path>, stem: &str, schema_location: bool) -> Result<PathBuf> {
        let element = self.assemble(schema_location).ok_or(CeiError::EmptyDocument)?;
        let content = to_xml_string(&element, true)?;

        let folder = folder.unwrap_or(Path::new("."));
        fs::create_dir_all(folder)?;

        let output_file = folder.join(format!("{stem}.xml"));
        let temp_file = folder.join(format!(".{stem}.xml.tmp"));

        {
            let mut file = File::create(&temp_file)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if output_file.exists() {
            fs::remove_file(&output_file)?;
        }

        fs::rename(&temp_file, &output_file)?;
        tracing::info!(path = %output_file.display(), "Wrote CEI document");

        Ok(output_file)
    }
}
