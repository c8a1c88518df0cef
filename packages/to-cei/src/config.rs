//! Configuration constants and validation functions.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{CeiError, Result};

/// The CEI namespace URI.
pub const CEI_NS: &str = "http://www.monasterium.net/NS/cei";

/// Prefix bound to [`CEI_NS`] in serialized documents.
pub const CEI_PREFIX: &str = "cei";

/// XML Schema instance namespace, used for `xsi:schemaLocation`.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Prefix bound to [`XSI_NS`].
pub const XSI_PREFIX: &str = "xsi";

/// The reserved `xml` namespace; never declared.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Location of the CEI schema.
pub const CEI_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/icaruseu/mom-ca/master/my/XRX/src/mom/app/cei/xsd/cei.xsd";

/// Text used for a charter date when nothing is known about it.
pub const NO_DATE_TEXT: &str = "No date";

/// MOM date value for an unknown date.
pub const NO_DATE_VALUE: &str = "99999999";

/// `type` attribute given to witnesses in the back matter.
pub const WITNESS_TYPE: &str = "Zeuge";

/// Suffix of single charter files, before `.xml`.
pub const CHARTER_FILE_SUFFIX: &str = ".cei";

/// Suffix of charter group files, before `.xml`.
pub const GROUP_FILE_SUFFIX: &str = ".cei.group";

/// HTTP timeout in seconds for schema downloads.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Directory name below the user cache directory.
pub const CACHE_DIR_NAME: &str = "to-cei";

/// Minimal sanity check for external links: scheme, something, a dot, something.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EXTERNAL_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+\..+$").expect("valid regex"));

/// Validate the shape of an external link.
///
/// This is deliberately permissive and not a full URL validation; it only
/// rejects values that are clearly not web links, like `http://localhost`.
///
/// # Examples
/// ```
/// use to_cei::config::validate_external_link;
///
/// assert!(validate_external_link("https://example.com/charters/1").is_ok());
/// assert!(validate_external_link("http://localhost").is_err());
/// ```
pub fn validate_external_link(link: &str) -> Result<()> {
    if EXTERNAL_LINK_PATTERN.is_match(link) {
        Ok(())
    } else {
        Err(CeiError::InvalidExternalLink(link.to_string()))
    }
}

/// Normalize a charter identifier for use as `idno/@id` and file name.
///
/// The value is brought into Unicode NFC form and percent-encoded so only
/// unreserved ASCII characters remain. Slashes are encoded too (`A/1`
/// becomes `A%2F1`), so ids containing `/` differ from ones that keep the
/// slash literal. Pass an explicit `id_norm` to keep an existing id.
///
/// # Examples
/// ```
/// use to_cei::config::normalize_id;
///
/// assert_eq!(normalize_id("1307 II 22"), "1307%20II%2022");
/// assert_eq!(normalize_id("1307_Ⅱ_22"), "1307_%E2%85%A1_22");
/// assert_eq!(normalize_id("A/1"), "A%2F1");
/// ```
pub fn normalize_id(id: &str) -> String {
    let composed: String = id.nfc().collect();
    urlencoding::encode(&composed).into_owned()
}

/// File stem for a charter group: lower-cased name with spaces replaced by
/// underscores, plus the group suffix.
///
/// # Examples
/// ```
/// use to_cei::config::group_file_stem;
///
/// assert_eq!(group_file_stem("Charter group"), "charter_group.cei.group");
/// ```
pub fn group_file_stem(name: &str) -> String {
    format!("{}{GROUP_FILE_SUFFIX}", name.to_lowercase().replace(' ', "_"))
}

/// File stem for a single charter.
pub fn charter_file_stem(id_norm: &str) -> String {
    format!("{id_norm}{CHARTER_FILE_SUFFIX}")
}

/// Default location of the schema cache.
///
/// Uses `$XDG_CACHE_HOME/to-cei` when set and `$HOME/.cache/to-cei` otherwise.
pub fn default_cache_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CACHE_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir).join(CACHE_DIR_NAME));
    }
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(|home| PathBuf::from(home).join(".cache").join(CACHE_DIR_NAME))
        .ok_or_else(|| {
            CeiError::Config("neither XDG_CACHE_HOME nor HOME is set; pass a cache directory".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_external_link_valid() {
        assert!(validate_external_link("https://example.com/charters/1").is_ok());
        assert!(validate_external_link("http://www.monasterium.net").is_ok());
    }

    #[test]
    fn test_validate_external_link_invalid() {
        assert!(validate_external_link("http://localhost").is_err());
        assert!(validate_external_link("ftp://example.com").is_err());
        assert!(validate_external_link("example.com").is_err());
        assert!(validate_external_link("").is_err());
    }

    #[test]
    fn test_normalize_id_reserved_characters() {
        assert_eq!(
            normalize_id("~!1307 II 22|23.Ⅱ"),
            "~%211307%20II%2022%7C23.%E2%85%A1"
        );
    }

    #[test]
    fn test_normalize_id_composes_unicode() {
        // "e" followed by a combining acute accent becomes a single "é"
        assert_eq!(normalize_id("e\u{301}"), normalize_id("\u{e9}"));
        assert_eq!(normalize_id("\u{e9}"), "%C3%A9");
    }

    #[test]
    fn test_normalize_id_plain() {
        assert_eq!(normalize_id("1A"), "1A");
    }

    #[test]
    fn test_group_file_stem() {
        assert_eq!(group_file_stem("Charter group"), "charter_group.cei.group");
        assert_eq!(group_file_stem("Schotten OSB"), "schotten_osb.cei.group");
    }

    #[test]
    fn test_charter_file_stem() {
        assert_eq!(charter_file_stem("1A"), "1A.cei");
    }
}
