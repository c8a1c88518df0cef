//! Pretty XML serialization of element trees.

use std::io::{Cursor, Write};

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::element::{Element, Node};
use crate::config::{CEI_NS, CEI_PREFIX, XML_NS, XSI_NS, XSI_PREFIX};
use crate::error::{CeiError, Result};

const INDENT: &str = "  ";

/// Namespace URI to prefix bindings, in order of first use.
type Bindings = Vec<(String, String)>;

/// Serialize an element tree.
///
/// All namespaces used in the tree are declared on the root element; the
/// CEI namespace is bound to `cei` and the schema instance namespace to
/// `xsi`. Element-only content is indented by two spaces, mixed content is
/// written as is. The output ends with a newline.
///
/// # Examples
/// ```
/// use to_cei::xml::{to_xml_string, Element};
///
/// let xml = to_xml_string(&Element::cei("date").with_text("1307"), false).unwrap();
/// assert_eq!(
///     xml,
///     "<cei:date xmlns:cei=\"http://www.monasterium.net/NS/cei\">1307</cei:date>\n"
/// );
/// ```
pub fn to_xml_string(element: &Element, declaration: bool) -> Result<String> {
    let bindings = collect_namespaces(element);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    if declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    }
    write_element(&mut writer, element, &bindings, true, 0, false)?;
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map_err(|e| CeiError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn collect_namespaces(root: &Element) -> Bindings {
    let mut bindings: Bindings = Vec::new();
    let mut generated = 0;

    for element in root.descendants() {
        let used = element
            .namespace()
            .into_iter()
            .chain(element.attributes().iter().filter_map(|a| a.namespace.as_deref()));
        for namespace in used {
            if namespace == XML_NS || bindings.iter().any(|(uri, _)| uri == namespace) {
                continue;
            }
            let prefix = match namespace {
                CEI_NS => CEI_PREFIX.to_string(),
                XSI_NS => XSI_PREFIX.to_string(),
                _ => {
                    generated += 1;
                    format!("ns{generated}")
                }
            };
            bindings.push((namespace.to_string(), prefix));
        }
    }

    bindings
}

fn qualified_name(namespace: Option<&str>, name: &str, bindings: &Bindings) -> String {
    match namespace {
        Some(XML_NS) => format!("xml:{name}"),
        Some(uri) => bindings
            .iter()
            .find(|(bound, _)| bound == uri)
            .map(|(_, prefix)| format!("{prefix}:{name}"))
            .unwrap_or_else(|| name.to_string()),
        None => name.to_string(),
    }
}

fn write_indent<W: Write>(writer: &mut Writer<W>, depth: usize) -> Result<()> {
    let whitespace = format!("\n{}", INDENT.repeat(depth));
    writer.write_event(Event::Text(BytesText::from_escaped(whitespace)))?;
    Ok(())
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    bindings: &Bindings,
    declare: bool,
    depth: usize,
    inline: bool,
) -> Result<()> {
    let name = qualified_name(element.namespace(), element.name(), bindings);
    let mut start = BytesStart::new(name.as_str());

    if declare {
        for (uri, prefix) in bindings {
            start.push_attribute((format!("xmlns:{prefix}").as_str(), uri.as_str()));
        }
    }
    for attr in element.attributes() {
        let key = qualified_name(attr.namespace.as_deref(), &attr.name, bindings);
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    if element.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;

    // Once text shows up, whitespace becomes content; keep the subtree as is
    let inline = inline || element.has_text();
    for node in element.nodes() {
        match node {
            Node::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                    text.as_str(),
                ))))?;
            }
            Node::Element(child) => {
                if !inline {
                    write_indent(writer, depth + 1)?;
                }
                write_element(writer, child, bindings, false, depth + 1, inline)?;
            }
        }
    }
    if !inline {
        write_indent(writer, depth)?;
    }

    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_elements_are_indented() {
        let root = Element::cei("text")
            .with_attr("type", "charter")
            .with_child(Element::cei("front"))
            .with_child(
                Element::cei("body").with_child(Element::cei("idno").with_attr("id", "1").with_text("1")),
            );

        let expected = concat!(
            "<cei:text xmlns:cei=\"http://www.monasterium.net/NS/cei\" type=\"charter\">\n",
            "  <cei:front/>\n",
            "  <cei:body>\n",
            "    <cei:idno id=\"1\">1</cei:idno>\n",
            "  </cei:body>\n",
            "</cei:text>\n"
        );
        assert_eq!(to_xml_string(&root, false).unwrap(), expected);
    }

    #[test]
    fn test_mixed_content_is_inline() {
        let root = Element::cei("chDesc").with_child(
            Element::cei("abstract")
                .with_text("Charter of ")
                .with_child(Element::cei("issuer").with_text("Agnes")),
        );

        let expected = concat!(
            "<cei:chDesc xmlns:cei=\"http://www.monasterium.net/NS/cei\">\n",
            "  <cei:abstract>Charter of <cei:issuer>Agnes</cei:issuer></cei:abstract>\n",
            "</cei:chDesc>\n"
        );
        assert_eq!(to_xml_string(&root, false).unwrap(), expected);
    }

    #[test]
    fn test_declaration_and_xsi() {
        let root = Element::cei("text").with_ns_attr(XSI_NS, "schemaLocation", "a b");
        let xml = to_xml_string(&root, true).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<cei:text"));
        assert!(xml.contains("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""));
        assert!(xml.contains("xsi:schemaLocation=\"a b\""));
    }

    #[test]
    fn test_xsi_not_declared_when_unused() {
        let xml = to_xml_string(&Element::cei("text"), false).unwrap();
        assert!(!xml.contains("xmlns:xsi"));
    }

    #[test]
    fn test_escaping() {
        let root = Element::cei("p").with_attr("n", "a\"b").with_text("R&D <x>");
        let xml = to_xml_string(&root, false).unwrap();

        assert!(xml.contains("R&amp;D &lt;x&gt;"));
        assert!(xml.contains("n=\"a&quot;b\""));
    }

    #[test]
    fn test_foreign_and_xml_namespaces() {
        let root = Element::cei("text")
            .with_ns_attr(XML_NS, "lang", "la")
            .with_child(Element::new(Some("urn:example"), "note"))
            .with_child(Element::new(None, "plain"));
        let xml = to_xml_string(&root, false).unwrap();

        assert!(xml.contains("xml:lang=\"la\""));
        assert!(!xml.contains("xmlns:xml"));
        assert!(xml.contains("xmlns:ns1=\"urn:example\""));
        assert!(xml.contains("<ns1:note/>"));
        assert!(xml.contains("<plain/>"));
    }

    #[test]
    fn test_round_trip_through_parser() {
        let root = Element::cei("back")
            .with_child(Element::cei("persName").with_attr("type", "Zeuge").with_text("Otto"));
        let xml = to_xml_string(&root, true).unwrap();
        let parsed = Element::parse(&xml).unwrap();

        assert_eq!(
            parsed.find("persName").and_then(|p| p.attr("type")),
            Some("Zeuge")
        );
        assert_eq!(parsed.find("persName").and_then(Element::text), Some("Otto"));
    }
}
