//! Conversion from parsed `roxmltree` nodes to owned elements.

use roxmltree::Node;

use super::element::Element;

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Copy a parsed element and its subtree into an owned [`Element`].
///
/// Text and CDATA are kept; comments and processing instructions are
/// dropped. Namespace declarations are not attributes and are regenerated
/// on serialization.
pub fn to_element(node: Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(tag.namespace(), tag.name());

    for attr in node.attributes() {
        element.set_ns_attr(attr.namespace(), attr.name(), attr.value());
    }

    // Line breaks plus whitespace around child elements are indentation
    let indented = node.children().any(|child| child.is_element())
        && node.children().filter(|child| child.is_text()).all(|child| {
            child
                .text()
                .is_some_and(|text| text.trim().is_empty() && text.contains('\n'))
        });

    for child in node.children() {
        if child.is_element() {
            element.push_child(to_element(child));
        } else if child.is_text() && !indented {
            if let Some(text) = child.text() {
                element.push_text(text);
            }
        }
    }

    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CEI_NS, XML_NS};
    use roxmltree::Document;

    #[test]
    fn test_element_children() {
        let xml = r#"<root>text<child1/>more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_to_element_keeps_namespaces_and_text() {
        let xml = format!(
            r#"<cei:abstract xmlns:cei="{CEI_NS}" xml:lang="de">Urkunde <!-- note --><cei:issuer>Agnes</cei:issuer></cei:abstract>"#
        );
        let doc = Document::parse(&xml).unwrap();
        let element = to_element(doc.root_element());

        assert!(element.is_cei());
        assert_eq!(element.ns_attr(Some(XML_NS), "lang"), Some("de"));
        assert_eq!(element.attributes().len(), 1);
        assert_eq!(element.text(), Some("Urkunde "));
        assert_eq!(element.nodes().len(), 2);
        assert_eq!(element.find("issuer").and_then(Element::text), Some("Agnes"));
    }

    #[test]
    fn test_to_element_drops_indentation() {
        let xml = format!("<cei:back xmlns:cei=\"{CEI_NS}\">\n  <cei:note>a</cei:note>\n  <cei:note> </cei:note>\n</cei:back>");
        let doc = Document::parse(&xml).unwrap();
        let element = to_element(doc.root_element());

        assert_eq!(element.nodes().len(), 2);
        assert!(!element.has_text());
        assert_eq!(element.find_all("note")[1].text(), Some(" "));
    }

    #[test]
    fn test_to_element_keeps_inline_spaces() {
        let xml = format!(
            r#"<cei:abstract xmlns:cei="{CEI_NS}"><cei:persName>Otto</cei:persName> <cei:persName>Agnes</cei:persName></cei:abstract>"#
        );
        let doc = Document::parse(&xml).unwrap();
        let element = to_element(doc.root_element());

        assert_eq!(element.nodes().len(), 3);
        assert_eq!(element.text_content(), "Otto Agnes");
    }
}
