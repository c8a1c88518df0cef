//! Owned, namespace-aware XML element tree.

use crate::config::CEI_NS;
use crate::error::Result;

use super::utils::to_element;

/// An attribute with an optional namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

/// Content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element that owns its attributes and children.
///
/// Elements are built bottom-up with the `with_*` methods:
///
/// ```
/// use to_cei::xml::Element;
///
/// let idno = Element::cei("idno").with_attr("id", "1").with_text("1");
/// let body = Element::cei("body").with_child(idno);
/// assert_eq!(body.find("idno").and_then(|e| e.attr("id")), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An empty element in the CEI namespace.
    pub fn cei(name: &str) -> Self {
        Self::new(Some(CEI_NS), name)
    }

    /// A CEI element holding `children`, or `None` if there are none.
    pub fn cei_composite<I>(name: &str, children: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<Element>>,
    {
        let children: Vec<Element> = children.into_iter().flatten().collect();
        if children.is_empty() {
            None
        } else {
            Some(Self::cei(name).with_children(children))
        }
    }

    /// Parse an XML document or fragment into an owned tree.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        Ok(to_element(doc.root_element()))
    }

    /// Append a text node. Empty text is ignored.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_ns_attr(mut self, namespace: &str, name: &str, value: impl Into<String>) -> Self {
        self.set_ns_attr(Some(namespace), name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append all elements; also accepts an `Option<Element>`.
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Node::Text(last)) => last.push_str(&text),
            _ => self.children.push(Node::Text(text)),
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Set an attribute without namespace, replacing an existing value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.set_ns_attr(None, name, value);
    }

    pub fn set_ns_attr(&mut self, namespace: Option<&str>, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name == name && a.namespace.as_deref() == namespace)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                namespace: namespace.map(str::to_string),
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Local name without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is_cei(&self) -> bool {
        self.namespace() == Some(CEI_NS)
    }

    /// Value of an attribute without namespace.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.ns_attr(None, name)
    }

    pub fn ns_attr(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref() == namespace)
            .map(|a| a.value.as_str())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Text before the first child element, if any.
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// All descendant text concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// True if the element has neither children nor text.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True if any direct child is a text node.
    pub fn has_text(&self) -> bool {
        self.children.iter().any(|n| matches!(n, Node::Text(_)))
    }

    /// First element reached by a slash separated path of local names.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/').try_fold(self, |current, part| {
            current.elements().find(|e| e.name == part)
        })
    }

    /// All elements reached by a slash separated path of local names.
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        path.split('/').fold(vec![self], |current, part| {
            current
                .into_iter()
                .flat_map(|e| e.elements().filter(move |c| c.name == part))
                .collect()
        })
    }

    /// This element and all descendant elements in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in self.elements() {
            out.extend(child.descendants());
        }
        out
    }
}
