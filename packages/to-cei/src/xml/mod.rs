//! XML tree, parsing helpers and serialization.

mod element;
mod utils;
mod writer;

pub use element::{Attribute, Element, Node};
pub use utils::{element_children, to_element};
pub use writer::to_xml_string;
