//! Thin typed view over a `roxmltree` element.
//!
//! Readers in [`crate::parser`] only ever need "attribute as text/number" and
//! "children with tag X", so that is all this wrapper offers. Missing or
//! malformed numeric attributes come back as zero.

use roxmltree::Node;

use super::numeric::{float_from_str, uint_from_str};

#[derive(Clone, Copy, Debug)]
pub struct XmlNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input: 'a> XmlNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    pub fn tag(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// Attribute text, `""` when absent.
    pub fn attr(&self, name: &str) -> &'a str {
        self.node.attribute(name).unwrap_or_default()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attribute(name)
    }

    pub fn attr_uint(&self, name: &str) -> u32 {
        uint_from_str(self.attr(name), 0).unwrap_or(0)
    }

    pub fn attr_float(&self, name: &str) -> f64 {
        float_from_str(self.attr(name)).unwrap_or(0.0)
    }

    /// Concatenated text content directly under this element.
    pub fn text(&self) -> String {
        self.node
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect()
    }

    /// Child elements in document order.
    pub fn elements(self) -> impl Iterator<Item = XmlNode<'a, 'input>> + use<'a, 'input> {
        self.node.children().filter(|c| c.is_element()).map(XmlNode::new)
    }

    /// Child elements with the given tag name, in document order.
    pub fn children_named<'n>(
        self,
        tag: &'n str,
    ) -> impl Iterator<Item = XmlNode<'a, 'input>> + use<'a, 'input, 'n> {
        self.elements().filter(move |c| c.tag() == tag)
    }

    pub fn first_child(self, tag: &str) -> Option<XmlNode<'a, 'input>> {
        self.children_named(tag).next()
    }

    /// No child elements and only whitespace text.
    pub fn is_empty(&self) -> bool {
        self.elements().next().is_none() && self.text().trim().is_empty()
    }
}
