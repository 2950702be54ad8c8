//! DOM node
//!
//! A node is an element, a text run, or a comment. Element attributes
//! are an ordered list; lookups are a linear scan, which beats a map
//! for the handful of attributes real elements carry.

use crate::{ElementCategory, NodeId};

/// A single node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// Parent node, if attached.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child list (comments included).
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        matches!(self.data, NodeData::Comment(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Element tag and attributes.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: Box<str>,
    category: ElementCategory,
    attrs: Vec<Attribute>,
}

/// A single attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: Box<str>,
    pub value: String,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            category: ElementCategory::from_tag(tag),
            attrs: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn category(&self) -> ElementCategory {
        self.category
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| &*a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        for attr in &mut self.attrs {
            if &*attr.name == name {
                attr.value = value;
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.into(),
            value,
        });
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|a| &*a.name == name)?;
        Some(self.attrs.remove(idx).value)
    }

    /// All attributes in document order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|a| (&*a.name, a.value.as_str()))
    }
}
