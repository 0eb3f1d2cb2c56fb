//! Configuration node tree
//!
//! A [`Node`] is one element of a configuration document: its kind, a slot
//! for every declared attribute, namespaced foreign attributes carried
//! verbatim, child slots per declared role and, depending on the kind, simple
//! text or an ordered mixed-content list.
//!
//! Nodes own their children. Every structural edit goes through the methods
//! here so the mixed-content list always points at existing children.

use super::attribute::{AttributeSlot, AttributeValue};
use crate::errors::{MuleConfigError, Result};
use crate::schema::{ChildSpec, NodeKind, SchemaRegistry, ROOT_ELEMENT};
use serde::{Serialize, Serializer};
use std::fmt;

/// Position of a child inside its parent: role plus index within that role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildRef {
    pub role: &'static str,
    pub index: usize,
}

/// One entry of a mixed-content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixedItem {
    Text(String),
    Comment(String),
    Child(ChildRef),
}

/// Borrowed view of a node's content in document order.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    Text(&'a str),
    Comment(&'a str),
    Child { role: &'static str, node: &'a Node },
}

#[derive(Debug, Clone, PartialEq)]
struct ChildSlot {
    spec: ChildSpec,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    attributes: Vec<AttributeSlot>,
    foreign_attributes: Vec<(String, String)>,
    children: Vec<ChildSlot>,
    text: Option<String>,
    mixed: Option<Vec<MixedItem>>,
}

impl Node {
    /// Create an empty node with every attribute in the `Default` state.
    pub fn new(kind: NodeKind, registry: &SchemaRegistry) -> Self {
        let schema = registry.schema(kind);
        Self {
            kind,
            attributes: schema.attributes.iter().map(|spec| AttributeSlot::new(kind, spec)).collect(),
            foreign_attributes: Vec::new(),
            children: schema
                .children
                .iter()
                .map(|spec| ChildSlot { spec: *spec, nodes: Vec::new() })
                .collect(),
            text: None,
            mixed: schema.allows_mixed_content.then(Vec::new),
        }
    }

    /// Create an empty node typed by the standard registry.
    pub fn standard(kind: NodeKind) -> Self {
        Self::new(kind, SchemaRegistry::standard())
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSlot> {
        self.attributes.iter().find(|slot| slot.name() == name)
    }

    /// Mutable slot of a declared attribute.
    pub fn attribute_mut(&mut self, name: &str) -> Result<&mut AttributeSlot> {
        let kind = self.kind;
        self.attributes
            .iter_mut()
            .find(|slot| slot.name() == name)
            .ok_or_else(|| MuleConfigError::unknown_attribute(kind, name))
    }

    /// Effective value of an attribute.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attribute(name).and_then(AttributeSlot::effective)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(AttributeValue::as_bool)
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(AttributeValue::as_integer)
    }

    pub fn get_names(&self, name: &str) -> &[String] {
        self.get(name).and_then(AttributeValue::as_names).unwrap_or(&[])
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(AttributeSlot::is_set)
    }

    pub fn set(&mut self, name: &str, value: AttributeValue) -> Result<()> {
        self.attribute_mut(name)?.set(value)
    }

    pub fn set_literal(&mut self, name: &str, literal: &str) -> Result<()> {
        self.attribute_mut(name)?.set_literal(literal)
    }

    pub fn unset(&mut self, name: &str) -> Result<()> {
        self.attribute_mut(name)?.unset();
        Ok(())
    }

    /// Builder-style [`Node::set_literal`].
    pub fn with(mut self, name: &str, literal: &str) -> Result<Self> {
        self.set_literal(name, literal)?;
        Ok(self)
    }

    /// Namespaced attributes the schema does not type, in document order.
    pub fn foreign_attributes(&self) -> &[(String, String)] {
        &self.foreign_attributes
    }

    pub fn push_foreign_attribute<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.foreign_attributes.push((name.into(), value.into()));
    }

    pub fn remove_foreign_attribute(&mut self, name: &str) -> Option<String> {
        let position = self.foreign_attributes.iter().position(|(key, _)| key == name)?;
        Some(self.foreign_attributes.remove(position).1)
    }

    // ---------------------------------------------------------------------
    // Text and mixed content
    // ---------------------------------------------------------------------

    /// Simple text of a text-bearing kind.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text<S: Into<String>>(&mut self, text: Option<S>, registry: &SchemaRegistry) -> Result<()> {
        if !registry.schema(self.kind).has_text_content {
            return Err(MuleConfigError::disallowed_child(self.kind, "#text"));
        }
        self.text = text.map(Into::into);
        Ok(())
    }

    pub fn mixed(&self) -> Option<&[MixedItem]> {
        self.mixed.as_deref()
    }

    pub fn allows_mixed_content(&self) -> bool {
        self.mixed.is_some()
    }

    /// Append a text run to the mixed-content list. A run directly after
    /// another run extends it, since the two would read back as one.
    pub fn push_text<S: Into<String>>(&mut self, text: S) -> Result<()> {
        match self.mixed.as_mut() {
            Some(items) => {
                let text = text.into();
                match items.last_mut() {
                    Some(MixedItem::Text(run)) => run.push_str(&text),
                    _ => items.push(MixedItem::Text(text)),
                }
                Ok(())
            }
            None => Err(MuleConfigError::disallowed_child(self.kind, "#text")),
        }
    }

    /// Append a comment to the mixed-content list.
    pub fn push_comment<S: Into<String>>(&mut self, comment: S) -> Result<()> {
        match self.mixed.as_mut() {
            Some(items) => {
                items.push(MixedItem::Comment(comment.into()));
                Ok(())
            }
            None => Err(MuleConfigError::disallowed_child(self.kind, "#comment")),
        }
    }

    // ---------------------------------------------------------------------
    // Children
    // ---------------------------------------------------------------------

    fn slot(&self, role: &str) -> Option<&ChildSlot> {
        self.children.iter().find(|slot| slot.spec.role == role)
    }

    fn slot_mut(&mut self, role: &str) -> Result<&mut ChildSlot> {
        let kind = self.kind;
        self.children
            .iter_mut()
            .find(|slot| slot.spec.role == role)
            .ok_or_else(|| MuleConfigError::disallowed_child(kind, role))
    }

    /// Declared child roles, in schema order.
    pub fn child_specs(&self) -> impl Iterator<Item = &ChildSpec> {
        self.children.iter().map(|slot| &slot.spec)
    }

    /// Declared roles with their children, in schema order.
    pub fn child_slots(&self) -> impl Iterator<Item = (&ChildSpec, &[Node])> {
        self.children.iter().map(|slot| (&slot.spec, slot.nodes.as_slice()))
    }

    /// Append a child under `role`, returning a handle to the stored child.
    pub fn push_child(&mut self, role: &str, child: Node) -> Result<&mut Node> {
        let kind = self.kind;
        let slot = self.slot_mut(role)?;
        if child.kind != slot.spec.kind {
            return Err(MuleConfigError::disallowed_child(kind, role));
        }
        if !slot.spec.cardinality.allows_many() && !slot.nodes.is_empty() {
            return Err(MuleConfigError::cardinality_exceeded(kind, role));
        }

        let child_ref = ChildRef { role: slot.spec.role, index: slot.nodes.len() };
        slot.nodes.push(child);
        if let Some(items) = self.mixed.as_mut() {
            items.push(MixedItem::Child(child_ref));
        }

        let slot = self.slot_mut(role)?;
        let index = slot.nodes.len() - 1;
        Ok(&mut slot.nodes[index])
    }

    /// Replace the child of a single-valued role, keeping its position in the
    /// mixed-content list. Returns the previous child.
    pub fn set_child(&mut self, role: &str, child: Node) -> Result<Option<Node>> {
        let kind = self.kind;
        let slot = self.slot_mut(role)?;
        if slot.spec.cardinality.allows_many() {
            return Err(MuleConfigError::disallowed_child(kind, role));
        }
        if child.kind != slot.spec.kind {
            return Err(MuleConfigError::disallowed_child(kind, role));
        }
        match slot.nodes.first_mut() {
            Some(existing) => Ok(Some(std::mem::replace(existing, child))),
            None => {
                self.push_child(role, child)?;
                Ok(None)
            }
        }
    }

    /// Remove and return the child at `index` within `role`.
    pub fn remove_child(&mut self, role: &str, index: usize) -> Option<Node> {
        let slot = self.children.iter_mut().find(|slot| slot.spec.role == role)?;
        if index >= slot.nodes.len() {
            return None;
        }
        let removed = slot.nodes.remove(index);

        if let Some(items) = self.mixed.as_mut() {
            items.retain(|item| {
                !matches!(item, MixedItem::Child(child) if child.role == role && child.index == index)
            });
            for item in items.iter_mut() {
                if let MixedItem::Child(child) = item {
                    if child.role == role && child.index > index {
                        child.index -= 1;
                    }
                }
            }
        }
        Some(removed)
    }

    /// First child under `role`.
    pub fn child(&self, role: &str) -> Option<&Node> {
        self.slot(role).and_then(|slot| slot.nodes.first())
    }

    pub fn child_mut(&mut self, role: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|slot| slot.spec.role == role)
            .and_then(|slot| slot.nodes.first_mut())
    }

    /// All children under `role`, in document order. Undeclared roles have
    /// no children.
    pub fn children(&self, role: &str) -> &[Node] {
        self.slot(role).map(|slot| slot.nodes.as_slice()).unwrap_or(&[])
    }

    pub fn children_mut(&mut self, role: &str) -> &mut [Node] {
        match self.children.iter_mut().find(|slot| slot.spec.role == role) {
            Some(slot) => slot.nodes.as_mut_slice(),
            None => &mut [],
        }
    }

    pub fn child_at(&self, child: ChildRef) -> Option<&Node> {
        self.slot(child.role).and_then(|slot| slot.nodes.get(child.index))
    }

    pub fn has_children(&self) -> bool {
        self.children.iter().any(|slot| !slot.nodes.is_empty())
    }

    /// Content in document order. Mixed kinds follow their mixed-content
    /// list; other kinds list children role by role in schema order.
    pub fn content(&self) -> Vec<Content<'_>> {
        match &self.mixed {
            Some(items) => items
                .iter()
                .filter_map(|item| match item {
                    MixedItem::Text(text) => Some(Content::Text(text)),
                    MixedItem::Comment(comment) => Some(Content::Comment(comment)),
                    MixedItem::Child(child) => {
                        self.child_at(*child).map(|node| Content::Child { role: child.role, node })
                    }
                })
                .collect(),
            None => self
                .children
                .iter()
                .flat_map(|slot| {
                    slot.nodes.iter().map(move |node| Content::Child { role: slot.spec.role, node })
                })
                .collect(),
        }
    }
}

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PathSegment {
    role: String,
    index: Option<usize>,
}

/// Location of a node in a document, e.g.
/// `mule-configuration/model/mule-descriptor[1]/inbound-router/endpoint[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self { segments: vec![PathSegment { role: ROOT_ELEMENT.to_string(), index: None }] }
    }

    /// Path of a child. `index` is rendered for multi-valued roles only.
    pub fn child(&self, role: &str, index: Option<usize>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment { role: role.to_string(), index });
        Self { segments }
    }

    /// Path of the child of `parent` stored under `spec` at `index`.
    pub fn for_child(&self, spec: &ChildSpec, index: usize) -> Self {
        self.child(spec.role, spec.cardinality.allows_many().then_some(index))
    }

    /// Element name of the last step.
    pub fn element(&self) -> &str {
        self.segments.last().map(|segment| segment.role.as_str()).unwrap_or(ROOT_ELEMENT)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment.role)?;
            if let Some(index) = segment.index {
                write!(f, "[{}]", index)?;
            }
        }
        Ok(())
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
