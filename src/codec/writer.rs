//! Serializer walking the node tree in content order.

use super::{CodecOptions, CODEC_NAMESPACE, CODEC_PREFIX, MAX_NESTING_DEPTH, UNSET_ATTRIBUTE};
use crate::domain::{ConfigurationDocument, Content, Node, PrologItem};
use crate::errors::{MuleConfigError, Result};
use crate::schema::ROOT_ELEMENT;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

fn write_error<E: Display>(err: E) -> MuleConfigError {
    MuleConfigError::io(std::io::Error::other(err.to_string()), "Failed to write XML")
}

pub(super) fn write_document(document: &ConfigurationDocument, options: &CodecOptions) -> Result<String> {
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    } else {
        Writer::new(Vec::new())
    };

    let prolog = document.prolog();
    if options.emit_declaration {
        if let Some(declaration) = &prolog.declaration {
            let decl = BytesDecl::new(
                &declaration.version,
                declaration.encoding.as_deref(),
                declaration.standalone.as_deref(),
            );
            writer.write_event(Event::Decl(decl)).map_err(write_error)?;
        }
    }
    for item in &prolog.items {
        let event = match item {
            PrologItem::Doctype(doctype) => Event::DocType(BytesText::from_escaped(doctype.as_str())),
            PrologItem::Comment(comment) => Event::Comment(BytesText::from_escaped(comment.as_str())),
        };
        writer.write_event(event).map_err(write_error)?;
    }

    let declare_codec_namespace = has_unset(document.root());
    write_node(&mut writer, ROOT_ELEMENT, document.root(), declare_codec_namespace, 1)?;

    String::from_utf8(writer.into_inner()).map_err(write_error)
}

/// Whether any node in the tree carries explicitly unset attributes.
fn has_unset(root: &Node) -> bool {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if node.attributes().iter().any(|slot| slot.is_unset()) {
            return true;
        }
        pending.extend(node.child_slots().flat_map(|(_, children)| children.iter()));
    }
    false
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    element: &str,
    node: &Node,
    declare_codec_namespace: bool,
    depth: usize,
) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(MuleConfigError::NestingTooDeep { limit: MAX_NESTING_DEPTH });
    }
    let mut start = BytesStart::new(element);
    if declare_codec_namespace {
        start.push_attribute((format!("xmlns:{}", CODEC_PREFIX).as_str(), CODEC_NAMESPACE));
    }

    let mut unset = Vec::new();
    for slot in node.attributes() {
        if slot.is_unset() {
            unset.push(slot.name());
        } else if let Some(value) = slot.value() {
            start.push_attribute((slot.name(), value.to_literal().as_str()));
        }
    }
    for (name, value) in node.foreign_attributes() {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    if !unset.is_empty() {
        start.push_attribute((UNSET_ATTRIBUTE, unset.join(" ").as_str()));
    }

    let content = node.content();
    if content.is_empty() && node.text().is_none() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = node.text() {
        writer.write_event(Event::Text(BytesText::new(text))).map_err(write_error)?;
    }
    for item in content {
        match item {
            Content::Text(text) => writer.write_event(Event::Text(BytesText::new(text))).map_err(write_error)?,
            Content::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment))).map_err(write_error)?
            }
            Content::Child { role, node } => write_node(writer, role, node, false, depth + 1)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element))).map_err(write_error)
}
