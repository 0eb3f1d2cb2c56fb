//! Event-driven reader building the node tree.

use super::{CodecOptions, CODEC_PREFIX, MAX_NESTING_DEPTH, UNSET_ATTRIBUTE};
use crate::domain::{AttributeValue, ConfigurationDocument, Node, Prolog, PrologItem, XmlDeclaration};
use crate::errors::{MuleConfigError, Result, SourceLocation};
use crate::schema::{NodeKind, SchemaRegistry, ROOT_ELEMENT};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::trace;

/// An element being read, with the role it will be attached under.
struct Frame {
    role: String,
    node: Node,
    /// Text and CDATA read since the last child, comment or start tag.
    pending: String,
}

struct DocumentReader<'a, 'r> {
    text: &'a str,
    registry: &'r SchemaRegistry,
    options: &'a CodecOptions,
    prolog: Prolog,
    stack: Vec<Frame>,
    root: Option<Node>,
    /// Offset of the event being handled.
    position: u64,
}

pub(super) fn read_document(
    text: &str,
    registry: &SchemaRegistry,
    options: &CodecOptions,
) -> Result<ConfigurationDocument> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut state = DocumentReader {
        text,
        registry,
        options,
        prolog: Prolog::default(),
        stack: Vec::new(),
        root: None,
        position: 0,
    };

    loop {
        state.position = reader.buffer_position() as u64;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                let location = SourceLocation::from_offset(text, reader.error_position() as u64);
                return Err(MuleConfigError::malformed(location, err.to_string()));
            }
        };

        match event {
            Event::Decl(decl) => state.declaration(&decl)?,
            Event::DocType(doctype) => {
                let body = state.utf8(&doctype)?.trim().to_string();
                state.prolog_item(PrologItem::Doctype(body))?;
            }
            Event::PI(_) => {}
            Event::Start(start) => state.open(&start)?,
            Event::Empty(start) => {
                state.open(&start)?;
                state.close()?;
            }
            Event::End(_) => state.close()?,
            Event::Text(run) => {
                let unescaped = run.unescape().map_err(|err| state.error(err.to_string()))?;
                state.text(unescaped)?;
            }
            Event::CData(cdata) => {
                let content = state.utf8(&cdata)?.to_string();
                state.text(Cow::Owned(content))?;
            }
            Event::Comment(comment) => {
                let content = state.utf8(&comment)?.to_string();
                state.comment(content)?;
            }
            Event::Eof => break,
        }
    }

    if let Some(open) = state.stack.last() {
        let message = format!("unexpected end of document inside <{}>", open.role);
        return Err(state.error(message));
    }
    let root = state.root.ok_or_else(|| {
        MuleConfigError::malformed(
            SourceLocation::from_offset(text, text.len() as u64),
            format!("document has no <{}> element", ROOT_ELEMENT),
        )
    })?;
    Ok(ConfigurationDocument::from_parts(state.prolog, root))
}

/// Optional declaration field as text; unreadable values are dropped.
fn lossy<E>(value: Option<std::result::Result<Cow<'_, [u8]>, E>>) -> Option<String> {
    value.and_then(|value| value.ok()).map(|value| String::from_utf8_lossy(&value).into_owned())
}

impl<'a, 'r> DocumentReader<'a, 'r> {
    fn error<S: Into<String>>(&self, message: S) -> MuleConfigError {
        MuleConfigError::malformed(SourceLocation::from_offset(self.text, self.position), message)
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> Result<&'b str> {
        std::str::from_utf8(bytes).map_err(|err| self.error(err.to_string()))
    }

    fn in_prolog(&self) -> bool {
        self.root.is_none() && self.stack.is_empty()
    }

    fn declaration(&mut self, decl: &BytesDecl<'_>) -> Result<()> {
        let version = decl.version().map_err(|err| self.error(err.to_string()))?;
        self.prolog.declaration = Some(XmlDeclaration {
            version: String::from_utf8_lossy(&version).into_owned(),
            encoding: lossy(decl.encoding()),
            standalone: lossy(decl.standalone()),
        });
        Ok(())
    }

    fn prolog_item(&mut self, item: PrologItem) -> Result<()> {
        if !self.in_prolog() {
            return Err(self.error("DOCTYPE must precede the root element"));
        }
        self.prolog.items.push(item);
        Ok(())
    }

    /// Start an element: resolve its role against the parent and apply its
    /// attributes.
    fn open(&mut self, start: &BytesStart<'_>) -> Result<()> {
        self.flush_text()?;
        let element = self.utf8(start.name().into_inner())?.to_string();
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "<{}> is nested deeper than {} elements",
                element, MAX_NESTING_DEPTH
            )));
        }

        let kind = match self.stack.last() {
            Some(parent) => {
                let parent_kind = parent.node.kind();
                match self.registry.child(parent_kind, &element) {
                    Some(spec) => spec.kind,
                    None => {
                        let unknown = MuleConfigError::unknown_element(parent.role.as_str(), element.as_str());
                        return Err(self.error(unknown.to_string()));
                    }
                }
            }
            None if self.root.is_some() => return Err(self.error("content after the root element")),
            None if element == ROOT_ELEMENT => NodeKind::MuleConfiguration,
            None => {
                return Err(self.error(format!("expected <{}> root element, found <{}>", ROOT_ELEMENT, element)))
            }
        };

        let mut node = Node::new(kind, self.registry);
        let is_root = self.stack.is_empty();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| self.error(err.to_string()))?;
            let name = self.utf8(attribute.key.as_ref())?.to_string();
            let value = attribute.unescape_value().map_err(|err| self.error(err.to_string()))?;
            self.apply_attribute(&mut node, &name, &value, is_root)?;
        }

        trace!(element = %element, kind = %kind, "Opened element");
        self.stack.push(Frame { role: element, node, pending: String::new() });
        Ok(())
    }

    fn apply_attribute(&self, node: &mut Node, name: &str, value: &str, is_root: bool) -> Result<()> {
        if name == UNSET_ATTRIBUTE {
            for unset in value.split_whitespace() {
                node.unset(unset).map_err(|err| self.error(err.to_string()))?;
            }
            return Ok(());
        }
        if is_root && name.strip_prefix("xmlns:") == Some(CODEC_PREFIX) {
            return Ok(());
        }
        if name.contains(':') || name == "xmlns" {
            node.push_foreign_attribute(name, value);
            return Ok(());
        }

        let kind = node.kind();
        let slot = node.attribute_mut(name).map_err(|err| self.error(err.to_string()))?;
        match AttributeValue::parse(kind, slot.spec(), value) {
            Ok(parsed) => slot.set_unchecked(parsed),
            Err(err) if self.options.strict_values => return Err(err),
            Err(_) => slot.set_unchecked(AttributeValue::raw(slot.spec(), value)),
        }
        Ok(())
    }

    /// End the innermost element and attach it to its parent.
    fn close(&mut self) -> Result<()> {
        self.flush_text()?;
        let Some(frame) = self.stack.pop() else {
            return Err(self.error("closing tag without an open element"));
        };
        match self.stack.last_mut() {
            Some(parent) => {
                if let Err(err) = parent.node.push_child(&frame.role, frame.node) {
                    return Err(self.error(err.to_string()));
                }
            }
            None => self.root = Some(frame.node),
        }
        Ok(())
    }

    /// Buffer a text or CDATA run. Adjacent runs form one text item, so the
    /// buffer is only trimmed and stored at the next markup boundary.
    fn text(&mut self, text: Cow<'_, str>) -> Result<()> {
        let registry = self.registry;
        let Some(frame) = self.stack.last_mut() else {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(self.error("text outside the root element"));
        };
        if frame.node.allows_mixed_content() || registry.schema(frame.node.kind()).has_text_content {
            frame.pending.push_str(&text);
            return Ok(());
        }
        if text.trim().is_empty() {
            return Ok(());
        }

        let message = format!("<{}> does not accept text content", frame.role);
        Err(self.error(message))
    }

    /// Store the buffered text of the innermost element.
    fn flush_text(&mut self) -> Result<()> {
        let registry = self.registry;
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        let pending = std::mem::take(&mut frame.pending);
        let trimmed = pending.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        if frame.node.allows_mixed_content() {
            return frame.node.push_text(trimmed);
        }
        let combined = match frame.node.text() {
            Some(existing) => format!("{} {}", existing, trimmed),
            None => trimmed.to_string(),
        };
        frame.node.set_text(Some(combined), registry)
    }

    fn comment(&mut self, comment: String) -> Result<()> {
        if self.in_prolog() {
            self.prolog.items.push(PrologItem::Comment(comment));
            return Ok(());
        }
        self.flush_text()?;
        match self.stack.last_mut() {
            Some(frame) if frame.node.allows_mixed_content() => frame.node.push_comment(comment),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MixedItem, SlotState};

    fn read(text: &str) -> Result<ConfigurationDocument> {
        read_document(text, SchemaRegistry::standard(), &CodecOptions::default())
    }

    #[test]
    fn mixed_content_keeps_order_and_trims_text() {
        let doc = read("<mule-configuration version=\"1.0\">\n  leading <!--note--> <connector name=\"c\" className=\"C\"/> trailing\n</mule-configuration>")
            .expect("parse");
        let mixed = doc.root().mixed().expect("mixed");
        assert_eq!(mixed.len(), 4);
        assert_eq!(mixed[0], MixedItem::Text("leading".to_string()));
        assert_eq!(mixed[1], MixedItem::Comment("note".to_string()));
        assert!(matches!(mixed[2], MixedItem::Child(_)));
        assert_eq!(mixed[3], MixedItem::Text("trailing".to_string()));
    }

    #[test]
    fn non_mixed_kinds_reject_text_and_drop_comments() {
        let err = read(r#"<mule-configuration version="1.0"><connector name="c" className="C">oops</connector></mule-configuration>"#)
            .unwrap_err();
        assert!(matches!(err, MuleConfigError::MalformedDocument { .. }));

        let doc = read(r#"<mule-configuration version="1.0"><connector name="c" className="C"><!-- ignored --></connector></mule-configuration>"#)
            .expect("parse");
        assert_eq!(doc.connector("c").map(|c| c.kind()), Some(NodeKind::Connector));
    }

    #[test]
    fn prefixed_attributes_are_foreign_and_unknown_ones_fail() {
        let doc = read(r#"<mule-configuration version="1.0" xmlns:doc="urn:doc" doc:note="x"/>"#).expect("parse");
        assert_eq!(
            doc.root().foreign_attributes(),
            &[("xmlns:doc".to_string(), "urn:doc".to_string()), ("doc:note".to_string(), "x".to_string())]
        );

        let err = read(r#"<mule-configuration version="1.0" colour="blue"/>"#).unwrap_err();
        match err {
            MuleConfigError::MalformedDocument { message, .. } => assert!(message.contains("colour"), "{}", message),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn codec_namespace_is_stripped() {
        let doc = read(
            r#"<mule-configuration version="1.0" xmlns:mc="urn:mule-config:codec" mc:unset="id"/>"#,
        )
        .expect("parse");
        assert!(doc.root().foreign_attributes().is_empty());
        assert_eq!(doc.root().attribute("id").map(|slot| slot.state()), Some(SlotState::Unset));
    }

    #[test]
    fn wrong_root_and_truncation_are_malformed() {
        assert!(matches!(read("<model/>"), Err(MuleConfigError::MalformedDocument { .. })));
        assert!(matches!(read(""), Err(MuleConfigError::MalformedDocument { .. })));
        assert!(matches!(
            read("<mule-configuration version=\"1.0\"><model>"),
            Err(MuleConfigError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn too_many_children_for_a_role() {
        let err = read(r#"<mule-configuration version="1.0"><model/><model/></mule-configuration>"#).unwrap_err();
        assert!(matches!(err, MuleConfigError::MalformedDocument { .. }));
    }

    #[test]
    fn adjacent_text_and_cdata_form_one_run() {
        let doc = read("<mule-configuration version=\"1.0\"><model name=\"m\">alpha<![CDATA[beta]]> gamma<!--c--><![CDATA[ delta ]]></model></mule-configuration>")
            .expect("parse");
        let model = doc.root().child("model").expect("model");
        assert_eq!(
            model.mixed().expect("mixed"),
            &[
                MixedItem::Text("alphabeta gamma".to_string()),
                MixedItem::Comment("c".to_string()),
                MixedItem::Text("delta".to_string()),
            ]
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let depth = MAX_NESTING_DEPTH + 8;
        let mut text = String::from("<mule-configuration version=\"1.0\"><global-endpoints><endpoint name=\"e\" address=\"vm://e\">");
        text.push_str(&"<filter className=\"org.mule.routing.filters.logic.NotFilter\">".repeat(depth));
        text.push_str(&"</filter>".repeat(depth));
        text.push_str("</endpoint></global-endpoints></mule-configuration>");

        match read(&text).unwrap_err() {
            MuleConfigError::MalformedDocument { location, message } => {
                assert!(message.contains("nested deeper"), "{}", message);
                assert_eq!(location.line, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn description_text_and_cdata() {
        let doc = read("<mule-configuration version=\"1.0\"><description><![CDATA[a < b]]></description></mule-configuration>")
            .expect("parse");
        assert_eq!(doc.description(), Some("a < b"));
    }
}
